use rust_decimal::Decimal;

/// Rupee amount with Indian digit grouping and 2 decimal places.
/// e.g. `1234567.89` → `"₹12,34,567.89"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let formatted = format!("{:.2}", val.abs());
    let (int_part, dec_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));
    let sign = if val < Decimal::ZERO { "-" } else { "" };
    format!("{sign}₹{}.{dec_part}", group_lakhs(int_part))
}

/// Thousands, then pairs: `1234567` → `12,34,567`.
fn group_lakhs(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = head
        .as_bytes()
        .rchunks(2)
        .rev()
        .map(|pair| std::str::from_utf8(pair).unwrap_or(""))
        .collect();
    groups.push(tail);
    groups.join(",")
}

/// Local wall-clock rendering of an epoch-millisecond timestamp.
pub(crate) fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| {
            dt.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| "-".into())
}

/// Fit a recipient or title into a table column of `max` characters,
/// ending in "…" when cut.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
