//! Rule-based screening of a new transaction against recent history.
//!
//! Rules are checked in table order and the first match wins, so a
//! transaction produces at most one alert.

use rust_decimal::Decimal;

use crate::models::{AlertType, FraudAlert, RiskScore, Transaction};

/// Window for counting rapid payments.
pub(crate) const VELOCITY_WINDOW_MS: i64 = 60_000;
/// Prior payments inside the velocity window that trip the rule.
pub(crate) const VELOCITY_LIMIT: usize = 2;
/// Single-payment ceiling for a student profile, in rupees.
pub(crate) const LARGE_AMOUNT_LIMIT: i64 = 15_000;
/// Window for the repeat-recipient category check.
pub(crate) const PATTERN_WINDOW_MS: i64 = 3_600_000;

type Predicate = fn(&Transaction, &[Transaction], i64) -> bool;

pub(crate) struct RiskRule {
    pub(crate) alert_type: AlertType,
    pub(crate) severity: RiskScore,
    pub(crate) description: &'static str,
    matches: Predicate,
}

impl RiskRule {
    pub(crate) fn matches(&self, tx: &Transaction, history: &[Transaction], now: i64) -> bool {
        (self.matches)(tx, history, now)
    }

    pub(crate) fn raise(&self, tx: &Transaction, now: i64) -> FraudAlert {
        FraudAlert::new(
            tx.id.clone(),
            self.alert_type,
            self.severity,
            self.description.to_string(),
            now,
        )
    }
}

/// Highest priority first.
pub(crate) static RULES: [RiskRule; 3] = [
    RiskRule {
        alert_type: AlertType::Velocity,
        severity: RiskScore::High,
        description: "Rapid repeated payments detected. Potential unauthorized activity.",
        matches: is_rapid_repeat,
    },
    RiskRule {
        alert_type: AlertType::Amount,
        severity: RiskScore::Medium,
        description: "Unusually large transaction amount for student profile.",
        matches: is_large_amount,
    },
    RiskRule {
        alert_type: AlertType::Pattern,
        severity: RiskScore::Low,
        description: "Category mismatch for repeat recipient. Please verify usage.",
        matches: is_category_mismatch,
    },
];

fn is_rapid_repeat(_tx: &Transaction, history: &[Transaction], now: i64) -> bool {
    let since = now - VELOCITY_WINDOW_MS;
    history.iter().filter(|t| t.timestamp > since).count() >= VELOCITY_LIMIT
}

fn is_large_amount(tx: &Transaction, _history: &[Transaction], _now: i64) -> bool {
    tx.amount > Decimal::from(LARGE_AMOUNT_LIMIT)
}

fn is_category_mismatch(tx: &Transaction, history: &[Transaction], now: i64) -> bool {
    let since = now - PATTERN_WINDOW_MS;
    history.iter().any(|t| {
        t.recipient == tx.recipient && t.category != tx.category && t.timestamp > since
    })
}

/// The first rule `tx` trips, if any. `history` must not contain `tx`.
pub(crate) fn evaluate(tx: &Transaction, history: &[Transaction], now: i64) -> Option<&'static RiskRule> {
    RULES.iter().find(|rule| rule.matches(tx, history, now))
}

pub(crate) fn analyze(tx: &Transaction, history: &[Transaction], now: i64) -> Option<FraudAlert> {
    evaluate(tx, history, now).map(|rule| rule.raise(tx, now))
}

#[cfg(test)]
#[path = "risk_tests.rs"]
mod tests;
