use anyhow::Result;
use rust_decimal::Decimal;

/// Spare change is swept up to the next multiple of this amount.
pub(crate) const ROUND_UP_STEP: Decimal = Decimal::TEN;

/// Distance from `amount` to the next ₹10 boundary, or `None` when the amount
/// already sits on one (or is not positive). Errors if that boundary lies
/// past `Decimal::MAX`.
pub(crate) fn round_up(amount: Decimal) -> Result<Option<Decimal>> {
    if amount <= Decimal::ZERO {
        return Ok(None);
    }
    let ceiling = (amount / ROUND_UP_STEP)
        .ceil()
        .checked_mul(ROUND_UP_STEP)
        .ok_or_else(|| anyhow::anyhow!("Amount {amount} is too large to round up"))?;
    let sweep = ceiling - amount;
    Ok((sweep > Decimal::ZERO).then_some(sweep))
}
