use anyhow::Result;
use rust_decimal::Decimal;

pub(crate) const DEFAULT_CURRENCY: &str = "INR";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Wallet {
    pub(crate) holder: String,
    /// Not floored at zero: overdrafts are currently allowed through.
    pub(crate) balance: Decimal,
    pub(crate) currency: String,
}

impl Wallet {
    pub(crate) fn new(holder: String, balance: Decimal) -> Self {
        Self {
            holder,
            balance,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    /// Leaves the balance untouched when the result is not representable.
    pub(crate) fn debit(&mut self, amount: Decimal) -> Result<()> {
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or_else(|| anyhow::anyhow!("Debit of {amount} would overflow the wallet balance"))?;
        Ok(())
    }

    pub(crate) fn credit(&mut self, amount: Decimal) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| anyhow::anyhow!("Credit of {amount} would overflow the wallet balance"))?;
        Ok(())
    }

    pub(crate) fn is_overdrawn(&self) -> bool {
        self.balance < Decimal::ZERO
    }
}
