use anyhow::Result;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Holding {
    pub(crate) symbol: String,
    pub(crate) quantity: Decimal,
    pub(crate) avg_price: Decimal,
}

impl Holding {
    pub(crate) fn new(symbol: String, quantity: Decimal, avg_price: Decimal) -> Self {
        Self {
            symbol,
            quantity,
            avg_price,
        }
    }

    /// Fold a new lot into the position at a quantity-weighted average price.
    /// The position is unchanged if the new size or cost does not fit.
    pub(crate) fn add_lot(&mut self, quantity: Decimal, price: Decimal) -> Result<()> {
        let overflow = || anyhow::anyhow!("Position in {} is too large", self.symbol);
        let total = self.quantity.checked_add(quantity).ok_or_else(overflow)?;
        let cost = self
            .checked_cost_basis()
            .and_then(|held| held.checked_add(price.checked_mul(quantity)?))
            .ok_or_else(overflow)?;
        if total > Decimal::ZERO {
            self.avg_price = cost.checked_div(total).ok_or_else(overflow)?;
        }
        self.quantity = total;
        Ok(())
    }

    pub(crate) fn checked_cost_basis(&self) -> Option<Decimal> {
        self.avg_price.checked_mul(self.quantity)
    }

    /// Saturates at `Decimal::MAX`; only used for display totals.
    pub(crate) fn cost_basis(&self) -> Decimal {
        self.avg_price.saturating_mul(self.quantity)
    }
}
