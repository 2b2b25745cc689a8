use anyhow::Result;
use rust_decimal::Decimal;

use super::Category;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Budget {
    pub(crate) category: Category,
    pub(crate) limit_amount: Decimal,
    /// Only ever grows through settlement; there is no refund path.
    pub(crate) spent: Decimal,
}

impl Budget {
    pub(crate) fn new(category: Category, limit_amount: Decimal) -> Self {
        Self {
            category,
            limit_amount,
            spent: Decimal::ZERO,
        }
    }

    pub(crate) fn with_spent(mut self, spent: Decimal) -> Self {
        self.spent = spent;
        self
    }

    pub(crate) fn charge(&mut self, amount: Decimal) -> Result<()> {
        self.spent = self.spent.checked_add(amount).ok_or_else(|| {
            anyhow::anyhow!("{} spending would overflow its budget", self.category)
        })?;
        Ok(())
    }

    /// Headroom left in the envelope; negative once overspent.
    pub(crate) fn remaining(&self) -> Decimal {
        self.limit_amount - self.spent
    }

    pub(crate) fn is_exceeded(&self) -> bool {
        self.spent > self.limit_amount
    }

    /// Find the envelope for a category in a slice.
    pub(crate) fn find_mut(budgets: &mut [Budget], category: Category) -> Option<&mut Budget> {
        budgets.iter_mut().find(|b| b.category == category)
    }
}
