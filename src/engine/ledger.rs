use anyhow::Result;
use rust_decimal::Decimal;

use crate::models::{Budget, Category, Holding, Transaction, Wallet};

/// Wallet, budget envelopes, holdings and transaction history for one user.
#[derive(Debug, Clone)]
pub(crate) struct Ledger {
    pub(crate) wallet: Wallet,
    pub(crate) budgets: Vec<Budget>,
    pub(crate) holdings: Vec<Holding>,
    /// Newest first, in submission order.
    pub(crate) history: Vec<Transaction>,
}

/// What settling a transaction did to the wallet and budgets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Settlement {
    Credited(Decimal),
    /// `budget` names the envelope that absorbed the spend, if any.
    Debited {
        amount: Decimal,
        budget: Option<Category>,
    },
    /// Pending or failed: kept in history only.
    Recorded,
}

impl Ledger {
    pub(crate) fn new(wallet: Wallet, budgets: Vec<Budget>) -> Self {
        Self {
            wallet,
            budgets,
            holdings: Vec::new(),
            history: Vec::new(),
        }
    }

    pub(crate) fn with_holdings(mut self, holdings: Vec<Holding>) -> Self {
        self.holdings = holdings;
        self
    }

    pub(crate) fn with_history(mut self, history: Vec<Transaction>) -> Self {
        self.history = history;
        self
    }

    pub(crate) fn contains(&self, tx_id: &str) -> bool {
        self.history.iter().any(|t| t.id == tx_id)
    }

    pub(crate) fn budget(&self, category: Category) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.category == category)
    }

    /// Take a round-up sweep out of the wallet.
    pub(crate) fn sweep(&mut self, amount: Decimal) -> Result<()> {
        self.wallet.debit(amount)
    }

    pub(crate) fn record(&mut self, tx: Transaction) {
        self.history.insert(0, tx);
    }

    /// Run the sweep and settlement of `tx` against a copy of the wallet and
    /// budgets, so a transaction whose totals would overflow is refused
    /// before anything moves.
    pub(crate) fn check(&self, tx: &Transaction, sweep: Option<Decimal>) -> Result<()> {
        let mut staged = Ledger::new(self.wallet.clone(), self.budgets.clone());
        if let Some(sweep) = sweep {
            staged.sweep(sweep)?;
        }
        staged.settle(tx)?;
        Ok(())
    }

    /// Apply the primary effect of `tx`. Only completed transactions move
    /// money; sells credit, everything else debits and, outside Others/Fees,
    /// counts against an existing envelope. On error nothing has changed.
    pub(crate) fn settle(&mut self, tx: &Transaction) -> Result<Settlement> {
        if !tx.is_completed() {
            return Ok(Settlement::Recorded);
        }
        if tx.kind.is_credit() {
            self.wallet.credit(tx.amount)?;
            return Ok(Settlement::Credited(tx.amount));
        }

        let mut wallet = self.wallet.clone();
        wallet.debit(tx.amount)?;
        let budget = if tx.category.is_budget_exempt() {
            None
        } else {
            match Budget::find_mut(&mut self.budgets, tx.category) {
                Some(b) => {
                    b.charge(tx.amount)?;
                    Some(b.category)
                }
                None => None,
            }
        };
        self.wallet = wallet;
        Ok(Settlement::Debited {
            amount: tx.amount,
            budget,
        })
    }

    pub(crate) fn set_budget_limit(&mut self, category: Category, limit: Decimal) -> &Budget {
        let idx = match self.budgets.iter().position(|b| b.category == category) {
            Some(idx) => {
                self.budgets[idx].limit_amount = limit;
                idx
            }
            None => {
                self.budgets.push(Budget::new(category, limit));
                self.budgets.len() - 1
            }
        };
        &self.budgets[idx]
    }

    /// Holdings are unchanged if the enlarged position would overflow.
    pub(crate) fn add_to_holding(&mut self, symbol: &str, quantity: Decimal, price: Decimal) -> Result<()> {
        match self.holdings.iter_mut().find(|h| h.symbol == symbol) {
            Some(holding) => holding.add_lot(quantity, price)?,
            None => {
                let holding = Holding::new(symbol.to_string(), quantity, price);
                if holding.checked_cost_basis().is_none() {
                    anyhow::bail!("Position in {symbol} is too large");
                }
                self.holdings.push(holding);
            }
        }
        Ok(())
    }

    /// Selling more than is held closes the position; selling something not
    /// held leaves holdings untouched.
    pub(crate) fn reduce_holding(&mut self, symbol: &str, quantity: Decimal) {
        let Some(idx) = self.holdings.iter().position(|h| h.symbol == symbol) else {
            return;
        };
        if self.holdings[idx].quantity <= quantity {
            self.holdings.remove(idx);
        } else {
            self.holdings[idx].quantity -= quantity;
        }
    }

    pub(crate) fn invested(&self) -> Decimal {
        self.holdings
            .iter()
            .map(Holding::cost_basis)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}
