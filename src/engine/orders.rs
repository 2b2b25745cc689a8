use anyhow::Result;
use rust_decimal::Decimal;

use super::{now_millis, Engine, LedgerSink, Submission};
use crate::models::{Category, Transaction, TransactionKind, TransactionStatus};

fn order_id(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}

/// Normalized symbol and order value.
fn check_order(symbol: &str, quantity: Decimal, price: Decimal) -> Result<(String, Decimal)> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        anyhow::bail!("Order needs a symbol");
    }
    if quantity <= Decimal::ZERO {
        anyhow::bail!("Order quantity must be positive, got {quantity}");
    }
    if price <= Decimal::ZERO {
        anyhow::bail!("Order price must be positive, got {price}");
    }
    let value = quantity
        .checked_mul(price)
        .ok_or_else(|| anyhow::anyhow!("Order value of {quantity} x {price} is too large"))?;
    if value <= Decimal::ZERO {
        anyhow::bail!("Order value of {quantity} x {price} rounds to zero");
    }
    Ok((symbol, value))
}

impl<S: LedgerSink> Engine<S> {
    fn order(
        &self,
        prefix: &str,
        amount: Decimal,
        recipient: String,
        category: Category,
        kind: TransactionKind,
        now: i64,
    ) -> Transaction {
        Transaction::new(
            order_id(prefix),
            amount,
            recipient,
            self.ledger.wallet.holder.clone(),
            category,
            now,
        )
        .with_kind(kind)
    }

    /// Always a debit, whatever the recipient text says.
    pub(crate) fn pay(
        &mut self,
        amount: Decimal,
        recipient: &str,
        category: Category,
        status: TransactionStatus,
    ) -> Result<Submission> {
        let tx = self
            .order(
                "pay",
                amount,
                recipient.trim().to_string(),
                category,
                TransactionKind::Payment,
                now_millis(),
            )
            .with_status(status);
        self.submit_transaction(tx)
    }

    pub(crate) fn buy_stock(&mut self, symbol: &str, quantity: Decimal, price: Decimal) -> Result<Submission> {
        self.buy_stock_at(symbol, quantity, price, now_millis())
    }

    pub(crate) fn buy_stock_at(
        &mut self,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
        now: i64,
    ) -> Result<Submission> {
        let (symbol, value) = check_order(symbol, quantity, price)?;
        let tx = self.order(
            "buy",
            value,
            format!("Buy Order: {symbol}"),
            Category::Investments,
            TransactionKind::StockBuy,
            now,
        );
        let sweep = self.preflight(&tx)?;
        self.ledger.add_to_holding(&symbol, quantity, price)?;
        self.apply(tx, sweep, now)
    }

    pub(crate) fn sell_stock(&mut self, symbol: &str, quantity: Decimal, price: Decimal) -> Result<Submission> {
        self.sell_stock_at(symbol, quantity, price, now_millis())
    }

    /// Not checked against held quantity; an unheld symbol still credits.
    pub(crate) fn sell_stock_at(
        &mut self,
        symbol: &str,
        quantity: Decimal,
        price: Decimal,
        now: i64,
    ) -> Result<Submission> {
        let (symbol, value) = check_order(symbol, quantity, price)?;
        let tx = self.order(
            "sell",
            value,
            format!("Sell Order: {symbol}"),
            Category::Investments,
            TransactionKind::StockSell,
            now,
        );
        let sweep = self.preflight(&tx)?;
        self.ledger.reduce_holding(&symbol, quantity);
        self.apply(tx, sweep, now)
    }

    pub(crate) fn contribute_fee(&mut self, amount: Decimal, title: &str) -> Result<Submission> {
        self.contribute_fee_at(amount, title, now_millis())
    }

    pub(crate) fn contribute_fee_at(&mut self, amount: Decimal, title: &str, now: i64) -> Result<Submission> {
        let tx = self.order(
            "fee",
            amount,
            title.trim().to_string(),
            Category::Fees,
            TransactionKind::FeeContribution,
            now,
        );
        self.submit_transaction_at(tx, now)
    }
}
