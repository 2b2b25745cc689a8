mod alerts;
mod ledger;
mod orders;
mod risk;
mod round_up;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::models::{Budget, Category, FraudAlert, Holding, Transaction, Wallet};

pub(crate) use alerts::{AlertStore, ALERT_CAPACITY};
pub(crate) use ledger::{Ledger, Settlement};
pub(crate) use round_up::round_up;

/// Where the engine writes after each mutation. Failures are logged by the
/// engine and never roll back in-memory state.
pub(crate) trait LedgerSink {
    fn persist(&mut self, ledger: &Ledger, tx: &Transaction, alert: Option<&FraudAlert>) -> Result<()>;
    fn save_budgets(&mut self, budgets: &[Budget]) -> Result<()>;
    fn clear_alerts(&mut self) -> Result<()>;
    fn save_settings(&mut self, settings: &Settings) -> Result<()>;
}

/// Keeps everything in memory.
#[derive(Debug, Default)]
pub(crate) struct NullSink;

impl LedgerSink for NullSink {
    fn persist(&mut self, _: &Ledger, _: &Transaction, _: Option<&FraudAlert>) -> Result<()> {
        Ok(())
    }

    fn save_budgets(&mut self, _: &[Budget]) -> Result<()> {
        Ok(())
    }

    fn clear_alerts(&mut self) -> Result<()> {
        Ok(())
    }

    fn save_settings(&mut self, _: &Settings) -> Result<()> {
        Ok(())
    }
}

/// Result of one submitted transaction.
#[derive(Debug, Clone)]
pub(crate) struct Submission {
    /// The transaction as recorded, with round-up and flags attached.
    pub(crate) transaction: Transaction,
    pub(crate) alert: Option<FraudAlert>,
    pub(crate) settlement: Settlement,
}

/// Single writer for one wallet. Every mutation takes `&mut self`, so
/// submissions cannot interleave; share it behind a `Mutex` if several
/// callers need it.
pub(crate) struct Engine<S: LedgerSink> {
    ledger: Ledger,
    alerts: AlertStore,
    settings: Settings,
    sink: S,
}

impl<S: LedgerSink> Engine<S> {
    pub(crate) fn new(ledger: Ledger, alerts: AlertStore, settings: Settings, sink: S) -> Self {
        Self {
            ledger,
            alerts,
            settings,
            sink,
        }
    }

    pub(crate) fn submit_transaction(&mut self, tx: Transaction) -> Result<Submission> {
        self.submit_transaction_at(tx, now_millis())
    }

    /// Round-up, risk analysis, history and settlement for one transaction,
    /// in that order, against a caller-supplied clock.
    pub(crate) fn submit_transaction_at(&mut self, tx: Transaction, now: i64) -> Result<Submission> {
        let sweep = self.preflight(&tx)?;
        self.apply(tx, sweep, now)
    }

    /// Everything that can refuse `tx`. Nothing is mutated; on success the
    /// round-up sweep to take is returned.
    fn preflight(&self, tx: &Transaction) -> Result<Option<Decimal>> {
        self.validate(tx)?;
        let sweep = if self.settings.round_up_enabled && tx.is_completed() {
            round_up(tx.amount)?
        } else {
            None
        };
        self.ledger
            .check(tx, sweep)
            .with_context(|| format!("Transaction {} cannot be settled", tx.id))?;
        Ok(sweep)
    }

    /// Only called with the sweep `preflight` approved, so the ledger steps
    /// below do not fail.
    fn apply(&mut self, mut tx: Transaction, sweep: Option<Decimal>, now: i64) -> Result<Submission> {
        if let Some(sweep) = sweep {
            tx.round_up_amount = Some(sweep);
            self.ledger.sweep(sweep)?;
            debug!(tx_id = %tx.id, %sweep, "round-up swept");
        }

        let alert = risk::analyze(&tx, &self.ledger.history, now);
        if let Some(alert) = &alert {
            warn!(
                tx_id = %tx.id,
                alert_type = %alert.alert_type,
                severity = %alert.severity,
                "{}",
                alert.description
            );
            tx.flagged_reason = Some(alert.description.clone());
            tx.risk_score = tx.risk_score.max(alert.severity);
            self.alerts.record(alert.clone());
        }

        self.ledger.record(tx.clone());
        let settlement = self.ledger.settle(&tx)?;
        debug!(tx_id = %tx.id, ?settlement, balance = %self.ledger.wallet.balance, "settled");

        if let Err(e) = self.sink.persist(&self.ledger, &tx, alert.as_ref()) {
            warn!(tx_id = %tx.id, error = %e, "failed to persist transaction");
        }

        Ok(Submission {
            transaction: tx,
            alert,
            settlement,
        })
    }

    fn validate(&self, tx: &Transaction) -> Result<()> {
        if tx.id.trim().is_empty() {
            anyhow::bail!("Transaction id must not be empty");
        }
        if tx.amount <= Decimal::ZERO {
            anyhow::bail!("Transaction amount must be positive, got {}", tx.amount);
        }
        if tx.recipient.trim().is_empty() {
            anyhow::bail!("Transaction {} has no recipient", tx.id);
        }
        if self.ledger.contains(&tx.id) {
            anyhow::bail!("Transaction {} was already submitted", tx.id);
        }
        Ok(())
    }

    pub(crate) fn set_budget_limit(&mut self, category: Category, limit: Decimal) -> Result<Budget> {
        if category.is_budget_exempt() {
            anyhow::bail!("{category} spending is not budgeted");
        }
        if limit <= Decimal::ZERO {
            anyhow::bail!("Budget limit must be positive, got {limit}");
        }
        let budget = self.ledger.set_budget_limit(category, limit).clone();
        info!(%category, %limit, "budget limit set");
        if let Err(e) = self.sink.save_budgets(&self.ledger.budgets) {
            warn!(error = %e, "failed to persist budgets");
        }
        Ok(budget)
    }

    pub(crate) fn set_round_up(&mut self, enabled: bool) {
        self.settings.round_up_enabled = enabled;
        info!(enabled, "round-up toggled");
        if let Err(e) = self.sink.save_settings(&self.settings) {
            warn!(error = %e, "failed to persist settings");
        }
    }

    pub(crate) fn clear_alerts(&mut self) {
        self.alerts.clear();
        if let Err(e) = self.sink.clear_alerts() {
            warn!(error = %e, "failed to clear stored alerts");
        }
    }

    // ── Read-only snapshots ───────────────────────────────────

    pub(crate) fn wallet(&self) -> &Wallet {
        &self.ledger.wallet
    }

    pub(crate) fn budgets(&self) -> &[Budget] {
        &self.ledger.budgets
    }

    pub(crate) fn budget(&self, category: Category) -> Option<&Budget> {
        self.ledger.budget(category)
    }

    pub(crate) fn holdings(&self) -> &[Holding] {
        &self.ledger.holdings
    }

    /// Newest first.
    pub(crate) fn history(&self) -> &[Transaction] {
        &self.ledger.history
    }

    /// Newest first, at most [`ALERT_CAPACITY`].
    pub(crate) fn alerts(&self) -> Vec<FraudAlert> {
        self.alerts.alerts()
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn invested(&self) -> Decimal {
        self.ledger.invested()
    }

    #[cfg(test)]
    pub(crate) fn sink(&self) -> &S {
        &self.sink
    }
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests;
