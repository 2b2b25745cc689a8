mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::config::Settings;
use crate::engine::{Ledger, LedgerSink, ALERT_CAPACITY};
use crate::models::*;

pub(crate) const DEFAULT_HOLDER: &str = "Student";
pub(crate) const DEFAULT_BALANCE: i64 = 42_500;

pub(crate) struct Database {
    conn: Connection,
}

fn parse_decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap_or_default()
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        db.seed_defaults()?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        db.seed_defaults()?;
        Ok(db)
    }

    /// Fresh stores get the full schema. Existing stores are brought up to
    /// `CURRENT_VERSION` by replaying `schema::MIGRATIONS`, which holds no
    /// steps while the schema is still at version 1.
    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);
        if current > schema::CURRENT_VERSION {
            anyhow::bail!(
                "Database schema v{current} is newer than this build supports (v{})",
                schema::CURRENT_VERSION
            );
        }

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    /// A fresh store starts with a funded wallet and the standard envelopes.
    fn seed_defaults(&mut self) -> Result<()> {
        let has_wallet: bool = self
            .conn
            .query_row("SELECT EXISTS(SELECT 1 FROM wallet)", [], |row| row.get(0))?;
        if has_wallet {
            return Ok(());
        }

        let budgets = [
            (Category::Food, 8000, 3400),
            (Category::Travel, 5000, 1200),
            (Category::Investments, 10000, 4000),
            (Category::Utilities, 2000, 450),
            (Category::Shopping, 6000, 2100),
        ];

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO wallet (id, holder, balance, currency) VALUES (1, ?1, ?2, ?3)",
            params![
                DEFAULT_HOLDER,
                Decimal::from(DEFAULT_BALANCE).to_string(),
                DEFAULT_CURRENCY
            ],
        )?;
        for (category, limit, spent) in budgets {
            tx.execute(
                "INSERT OR IGNORE INTO budgets (category, limit_amount, spent) VALUES (?1, ?2, ?3)",
                params![category.as_str(), limit.to_string(), spent.to_string()],
            )?;
        }
        tx.commit()?;
        debug!("seeded default wallet and budgets");
        Ok(())
    }

    // ── Session state ─────────────────────────────────────────

    /// Everything the engine needs to start a session.
    pub(crate) fn load_ledger(&self) -> Result<Ledger> {
        Ok(Ledger::new(self.get_wallet()?, self.get_budgets()?)
            .with_holdings(self.get_holdings()?)
            .with_history(self.get_transactions(None)?))
    }

    pub(crate) fn get_wallet(&self) -> Result<Wallet> {
        let wallet = self
            .conn
            .query_row(
                "SELECT holder, balance, currency FROM wallet WHERE id = 1",
                [],
                |row| {
                    let mut wallet =
                        Wallet::new(row.get(0)?, parse_decimal(&row.get::<_, String>(1)?));
                    wallet.currency = row.get(2)?;
                    Ok(wallet)
                },
            )
            .optional()?;
        wallet.ok_or_else(|| anyhow::anyhow!("Wallet has not been created"))
    }

    pub(crate) fn get_settings(&self) -> Result<Settings> {
        let mut stmt = self.conn.prepare("SELECT key, value FROM settings")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut settings = Settings::default();
        for row in rows {
            let (key, value) = row?;
            settings.apply(&key, &value);
        }
        Ok(settings)
    }

    // ── Budgets ───────────────────────────────────────────────

    pub(crate) fn get_budgets(&self) -> Result<Vec<Budget>> {
        let mut stmt = self
            .conn
            .prepare("SELECT category, limit_amount, spent FROM budgets ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            let budget = Budget::new(
                Category::parse(&row.get::<_, String>(0)?),
                parse_decimal(&row.get::<_, String>(1)?),
            );
            Ok(budget.with_spent(parse_decimal(&row.get::<_, String>(2)?)))
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn write_budgets(conn: &Connection, budgets: &[Budget]) -> Result<()> {
        for budget in budgets {
            conn.execute(
                "INSERT INTO budgets (category, limit_amount, spent) VALUES (?1, ?2, ?3)
                 ON CONFLICT(category) DO UPDATE SET limit_amount = ?2, spent = ?3",
                params![
                    budget.category.as_str(),
                    budget.limit_amount.to_string(),
                    budget.spent.to_string(),
                ],
            )?;
        }
        Ok(())
    }

    // ── Holdings ──────────────────────────────────────────────

    pub(crate) fn get_holdings(&self) -> Result<Vec<Holding>> {
        let mut stmt = self
            .conn
            .prepare("SELECT symbol, quantity, avg_price FROM holdings ORDER BY symbol")?;
        let rows = stmt.query_map([], |row| {
            Ok(Holding {
                symbol: row.get(0)?,
                quantity: parse_decimal(&row.get::<_, String>(1)?),
                avg_price: parse_decimal(&row.get::<_, String>(2)?),
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn write_holdings(conn: &Connection, holdings: &[Holding]) -> Result<()> {
        conn.execute("DELETE FROM holdings", [])?;
        for holding in holdings {
            conn.execute(
                "INSERT INTO holdings (symbol, quantity, avg_price) VALUES (?1, ?2, ?3)",
                params![
                    holding.symbol,
                    holding.quantity.to_string(),
                    holding.avg_price.to_string(),
                ],
            )?;
        }
        Ok(())
    }

    // ── Transactions ──────────────────────────────────────────

    fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
        let recipient: String = row.get(4)?;
        let kind = TransactionKind::parse(&row.get::<_, String>(1)?)
            .unwrap_or_else(|| TransactionKind::infer(&recipient));
        Ok(Transaction {
            id: row.get(0)?,
            kind,
            amount: parse_decimal(&row.get::<_, String>(2)?),
            sender: row.get(3)?,
            recipient,
            category: Category::parse(&row.get::<_, String>(5)?),
            timestamp: row.get(6)?,
            status: TransactionStatus::parse(&row.get::<_, String>(7)?)
                .unwrap_or(TransactionStatus::Failed),
            risk_score: RiskScore::parse(&row.get::<_, String>(8)?),
            round_up_amount: row
                .get::<_, Option<String>>(9)?
                .map(|s| parse_decimal(&s)),
            flagged_reason: row.get(10)?,
        })
    }

    /// Newest submission first.
    pub(crate) fn get_transactions(&self, limit: Option<u32>) -> Result<Vec<Transaction>> {
        let mut sql = String::from(
            "SELECT id, kind, amount, sender, recipient, category, timestamp, status,
                    risk_score, round_up_amount, flagged_reason
             FROM transactions ORDER BY seq DESC",
        );
        if let Some(l) = limit {
            sql.push_str(&format!(" LIMIT {l}"));
        }
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], Self::row_to_transaction)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn insert_transaction(conn: &Connection, txn: &Transaction) -> Result<()> {
        conn.execute(
            "INSERT INTO transactions (id, kind, amount, recipient, sender, category, timestamp, status, risk_score, round_up_amount, flagged_reason)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                txn.id,
                txn.kind.as_str(),
                txn.amount.to_string(),
                txn.recipient,
                txn.sender,
                txn.category.as_str(),
                txn.timestamp,
                txn.status.as_str(),
                txn.risk_score.as_str(),
                txn.round_up_amount.map(|d| d.to_string()),
                txn.flagged_reason,
            ],
        )
        .with_context(|| format!("Failed to store transaction {}", txn.id))?;
        Ok(())
    }

    // ── Fraud alerts ──────────────────────────────────────────

    /// Newest first, capped at the alert store capacity.
    pub(crate) fn get_alerts(&self) -> Result<Vec<FraudAlert>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, tx_id, timestamp, alert_type, severity, description
             FROM fraud_alerts ORDER BY seq DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![ALERT_CAPACITY as i64], |row| {
            Ok(FraudAlert {
                id: row.get(0)?,
                tx_id: row.get(1)?,
                timestamp: row.get(2)?,
                alert_type: AlertType::parse(&row.get::<_, String>(3)?)
                    .unwrap_or(AlertType::Pattern),
                severity: RiskScore::parse(&row.get::<_, String>(4)?),
                description: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn insert_alert(conn: &Connection, alert: &FraudAlert) -> Result<()> {
        conn.execute(
            "INSERT INTO fraud_alerts (id, tx_id, timestamp, alert_type, severity, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                alert.id,
                alert.tx_id,
                alert.timestamp,
                alert.alert_type.as_str(),
                alert.severity.as_str(),
                alert.description,
            ],
        )?;
        conn.execute(
            "DELETE FROM fraud_alerts WHERE seq NOT IN
                (SELECT seq FROM fraud_alerts ORDER BY seq DESC LIMIT ?1)",
            params![ALERT_CAPACITY as i64],
        )?;
        Ok(())
    }
}

impl LedgerSink for Database {
    fn persist(&mut self, ledger: &Ledger, tx: &Transaction, alert: Option<&FraudAlert>) -> Result<()> {
        let db_tx = self.conn.transaction()?;
        db_tx.execute(
            "UPDATE wallet SET balance = ?1 WHERE id = 1",
            params![ledger.wallet.balance.to_string()],
        )?;
        Self::write_budgets(&db_tx, &ledger.budgets)?;
        Self::write_holdings(&db_tx, &ledger.holdings)?;
        Self::insert_transaction(&db_tx, tx)?;
        if let Some(alert) = alert {
            Self::insert_alert(&db_tx, alert)?;
        }
        db_tx.commit()?;
        Ok(())
    }

    fn save_budgets(&mut self, budgets: &[Budget]) -> Result<()> {
        let db_tx = self.conn.transaction()?;
        Self::write_budgets(&db_tx, budgets)?;
        db_tx.commit()?;
        Ok(())
    }

    fn clear_alerts(&mut self) -> Result<()> {
        self.conn.execute("DELETE FROM fraud_alerts", [])?;
        Ok(())
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        for (key, value) in settings.entries() {
            self.conn.execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = ?2",
                params![key, value],
            )?;
        }
        Ok(())
    }
}
