use anyhow::{Context, Result};
use std::path::Path;

use crate::models::Transaction;

const HEADER: [&str; 11] = [
    "id",
    "timestamp",
    "kind",
    "status",
    "category",
    "recipient",
    "sender",
    "amount",
    "round_up",
    "risk",
    "flagged_reason",
];

/// Write transactions to CSV in the order given. Returns the row count.
pub(crate) fn write_history_csv(path: &Path, transactions: &[Transaction]) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.write_record(HEADER)?;
    for txn in transactions {
        wtr.write_record([
            txn.id.clone(),
            txn.timestamp.to_string(),
            txn.kind.as_str().to_string(),
            txn.status.as_str().to_string(),
            txn.category.as_str().to_string(),
            txn.recipient.clone(),
            txn.sender.clone(),
            txn.amount.to_string(),
            txn.round_up_amount.map(|d| d.to_string()).unwrap_or_default(),
            txn.risk_score.as_str().to_string(),
            txn.flagged_reason.clone().unwrap_or_default(),
        ])
        .with_context(|| format!("Failed to write transaction {}", txn.id))?;
    }
    wtr.flush().context("Failed to flush CSV export")?;
    Ok(transactions.len())
}
