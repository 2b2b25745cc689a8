mod alert;
mod budget;
mod holding;
mod transaction;
mod wallet;

pub(crate) use alert::{AlertType, FraudAlert};
pub(crate) use budget::Budget;
pub(crate) use holding::Holding;
pub(crate) use transaction::{Category, RiskScore, Transaction, TransactionKind, TransactionStatus};
pub(crate) use wallet::{Wallet, DEFAULT_CURRENCY};
