pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS settings (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS wallet (
    id       INTEGER PRIMARY KEY CHECK (id = 1),
    holder   TEXT NOT NULL,
    balance  TEXT NOT NULL,
    currency TEXT NOT NULL DEFAULT 'INR'
);

CREATE TABLE IF NOT EXISTS budgets (
    category     TEXT PRIMARY KEY,
    limit_amount TEXT NOT NULL,
    spent        TEXT NOT NULL DEFAULT '0'
);

CREATE TABLE IF NOT EXISTS holdings (
    symbol    TEXT PRIMARY KEY,
    quantity  TEXT NOT NULL,
    avg_price TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS transactions (
    seq             INTEGER PRIMARY KEY AUTOINCREMENT,
    id              TEXT NOT NULL UNIQUE,
    kind            TEXT NOT NULL,
    amount          TEXT NOT NULL,
    recipient       TEXT NOT NULL,
    sender          TEXT NOT NULL DEFAULT '',
    category        TEXT NOT NULL,
    timestamp       INTEGER NOT NULL,
    status          TEXT NOT NULL,
    risk_score      TEXT NOT NULL DEFAULT 'low',
    round_up_amount TEXT,
    flagged_reason  TEXT
);

CREATE INDEX IF NOT EXISTS idx_transactions_timestamp ON transactions(timestamp);
CREATE INDEX IF NOT EXISTS idx_transactions_recipient ON transactions(recipient);

CREATE TABLE IF NOT EXISTS fraud_alerts (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    id          TEXT NOT NULL,
    tx_id       TEXT NOT NULL,
    timestamp   INTEGER NOT NULL,
    alert_type  TEXT NOT NULL,
    severity    TEXT NOT NULL,
    description TEXT NOT NULL
);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// `(from_version, sql)` steps applied in order to stores older than
/// `CURRENT_VERSION`. Add an entry here when the schema above changes.
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];
