mod cli;

use anyhow::Result;

use crate::db::Database;
use crate::engine::{AlertStore, Engine, NullSink};

pub(crate) use cli::as_cli;

pub(crate) const DRY_RUN_FLAG: &str = "--dry-run";

/// Load the persisted session into an engine that writes back to `db`.
pub(crate) fn open_engine(db: Database) -> Result<Engine<Database>> {
    let ledger = db.load_ledger()?;
    let alerts = AlertStore::from_newest_first(db.get_alerts()?);
    let settings = db.get_settings()?;
    Ok(Engine::new(ledger, alerts, settings, db))
}

/// Same session, but nothing the engine does is written back.
pub(crate) fn open_preview_engine(db: &Database) -> Result<Engine<NullSink>> {
    let ledger = db.load_ledger()?;
    let alerts = AlertStore::from_newest_first(db.get_alerts()?);
    let settings = db.get_settings()?;
    Ok(Engine::new(ledger, alerts, settings, NullSink))
}

/// Strip the dry-run flag from `args`, reporting whether it was present.
pub(crate) fn take_dry_run(args: &mut Vec<String>) -> bool {
    let before = args.len();
    args.retain(|a| a != DRY_RUN_FLAG);
    args.len() != before
}
