mod config;
mod db;
mod engine;
mod export;
mod format;
mod models;
mod run;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rbupay=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = std::env::args().collect();
    let dry_run = run::take_dry_run(&mut args);
    let db_path = config::db_path()?;
    let db = db::Database::open(&db_path)?;

    if dry_run {
        let mut engine = run::open_preview_engine(&db)?;
        run::as_cli(&args, &mut engine)
    } else {
        let mut engine = run::open_engine(db)?;
        run::as_cli(&args, &mut engine)
    }
}
