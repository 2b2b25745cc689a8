use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable that points the store at an explicit database file.
pub(crate) const DB_PATH_ENV: &str = "RBUPAY_DB";

pub(crate) const ROUND_UP_KEY: &str = "round_up_enabled";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    /// Sweep spare change to the next ₹10 on every completed transaction.
    pub(crate) round_up_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            round_up_enabled: true,
        }
    }
}

impl Settings {
    /// Apply a stored key/value pair; unknown keys are ignored.
    pub(crate) fn apply(&mut self, key: &str, value: &str) {
        if key == ROUND_UP_KEY {
            self.round_up_enabled = parse_flag(value).unwrap_or(true);
        }
    }

    pub(crate) fn entries(&self) -> Vec<(&'static str, String)> {
        vec![(ROUND_UP_KEY, self.round_up_enabled.to_string())]
    }
}

pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

pub(crate) fn db_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    let proj_dirs = directories::ProjectDirs::from("com", "rbupay", "RBUPay")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("rbupay.db"))
}
