use anyhow::{Context, Result};
use std::path::PathBuf;

/// Overrides the database location.
pub(crate) const DB_ENV: &str = "POCKETLEDGER_DB";

/// `tracing` filter directives, e.g. `debug` or `pocketledger=trace`.
pub(crate) const LOG_ENV: &str = "POCKETLEDGER_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Config {
    pub db_path: PathBuf,
    pub log_filter: String,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        let db_override = std::env::var_os(DB_ENV).map(PathBuf::from);
        let log_filter = std::env::var(LOG_ENV).ok();
        let db_path = match db_override {
            Some(path) => path,
            None => default_db_path()?,
        };
        Ok(Self::resolve(db_path, log_filter))
    }

    fn resolve(db_path: PathBuf, log_filter: Option<String>) -> Self {
        let log_filter = log_filter
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        Self {
            db_path,
            log_filter,
        }
    }

    /// Create the directory that will hold the database file.
    pub(crate) fn ensure_data_dir(&self) -> Result<()> {
        if let Some(dir) = self.db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        }
        Ok(())
    }
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "pocketledger", "PocketLedger")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().join("pocketledger.db"))
}
