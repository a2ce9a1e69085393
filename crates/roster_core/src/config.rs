//! Runtime configuration resolved from the process environment.
//!
//! # Invariants
//! - Unset or blank variables fall back to built-in defaults.
//! - Resolution never fails; invalid log levels surface later in `init_logging`.

use crate::logging::default_log_level;
use crate::repo::record_repo::DEFAULT_STORAGE_KEY;
use std::path::PathBuf;

/// Database file path override.
pub const ENV_DB_PATH: &str = "ROSTER_DB_PATH";
/// Storage slot key override.
pub const ENV_STORAGE_KEY: &str = "ROSTER_STORAGE_KEY";
/// Log level override.
pub const ENV_LOG_LEVEL: &str = "ROSTER_LOG_LEVEL";

const DEFAULT_DB_FILE_NAME: &str = "roster.sqlite3";

/// Effective configuration for one roster session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterConfig {
    /// SQLite file holding the key-value slots.
    pub db_path: PathBuf,
    /// Slot key under which the record sequence is stored.
    pub storage_key: String,
    /// Log level passed to `init_logging`.
    pub log_level: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_level: default_log_level().to_string(),
        }
    }
}

impl RosterConfig {
    /// Resolves configuration from `ROSTER_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_blank = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: non_blank(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            storage_key: non_blank(ENV_STORAGE_KEY).unwrap_or(defaults.storage_key),
            log_level: non_blank(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
        }
    }
}
