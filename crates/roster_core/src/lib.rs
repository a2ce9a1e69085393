//! Core domain logic for Roster.
//! This crate is the single source of truth for record invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use config::RosterConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{
    is_valid_contact, is_valid_email, is_valid_id, is_valid_name, validate, Record,
    RecordInput, RecordValidationError,
};
pub use repo::record_repo::{RecordRepository, RepoError, RepoResult, DEFAULT_STORAGE_KEY};
pub use service::controller::{
    ConfirmPrompt, ControllerError, FormField, FormState, RosterController, DELETE_CONFIRM_PROMPT,
};
pub use service::record_store::{LoadOutcome, RecordStore, RowKey, StoreError, StoreResult};
pub use service::session::EditSession;
pub use service::view::{render_rows, FormMode, RowView};
pub use storage::{KvError, KvResult, KvStore, MemoryKvStore, SqliteKvStore};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
