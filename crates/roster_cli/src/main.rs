//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `roster_core` linkage and the configured database without the
//!   Flutter runtime.
//! - Keep output deterministic, one `key=value` pair per line.

use roster_core::db::open_db;
use roster_core::{LoadOutcome, RecordRepository, RecordStore, RosterConfig, SqliteKvStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("roster_core ping={}", roster_core::ping());
    println!("roster_core version={}", roster_core::core_version());

    let config = RosterConfig::from_env();
    println!("roster db_path={}", config.db_path.display());

    let loaded = open_db(&config.db_path)
        .map_err(|err| err.to_string())
        .and_then(|conn| SqliteKvStore::try_new(conn).map_err(|err| err.to_string()))
        .and_then(|kv| {
            RecordStore::load(RecordRepository::with_key(kv, config.storage_key.as_str()))
                .map_err(|err| err.to_string())
        });

    match loaded {
        Ok((store, outcome)) => {
            println!("roster records={}", store.len());
            if let LoadOutcome::RecoveredFromCorrupt(reason) = outcome {
                println!("roster warning={reason}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("roster error={err}");
            ExitCode::FAILURE
        }
    }
}
