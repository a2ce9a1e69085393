//! JSON record sequence stored under one fixed slot key.
//!
//! # Invariants
//! - The slot holds a JSON array of `Record` objects in store order.
//! - `save` writes the whole sequence; there are no partial updates.
//! - `load` validates every decoded record.

use crate::model::record::{Record, RecordValidationError};
use crate::storage::{KvError, KvStore};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key used by every roster build so far.
pub const DEFAULT_STORAGE_KEY: &str = "students";

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Kv(KvError),
    Serialization(serde_json::Error),
    /// Persisted blob could not be decoded into valid records.
    CorruptState(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kv(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "failed to encode records: {err}"),
            Self::CorruptState(message) => write!(f, "corrupt persisted records: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Kv(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::CorruptState(_) => None,
        }
    }
}

impl From<KvError> for RepoError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}

/// Reads and writes the record sequence through a `KvStore`.
pub struct RecordRepository<K: KvStore> {
    kv: K,
    key: String,
}

impl<K: KvStore> RecordRepository<K> {
    /// Uses the default `students` slot.
    pub fn new(kv: K) -> Self {
        Self::with_key(kv, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(kv: K, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    /// Loads the persisted sequence; `Ok(None)` when the slot is absent or
    /// holds only whitespace.
    ///
    /// # Errors
    /// - `CorruptState` when the blob is not a record array or any record
    ///   fails validation.
    /// - `Kv` when the backend read fails.
    pub fn load(&self) -> RepoResult<Option<Vec<Record>>> {
        let Some(blob) = self.kv.get(&self.key)?.filter(|blob| !blob.trim().is_empty()) else {
            info!("event=records_load module=repo status=absent");
            return Ok(None);
        };

        let records: Vec<Record> = serde_json::from_str(&blob).map_err(|err| {
            warn!("event=records_load module=repo status=error error_code=decode_failed");
            RepoError::CorruptState(format!("slot `{}` is not a record array: {err}", self.key))
        })?;

        if let Some((position, err)) = first_invalid(&records) {
            warn!(
                "event=records_load module=repo status=error error_code=invalid_record position={position}"
            );
            return Err(RepoError::CorruptState(format!(
                "record at position {position} is invalid: {err}"
            )));
        }

        info!(
            "event=records_load module=repo status=ok len={}",
            records.len()
        );
        Ok(Some(records))
    }

    /// Replaces the slot with the given sequence.
    pub fn save(&self, records: &[Record]) -> RepoResult<()> {
        let blob = serde_json::to_string(records).map_err(RepoError::Serialization)?;
        self.kv.set(&self.key, &blob)?;
        Ok(())
    }
}

fn first_invalid(records: &[Record]) -> Option<(usize, RecordValidationError)> {
    records
        .iter()
        .enumerate()
        .find_map(|(position, record)| record.validate().err().map(|err| (position, err)))
}

#[cfg(test)]
mod tests {
    use super::{RecordRepository, RepoError};
    use crate::model::record::Record;
    use crate::storage::{KvStore, MemoryKvStore};

    fn jane() -> Record {
        Record {
            name: "Jane Doe".to_string(),
            id: "101".to_string(),
            email: "jane@x.com".to_string(),
            contact: "1234567890".to_string(),
        }
    }

    #[test]
    fn absent_slot_loads_as_none() {
        let repo = RecordRepository::new(MemoryKvStore::new());
        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn saved_blob_uses_plain_json_objects() {
        let repo = RecordRepository::new(MemoryKvStore::new());
        repo.save(&[jane()]).unwrap();

        let blob = repo.kv().get("students").unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(json[0]["name"], "Jane Doe");
        assert_eq!(json[0]["contact"], "1234567890");
        assert_eq!(repo.load().unwrap(), Some(vec![jane()]));
    }

    #[test]
    fn undecodable_blob_is_corrupt_state() {
        let kv = MemoryKvStore::new();
        kv.set("students", "{not json").unwrap();
        let repo = RecordRepository::new(&kv);

        assert!(matches!(repo.load(), Err(RepoError::CorruptState(_))));
    }

    #[test]
    fn blank_slot_loads_as_none() {
        let kv = MemoryKvStore::new();
        let repo = RecordRepository::new(&kv);

        kv.set("students", "").unwrap();
        assert!(repo.load().unwrap().is_none());
        kv.set("students", "  \n").unwrap();
        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn untrimmed_persisted_record_is_corrupt_state() {
        let kv = MemoryKvStore::new();
        kv.set(
            "students",
            r#"[{"name":"Jane","id":" 101 ","email":"jane@x.com","contact":"1234567890\n"}]"#,
        )
        .unwrap();
        let repo = RecordRepository::new(&kv);

        let err = repo.load().unwrap_err();
        assert!(matches!(err, RepoError::CorruptState(_)));
        assert!(err.to_string().contains("id must be numeric"));
    }

    #[test]
    fn invalid_persisted_record_is_corrupt_state() {
        let kv = MemoryKvStore::new();
        kv.set(
            "students",
            r#"[{"name":"R2D2","id":"1","email":"r@d.io","contact":"1234567890"}]"#,
        )
        .unwrap();
        let repo = RecordRepository::new(&kv);

        let err = repo.load().unwrap_err();
        assert!(err.to_string().contains("position 0"));
    }
}
