//! Ordered record list mirrored to the persistence slot.
//!
//! # Responsibility
//! - Load the persisted sequence once at startup.
//! - Apply append / replace / remove and persist after each one.
//!
//! # Invariants
//! - Every held record passes `Record::validate`.
//! - A mutation is committed in memory only once the new sequence is
//!   persisted; on write failure the previous list is restored.
//! - Row keys are unique within a session and never persisted.

use crate::model::record::{Record, RecordValidationError};
use crate::repo::record_repo::{RecordRepository, RepoError, RepoResult};
use crate::storage::KvStore;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Session-local identity for one row, resolved to an index on dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey(u64);

impl RowKey {
    pub fn value(self) -> u64 {
        self.0
    }

    pub fn from_value(value: u64) -> Self {
        Self(value)
    }
}

impl Display for RowKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "row-{}", self.0)
    }
}

/// How the startup load went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Slot was absent.
    Empty,
    /// Slot decoded into this many records.
    Loaded(usize),
    /// Slot was corrupt; the store started empty.
    RecoveredFromCorrupt(String),
}

#[derive(Debug)]
pub enum StoreError {
    IndexOutOfRange { index: usize, len: usize },
    Invalid(RecordValidationError),
    Persist(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "record index {index} out of range for {len} record(s)")
            }
            Self::Invalid(err) => write!(f, "{err}"),
            Self::Persist(err) => write!(f, "failed to save records: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::IndexOutOfRange { .. } => None,
            Self::Invalid(err) => Some(err),
            Self::Persist(err) => Some(err),
        }
    }
}

impl From<RecordValidationError> for StoreError {
    fn from(value: RecordValidationError) -> Self {
        Self::Invalid(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Persist(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    key: RowKey,
    record: Record,
}

/// In-memory record list backed by a `RecordRepository`.
pub struct RecordStore<K: KvStore> {
    repo: RecordRepository<K>,
    rows: Vec<Row>,
    next_key: u64,
}

impl<K: KvStore> RecordStore<K> {
    /// Loads the persisted sequence.
    ///
    /// A corrupt slot is not fatal: the store starts empty and the outcome
    /// carries the reason. The slot itself is left as-is until the next
    /// successful mutation overwrites it.
    ///
    /// # Errors
    /// - Backend read failures.
    pub fn load(repo: RecordRepository<K>) -> RepoResult<(Self, LoadOutcome)> {
        let mut store = Self {
            repo,
            rows: Vec::new(),
            next_key: 0,
        };

        let outcome = match store.repo.load() {
            Ok(None) => LoadOutcome::Empty,
            Ok(Some(records)) => {
                let count = records.len();
                for record in records {
                    let key = store.allocate_key();
                    store.rows.push(Row { key, record });
                }
                LoadOutcome::Loaded(count)
            }
            Err(RepoError::CorruptState(reason)) => {
                warn!("event=store_load module=store status=recovered reason=corrupt_state");
                LoadOutcome::RecoveredFromCorrupt(reason)
            }
            Err(err) => return Err(err),
        };

        Ok((store, outcome))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.rows.get(index).map(|row| &row.record)
    }

    pub fn key_at(&self, index: usize) -> Option<RowKey> {
        self.rows.get(index).map(|row| row.key)
    }

    /// Current position of a row, `None` once it was removed.
    pub fn index_of(&self, key: RowKey) -> Option<usize> {
        self.rows.iter().position(|row| row.key == key)
    }

    /// Records in store order.
    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.rows.iter().map(|row| &row.record)
    }

    /// `(key, record)` pairs in store order.
    pub fn entries(&self) -> impl Iterator<Item = (RowKey, &Record)> + '_ {
        self.rows.iter().map(|row| (row.key, &row.record))
    }

    /// Adds a record at the end and persists.
    pub fn append(&mut self, record: Record) -> StoreResult<RowKey> {
        record.validate()?;
        let key = self.allocate_key();
        self.rows.push(Row { key, record });

        if let Err(err) = self.persist("append") {
            self.rows.pop();
            return Err(err);
        }
        info!(
            "event=record_append module=store status=ok len={}",
            self.rows.len()
        );
        Ok(key)
    }

    /// Overwrites the record at `index` and persists. The row keeps its key.
    pub fn replace_at(&mut self, index: usize, record: Record) -> StoreResult<()> {
        self.check_index(index, "replace")?;
        record.validate()?;
        let previous = std::mem::replace(&mut self.rows[index].record, record);

        if let Err(err) = self.persist("replace") {
            self.rows[index].record = previous;
            return Err(err);
        }
        info!("event=record_replace module=store status=ok index={index}");
        Ok(())
    }

    /// Removes the record at `index`, shifting later rows down, and persists.
    pub fn remove_at(&mut self, index: usize) -> StoreResult<Record> {
        self.check_index(index, "remove")?;
        let removed = self.rows.remove(index);

        if let Err(err) = self.persist("remove") {
            self.rows.insert(index, removed);
            return Err(err);
        }
        info!(
            "event=record_remove module=store status=ok index={index} len={}",
            self.rows.len()
        );
        Ok(removed.record)
    }

    fn check_index(&self, index: usize, op: &str) -> StoreResult<()> {
        let len = self.rows.len();
        if index >= len {
            error!(
                "event=record_{op} module=store status=error error_code=index_out_of_range index={index} len={len}"
            );
            return Err(StoreError::IndexOutOfRange { index, len });
        }
        Ok(())
    }

    fn persist(&self, op: &str) -> StoreResult<()> {
        let records = self.records().cloned().collect::<Vec<_>>();
        self.repo.save(&records).map_err(|err| {
            error!(
                "event=record_{op} module=store status=error error_code=persist_failed error={err}"
            );
            StoreError::Persist(err)
        })
    }

    fn allocate_key(&mut self) -> RowKey {
        let key = RowKey(self.next_key);
        self.next_key += 1;
        key
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadOutcome, RecordStore, StoreError};
    use crate::model::record::{Record, RecordValidationError};
    use crate::repo::record_repo::RecordRepository;
    use crate::storage::{KvStore, MemoryKvStore};

    fn record(name: &str, id: &str) -> Record {
        Record {
            name: name.to_string(),
            id: id.to_string(),
            email: format!("{}@school.edu", id),
            contact: "5550001111".to_string(),
        }
    }

    #[test]
    fn failed_write_rolls_back_every_mutation() {
        let kv = MemoryKvStore::new();
        let (mut store, _) = RecordStore::load(RecordRepository::new(&kv)).unwrap();
        store.append(record("Ada", "1")).unwrap();
        let persisted = kv.get("students").unwrap();

        kv.set_reject_writes(true);
        assert!(matches!(
            store.append(record("Bob", "2")),
            Err(StoreError::Persist(_))
        ));
        assert!(store.replace_at(0, record("Cy", "3")).is_err());
        assert!(store.remove_at(0).is_err());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0), Some(&record("Ada", "1")));
        assert_eq!(kv.get("students").unwrap(), persisted);
    }

    #[test]
    fn invalid_record_never_enters_the_store() {
        let kv = MemoryKvStore::new();
        let (mut store, _) = RecordStore::load(RecordRepository::new(&kv)).unwrap();

        let err = store.append(record("R2D2", "1")).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Invalid(RecordValidationError::InvalidName)
        ));
        assert!(store.is_empty());
        assert_eq!(kv.write_count(), 0);
    }

    #[test]
    fn untrimmed_record_is_rejected_by_append_and_replace() {
        let kv = MemoryKvStore::new();
        let (mut store, _) = RecordStore::load(RecordRepository::new(&kv)).unwrap();
        store.append(record("Ada", "1")).unwrap();

        let mut padded = record("Bob", "2");
        padded.id = "\t7".to_string();
        assert!(matches!(
            store.append(padded.clone()),
            Err(StoreError::Invalid(RecordValidationError::InvalidId))
        ));
        assert!(matches!(
            store.replace_at(0, padded),
            Err(StoreError::Invalid(RecordValidationError::InvalidId))
        ));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0), Some(&record("Ada", "1")));
        assert_eq!(kv.write_count(), 1);
    }

    #[test]
    fn stale_index_leaves_store_unchanged() {
        let kv = MemoryKvStore::new();
        let (mut store, _) = RecordStore::load(RecordRepository::new(&kv)).unwrap();
        store.append(record("Ada", "1")).unwrap();

        let err = store.replace_at(1, record("Bob", "2")).unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { index: 1, len: 1 }));
        assert!(store.remove_at(5).is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(kv.write_count(), 1);
    }

    #[test]
    fn corrupt_slot_recovers_to_empty_and_keeps_blob() {
        let kv = MemoryKvStore::new();
        kv.set("students", "not json").unwrap();

        let (store, outcome) = RecordStore::load(RecordRepository::new(&kv)).unwrap();
        assert!(store.is_empty());
        assert!(matches!(outcome, LoadOutcome::RecoveredFromCorrupt(_)));
        assert_eq!(kv.get("students").unwrap().as_deref(), Some("not json"));
    }

    #[test]
    fn row_keys_follow_rows_across_removal() {
        let kv = MemoryKvStore::new();
        let (mut store, _) = RecordStore::load(RecordRepository::new(&kv)).unwrap();
        let first = store.append(record("Ada", "1")).unwrap();
        let second = store.append(record("Bob", "2")).unwrap();

        store.remove_at(0).unwrap();
        assert_eq!(store.index_of(first), None);
        assert_eq!(store.index_of(second), Some(0));

        let third = store.append(record("Cy", "3")).unwrap();
        assert_ne!(third, first);
        assert_eq!(store.key_at(1), Some(third));
    }
}
