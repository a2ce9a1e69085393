//! In-memory slots for tests and ephemeral sessions.

use super::{KvError, KvResult, KvStore};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Volatile slot store.
///
/// Uses `RefCell` since the roster core is single-threaded per controller;
/// `KvStore` can then keep `&self` receivers for writes.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    slots: RefCell<HashMap<String, String>>,
    reject_writes: Cell<bool>,
    writes: Cell<u64>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `set` fail with `KvError::WriteRejected`.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u64 {
        self.writes.get()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        if self.reject_writes.get() {
            return Err(KvError::WriteRejected(key.to_string()));
        }
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
