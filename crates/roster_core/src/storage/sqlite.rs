//! SQLite-backed slots in the `kv_slots` table.

use super::{KvResult, KvStore};
use crate::db::migrations::latest_version;
use crate::db::DbError;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

/// Durable slot store owning one migrated connection.
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    ///
    /// Rejects connections whose schema was not migrated to the current
    /// version, so slot queries never run against a missing table.
    pub fn try_new(conn: Connection) -> KvResult<Self> {
        let version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let expected = latest_version();
        if version != expected {
            return Err(DbError::SchemaNotMigrated {
                db_version: version,
                expected,
            }
            .into());
        }
        Ok(Self { conn })
    }

    /// Borrows the underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl KvStore for SqliteKvStore {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        debug!(
            "event=kv_set module=storage status=ok backend=sqlite bytes={}",
            value.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteKvStore;
    use crate::db::{open_db_in_memory, DbError};
    use crate::storage::{KvError, KvStore};
    use rusqlite::Connection;

    #[test]
    fn get_missing_slot_returns_none() {
        let store = SqliteKvStore::try_new(open_db_in_memory().unwrap()).unwrap();
        assert_eq!(store.get("students").unwrap(), None);
    }

    #[test]
    fn set_overwrites_whole_slot() {
        let store = SqliteKvStore::try_new(open_db_in_memory().unwrap()).unwrap();
        store.set("students", "[1]").unwrap();
        store.set("students", "[]").unwrap();

        assert_eq!(store.get("students").unwrap().as_deref(), Some("[]"));
        let rows: i64 = store
            .conn()
            .query_row("SELECT COUNT(*) FROM kv_slots;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn try_new_rejects_unmigrated_connection() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteKvStore::try_new(conn).err().unwrap();
        assert!(matches!(
            err,
            KvError::Db(DbError::SchemaNotMigrated { db_version: 0, .. })
        ));
    }
}
