use rusqlite::{Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{StorageError, StorageResult};

/// Key under which the whole note collection is stored.
pub const NOTES_KEY: &str = "notes";

/// Minimal get/set persistence capability, one string value per key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}

pub struct SqliteStore {
    db: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> StorageResult<Self> {
        let db = Connection::open(path)?;
        create_tables(&db)?;
        Ok(Self { db })
    }

    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Connection::open_in_memory()?;
        create_tables(&db)?;
        Ok(Self { db })
    }
}

pub fn create_tables(db: &Connection) -> rusqlite::Result<()> {
    db.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .db
            .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.db.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }
}

/// In-process store, used as a test double and when the database cannot be opened.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Every `set` fails while this is on; reads keep working.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::WriteRejected(key.to_string()));
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_set_overwrites_previous_value() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get(NOTES_KEY).unwrap(), None);

        store.set(NOTES_KEY, "[]").unwrap();
        store.set(NOTES_KEY, "[1]").unwrap();
        assert_eq!(store.get(NOTES_KEY).unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn memory_store_can_reject_writes() {
        let mut store = MemoryStore::with_value(NOTES_KEY, "[]");
        store.set_fail_writes(true);
        assert!(matches!(
            store.set(NOTES_KEY, "[2]"),
            Err(StorageError::WriteRejected(_))
        ));
        assert_eq!(store.raw(NOTES_KEY).as_deref(), Some("[]"));
    }
}
