//! redb-based local store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `kv` | logical name | string | token, refresh token, user JSON, wallet balance |
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate`: a value is on disk once
//! `set` returns. There is no cross-process coordination; the last writer
//! wins.

use super::{KeyValueStore, StoreResult};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::Path;
use std::sync::Arc;

/// Table for all persisted values: key = logical name, value = raw string
const KV_TABLE: TableDefinition<&str, &str> = TableDefinition::new("kv");

/// Durable key/value store backed by redb
#[derive(Clone)]
pub struct LocalStore {
    db: Arc<Database>,
}

impl LocalStore {
    /// Open or create the database at the given path
    ///
    /// The parent directory is created when missing.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        // Create the table up front so read transactions never miss it
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(KV_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Number of stored keys
    pub fn len(&self) -> StoreResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(KV_TABLE)?;
        Ok(table.len()?)
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(KV_TABLE)?;
        Ok(table.get(key)?.map(|guard| guard.value().to_string()))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(KV_TABLE)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(KV_TABLE)?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_in_memory_roundtrip() {
        let store = LocalStore::open_in_memory().unwrap();
        assert_eq!(store.get("wallet_balance").unwrap(), None);

        store.set("wallet_balance", "1500").unwrap();
        assert_eq!(store.get("wallet_balance").unwrap().as_deref(), Some("1500"));
        assert_eq!(store.len().unwrap(), 1);

        store.remove("wallet_balance").unwrap();
        assert_eq!(store.get("wallet_balance").unwrap(), None);
        // Removing again is fine
        store.remove("wallet_balance").unwrap();
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/checkout.redb");

        {
            let store = LocalStore::open(&path).unwrap();
            store.set("auth_token", "abc").unwrap();
            store.set("wallet_balance", "900").unwrap();
        }

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.get("auth_token").unwrap().as_deref(), Some("abc"));
        assert_eq!(store.get("wallet_balance").unwrap().as_deref(), Some("900"));
    }
}
