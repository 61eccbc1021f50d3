//! Client-local persisted state
//!
//! - **local**: redb-backed durable store
//! - **memory**: in-process store for tests and throwaway sessions
//! - **persisted**: typed accessors with default-value policies
//!
//! All three sit behind [`KeyValueStore`]. Callers above this module only
//! ever see [`PersistedState`], which turns every storage failure into a
//! logged default so that no screen is blocked by an unavailable store.

pub mod local;
pub mod memory;
pub mod persisted;

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use persisted::{PersistedState, Profile, keys};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// String key/value storage, the shape of browser local storage
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removing an absent key is not an error
    fn remove(&self, key: &str) -> StoreResult<()>;
}
