//! Typed accessors over the key/value store
//!
//! Every read tolerates absence, malformed content and an unavailable store
//! by returning "no data". Every write swallows failures after logging them.

use super::KeyValueStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::StoredUser;
use std::sync::Arc;

/// Logical key names
pub mod keys {
    pub const AUTH_TOKEN: &str = "auth_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const USER: &str = "user";
    pub const WALLET_BALANCE: &str = "wallet_balance";
}

/// Result of reading the persisted user profile
///
/// Absent and malformed are kept apart because the greeting falls back
/// differently for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Profile {
    Missing,
    Malformed,
    Found(StoredUser),
}

/// Handle to client-local persisted state
#[derive(Clone)]
pub struct PersistedState {
    store: Arc<dyn KeyValueStore>,
}

impl PersistedState {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Raw string value; `None` when absent or unreadable
    pub fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Storage read failed, using default");
                None
            }
        }
    }

    /// Store a raw string value; returns whether it was written
    pub fn write(&self, key: &str, value: &str) -> bool {
        match self.store.set(key, value) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Storage write skipped");
                false
            }
        }
    }

    /// Remove a key; returns whether the store accepted it
    pub fn remove(&self, key: &str) -> bool {
        match self.store.remove(key) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Storage remove skipped");
                false
            }
        }
    }

    /// JSON value; `None` when absent, unreadable or malformed
    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "Ignoring malformed persisted JSON");
                None
            }
        }
    }

    pub fn write_json<T: Serialize>(&self, key: &str, value: &T) -> bool {
        match serde_json::to_string(value) {
            Ok(raw) => self.write(key, &raw),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to serialize value for storage");
                false
            }
        }
    }

    // ========== Typed accessors ==========

    pub fn auth_token(&self) -> Option<String> {
        self.read(keys::AUTH_TOKEN).filter(|t| !t.is_empty())
    }

    pub fn set_auth_token(&self, token: &str) -> bool {
        self.write(keys::AUTH_TOKEN, token)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(keys::REFRESH_TOKEN)
    }

    pub fn set_refresh_token(&self, token: &str) -> bool {
        self.write(keys::REFRESH_TOKEN, token)
    }

    /// Persisted user profile
    pub fn user(&self) -> Profile {
        let Some(raw) = self.read(keys::USER) else {
            return Profile::Missing;
        };
        match serde_json::from_str::<StoredUser>(&raw) {
            Ok(user) => Profile::Found(user),
            Err(e) => {
                tracing::debug!(error = %e, "Persisted user profile is malformed");
                Profile::Malformed
            }
        }
    }

    pub fn set_user(&self, user: &StoredUser) -> bool {
        self.write_json(keys::USER, user)
    }

    /// Raw persisted wallet balance, unvalidated
    pub fn wallet_balance(&self) -> Option<String> {
        self.read(keys::WALLET_BALANCE)
    }

    pub fn set_wallet_balance(&self, balance: &str) -> bool {
        self.write(keys::WALLET_BALANCE, balance)
    }

    /// Drop token, refresh token and user profile
    pub fn clear_auth(&self) {
        for key in [keys::AUTH_TOKEN, keys::REFRESH_TOKEN, keys::USER] {
            self.remove(key);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError, StoreResult};

    /// Store whose every operation fails
    pub(crate) struct UnavailableStore;

    impl KeyValueStore for UnavailableStore {
        fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Err(StoreError::Unavailable("private mode".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Unavailable("private mode".into()))
        }

        fn remove(&self, _key: &str) -> StoreResult<()> {
            Err(StoreError::Unavailable("private mode".into()))
        }
    }

    #[test]
    fn test_unavailable_store_degrades_to_defaults() {
        let state = PersistedState::new(Arc::new(UnavailableStore));
        assert_eq!(state.auth_token(), None);
        assert_eq!(state.user(), Profile::Missing);
        assert!(!state.set_auth_token("abc"));
        assert!(!state.remove(keys::USER));
        // Must not panic
        state.clear_auth();
    }

    #[test]
    fn test_user_profile_states() {
        let store = Arc::new(MemoryStore::new());
        let state = PersistedState::new(store.clone());
        assert_eq!(state.user(), Profile::Missing);

        store.set(keys::USER, "{not json").unwrap();
        assert_eq!(state.user(), Profile::Malformed);

        let user = StoredUser {
            id: Some(3),
            username: Some("michaelw".into()),
            ..Default::default()
        };
        assert!(state.set_user(&user));
        assert_eq!(state.user(), Profile::Found(user));
    }

    #[test]
    fn test_empty_token_counts_as_absent() {
        let state = PersistedState::new(Arc::new(MemoryStore::with_entries([(
            keys::AUTH_TOKEN,
            "",
        )])));
        assert_eq!(state.auth_token(), None);
    }

    #[test]
    fn test_clear_auth_keeps_wallet() {
        let store = Arc::new(MemoryStore::with_entries([
            (keys::AUTH_TOKEN, "a"),
            (keys::REFRESH_TOKEN, "r"),
            (keys::USER, "{}"),
            (keys::WALLET_BALANCE, "100"),
        ]));
        let state = PersistedState::new(store.clone());
        state.clear_auth();
        assert_eq!(store.len(), 1);
        assert_eq!(state.wallet_balance().as_deref(), Some("100"));
    }
}
