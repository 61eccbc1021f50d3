//! Auth context - login state kept in persisted storage
//!
//! Access is a presence check of the stored token; validity is never
//! verified locally.

use crate::store::{PersistedState, Profile};
use shared::{LoginResponse, StoredUser};

/// Label used when no usable profile is stored
pub const ANONYMOUS_CUSTOMER_LABEL: &str = "Customer - 12345678";

const FALLBACK_CUSTOMER_ID: &str = "12345678";

#[derive(Clone)]
pub struct AuthContext {
    state: PersistedState,
}

impl AuthContext {
    pub fn new(state: PersistedState) -> Self {
        Self { state }
    }

    /// Persist a successful login
    ///
    /// Returns `false` when the response carries no token; nothing is stored
    /// in that case.
    pub fn record_login(&self, response: &LoginResponse) -> bool {
        let Some(token) = response.bearer_token().filter(|t| !t.is_empty()) else {
            tracing::warn!("Login response without token, ignoring");
            return false;
        };

        self.state.set_auth_token(token);
        if let Some(refresh) = response.refresh_token.as_deref() {
            self.state.set_refresh_token(refresh);
        }
        self.state.set_user(&response.to_stored_user());

        tracing::info!(
            user_id = ?response.id,
            username = ?response.username,
            "Login recorded"
        );
        true
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.auth_token().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.state.auth_token()
    }

    pub fn logout(&self) {
        self.state.clear_auth();
        tracing::info!("Logged out");
    }

    /// Greeting name, upper-cased
    ///
    /// `None` when no profile is stored, `USER` when the profile is
    /// malformed or has no usable name.
    pub fn display_name(&self) -> Option<String> {
        match self.state.user() {
            Profile::Missing => None,
            Profile::Malformed => Some("USER".to_string()),
            Profile::Found(user) => Some(
                non_empty(&user.first_name)
                    .or_else(|| non_empty(&user.username))
                    .or_else(|| non_empty(&user.email))
                    .unwrap_or("User")
                    .to_uppercase(),
            ),
        }
    }

    /// `"{first last} -{id}"` for payment records and receipts
    pub fn customer_label(&self) -> String {
        match self.state.user() {
            Profile::Found(user) => label_for(&user),
            Profile::Missing | Profile::Malformed => ANONYMOUS_CUSTOMER_LABEL.to_string(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn label_for(user: &StoredUser) -> String {
    let full_name = format!(
        "{} {}",
        user.first_name.as_deref().unwrap_or_default(),
        user.last_name.as_deref().unwrap_or_default()
    );
    let full_name = full_name.trim();

    let name = if full_name.is_empty() {
        non_empty(&user.username).unwrap_or("Customer")
    } else {
        full_name
    };
    let id = match user.id {
        Some(id) if id != 0 => id.to_string(),
        _ => FALLBACK_CUSTOMER_ID.to_string(),
    };

    format!("{} -{}", name, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::persisted::tests::UnavailableStore;
    use crate::store::{KeyValueStore, MemoryStore, keys};
    use std::sync::Arc;

    fn context() -> (Arc<MemoryStore>, AuthContext) {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthContext::new(PersistedState::new(store.clone()));
        (store, auth)
    }

    fn emily() -> LoginResponse {
        LoginResponse {
            id: Some(1),
            username: Some("emilys".into()),
            email: Some("emily.johnson@x.dummyjson.com".into()),
            first_name: Some("Emily".into()),
            last_name: Some("Johnson".into()),
            access_token: Some("access".into()),
            refresh_token: Some("refresh".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_login_then_logout() {
        let (store, auth) = context();
        assert!(!auth.is_authenticated());

        assert!(auth.record_login(&emily()));
        assert!(auth.is_authenticated());
        assert_eq!(auth.token().as_deref(), Some("access"));
        assert_eq!(
            store.get(keys::REFRESH_TOKEN).unwrap().as_deref(),
            Some("refresh")
        );
        assert_eq!(auth.display_name().as_deref(), Some("EMILY"));
        assert_eq!(auth.customer_label(), "Emily Johnson -1");

        auth.logout();
        assert!(!auth.is_authenticated());
        assert!(store.is_empty());
        assert_eq!(auth.customer_label(), ANONYMOUS_CUSTOMER_LABEL);
    }

    #[test]
    fn test_legacy_token_field() {
        let (_, auth) = context();
        let response = LoginResponse {
            token: Some("legacy".into()),
            ..Default::default()
        };
        assert!(auth.record_login(&response));
        assert_eq!(auth.token().as_deref(), Some("legacy"));
    }

    #[test]
    fn test_login_without_token_is_ignored() {
        let (store, auth) = context();
        let response = LoginResponse {
            id: Some(4),
            ..Default::default()
        };
        assert!(!auth.record_login(&response));
        assert!(store.is_empty());
    }

    #[test]
    fn test_name_fallbacks() {
        let (store, auth) = context();
        assert_eq!(auth.display_name(), None);

        store
            .set(keys::USER, r#"{"username":"michaelw","id":0}"#)
            .unwrap();
        assert_eq!(auth.display_name().as_deref(), Some("MICHAELW"));
        assert_eq!(auth.customer_label(), "michaelw -12345678");

        store.set(keys::USER, r#"{"email":"a@b.c"}"#).unwrap();
        assert_eq!(auth.display_name().as_deref(), Some("A@B.C"));
        assert_eq!(auth.customer_label(), "Customer -12345678");

        store.set(keys::USER, "{}").unwrap();
        assert_eq!(auth.display_name().as_deref(), Some("USER"));

        store.set(keys::USER, r#"{"lastName":"Smith","id":9}"#).unwrap();
        assert_eq!(auth.customer_label(), "Smith -9");
    }

    #[test]
    fn test_malformed_profile() {
        let (store, auth) = context();
        store.set(keys::USER, "{\"firstName\":").unwrap();
        assert_eq!(auth.display_name().as_deref(), Some("USER"));
        assert_eq!(auth.customer_label(), ANONYMOUS_CUSTOMER_LABEL);
    }

    #[test]
    fn test_unavailable_storage_counts_as_logged_out() {
        let auth = AuthContext::new(PersistedState::new(Arc::new(UnavailableStore)));
        assert!(!auth.record_login(&LoginResponse::default()));
        auth.record_login(&emily());
        assert!(!auth.is_authenticated());
        assert_eq!(auth.customer_label(), ANONYMOUS_CUSTOMER_LABEL);
        auth.logout();
    }
}
