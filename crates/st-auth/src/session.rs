use std::sync::Arc;

use st_core::identity::{LoginGrant, UserProfile};

use crate::credential::Credential;
use crate::error::AuthError;
use crate::storage::{CredentialStorage, FileStorage, MemoryStorage};
use crate::token_store::TokenStore;

/// Injectable session shared by the HTTP client and the front end.
///
/// Cloning is cheap; clones observe the same storage, so a 401 seen by one
/// caller invalidates the session for all of them.
#[derive(Debug, Clone)]
pub struct SessionContext {
    store: TokenStore,
    default_expires_in_secs: u64,
}

impl SessionContext {
    pub fn new(storage: Arc<dyn CredentialStorage>, default_expires_in_secs: u64) -> Self {
        Self {
            store: TokenStore::new(storage),
            default_expires_in_secs,
        }
    }

    /// Session persisted as JSON files under `dir`.
    pub fn with_file_storage(dir: impl Into<std::path::PathBuf>, default_expires_in_secs: u64) -> Self {
        Self::new(Arc::new(FileStorage::new(dir)), default_expires_in_secs)
    }

    /// Session that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), 3600)
    }

    pub const fn token_store(&self) -> &TokenStore {
        &self.store
    }

    /// Token to send as `Authorization: Bearer`, if one is live.
    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        self.store.get_token()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.bearer_token().is_some()
    }

    /// Persist a login grant. A grant without `expires_in` uses the
    /// configured default lifetime.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Other` for an empty token, or a storage error.
    pub fn store_grant(&self, grant: &LoginGrant) -> Result<Credential, AuthError> {
        if grant.access_token.trim().is_empty() {
            return Err(AuthError::Other("login response carried an empty token".into()));
        }
        let expires_in = grant.expires_in.unwrap_or(self.default_expires_in_secs);
        self.store.set_token(&grant.access_token, expires_in)
    }

    /// Drop all auth state. Called on logout and on any 401.
    pub fn invalidate(&self) {
        match self.store.clear_token() {
            Ok(()) => tracing::info!("session invalidated"),
            Err(error) => tracing::warn!(%error, "failed to clear session"),
        }
    }

    /// # Errors
    ///
    /// Returns `AuthError` if the profile cannot be written.
    pub fn cache_profile(&self, profile: &UserProfile) -> Result<(), AuthError> {
        self.store.cache_profile(profile)
    }

    #[must_use]
    pub fn profile(&self) -> Option<UserProfile> {
        self.store.cached_profile()
    }

    /// Fail fast when no live credential exists.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` without a live token.
    pub fn require_token(&self) -> Result<String, AuthError> {
        self.bearer_token().ok_or(AuthError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn grant(token: &str, expires_in: Option<u64>) -> LoginGrant {
        LoginGrant {
            access_token: token.into(),
            token_type: "bearer".into(),
            expires_in,
        }
    }

    #[test]
    fn stored_grant_becomes_bearer_token() {
        let session = SessionContext::in_memory();
        assert_eq!(session.bearer_token(), None);

        session.store_grant(&grant("jwt-1", Some(120))).expect("store");
        assert_eq!(session.bearer_token().as_deref(), Some("jwt-1"));
        assert!(session.is_authenticated());
    }

    #[test]
    fn missing_expiry_uses_default_lifetime() {
        let session = SessionContext::new(Arc::new(MemoryStorage::new()), 7200);
        let before = chrono::Utc::now().timestamp_millis();
        let credential = session.store_grant(&grant("jwt", None)).expect("store");
        assert!(credential.expires_at >= before + 7_200_000);
    }

    #[test]
    fn empty_grant_is_rejected() {
        let session = SessionContext::in_memory();
        assert!(session.store_grant(&grant("  ", Some(60))).is_err());
        assert!(matches!(
            session.require_token(),
            Err(AuthError::NotAuthenticated)
        ));
    }

    #[test]
    fn invalidate_is_seen_by_clones() {
        let session = SessionContext::in_memory();
        let shared = session.clone();
        session.store_grant(&grant("jwt", Some(60))).expect("store");

        shared.invalidate();
        assert_eq!(session.bearer_token(), None);
    }
}
