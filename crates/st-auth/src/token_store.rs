use std::sync::Arc;

use chrono::{DateTime, Utc};
use st_core::identity::UserProfile;

use crate::credential::Credential;
use crate::error::AuthError;
use crate::storage::CredentialStorage;

/// Storage key of the credential.
pub const TOKEN_KEY: &str = "sa_auth_token";
/// Storage key of the cached user profile.
pub const PROFILE_KEY: &str = "sa_user";

/// Holder of the auth credential and cached profile.
///
/// Expiry is checked lazily on read; there is no background timer.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn CredentialStorage>,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}

impl TokenStore {
    pub fn new(storage: Arc<dyn CredentialStorage>) -> Self {
        Self { storage }
    }

    /// Persist `token` valid for `expires_in_secs` from now.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the credential cannot be written.
    pub fn set_token(&self, token: &str, expires_in_secs: u64) -> Result<Credential, AuthError> {
        self.set_token_at(token, expires_in_secs, Utc::now())
    }

    /// [`Self::set_token`] with an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the credential cannot be written.
    pub fn set_token_at(
        &self,
        token: &str,
        expires_in_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<Credential, AuthError> {
        let credential = Credential::issue(token, expires_in_secs, now);
        self.storage
            .write(TOKEN_KEY, &serde_json::to_string(&credential)?)?;
        tracing::debug!(expires_at = credential.expires_at, "stored credential");
        Ok(credential)
    }

    /// The token, if a live credential is stored.
    #[must_use]
    pub fn get_token(&self) -> Option<String> {
        self.get_token_at(Utc::now())
    }

    #[must_use]
    pub fn get_token_at(&self, now: DateTime<Utc>) -> Option<String> {
        self.credential_at(now).map(|credential| credential.token)
    }

    /// The stored credential if it is live at `now`.
    ///
    /// An expired or unreadable credential is cleared (with the profile) and
    /// reported as absent.
    #[must_use]
    pub fn credential_at(&self, now: DateTime<Utc>) -> Option<Credential> {
        let raw = match self.storage.read(TOKEN_KEY) {
            Ok(raw) => raw?,
            Err(error) => {
                tracing::warn!(%error, "failed to read stored credential");
                return None;
            }
        };

        match serde_json::from_str::<Credential>(&raw) {
            Ok(credential) if credential.is_live_at(now) => Some(credential),
            Ok(credential) => {
                tracing::info!(expires_at = credential.expires_at, "stored credential expired");
                self.clear_quietly();
                None
            }
            Err(error) => {
                tracing::warn!(%error, "discarding malformed stored credential");
                self.clear_quietly();
                None
            }
        }
    }

    /// Remove the credential and the cached profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if either entry cannot be removed.
    pub fn clear_token(&self) -> Result<(), AuthError> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(PROFILE_KEY)
    }

    /// # Errors
    ///
    /// Returns `AuthError` if the profile cannot be written.
    pub fn cache_profile(&self, profile: &UserProfile) -> Result<(), AuthError> {
        self.storage
            .write(PROFILE_KEY, &serde_json::to_string(profile)?)
    }

    /// Cached profile. A malformed entry reads as absent.
    #[must_use]
    pub fn cached_profile(&self) -> Option<UserProfile> {
        let raw = self.storage.read(PROFILE_KEY).ok()??;
        serde_json::from_str(&raw)
            .inspect_err(|error| tracing::warn!(%error, "ignoring malformed cached profile"))
            .ok()
    }

    fn clear_quietly(&self) {
        if let Err(error) = self.clear_token() {
            tracing::warn!(%error, "failed to clear stored credential");
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::storage::MemoryStorage;

    fn at(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).expect("valid timestamp")
    }

    fn store() -> (Arc<MemoryStorage>, TokenStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = TokenStore::new(storage.clone());
        (storage, store)
    }

    fn profile() -> UserProfile {
        serde_json::from_value(serde_json::json!({ "id": 1, "phone": "13800000000" }))
            .expect("profile")
    }

    #[test]
    fn live_token_is_returned() {
        let (_, store) = store();
        store.set_token_at("abc", 60, at(0)).expect("set");
        assert_eq!(store.get_token_at(at(59_999)).as_deref(), Some("abc"));
    }

    #[test]
    fn expired_token_is_cleared_with_profile() {
        let (storage, store) = store();
        store.set_token_at("abc", 60, at(0)).expect("set");
        store.cache_profile(&profile()).expect("cache");

        assert_eq!(store.get_token_at(at(60_001)), None);
        assert_eq!(storage.read(TOKEN_KEY).expect("read"), None);
        assert_eq!(storage.read(PROFILE_KEY).expect("read"), None);
    }

    #[test]
    fn malformed_credential_is_cleared() {
        let (storage, store) = store();
        storage.write(TOKEN_KEY, "not json").expect("write");
        assert_eq!(store.get_token_at(at(0)), None);
        assert_eq!(storage.read(TOKEN_KEY).expect("read"), None);
    }

    #[test]
    fn profile_roundtrips_and_clears() {
        let (_, store) = store();
        store.cache_profile(&profile()).expect("cache");
        assert_eq!(store.cached_profile(), Some(profile()));
        store.clear_token().expect("clear");
        assert_eq!(store.cached_profile(), None);
    }

    #[test]
    fn last_writer_wins() {
        let (_, store) = store();
        store.set_token_at("first", 60, at(0)).expect("set");
        store.set_token_at("second", 60, at(0)).expect("set");
        assert_eq!(store.get_token_at(at(1)).as_deref(), Some("second"));
    }
}
