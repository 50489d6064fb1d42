//! Expired credentials are never handed out and are cleared on read.

use std::sync::Arc;

use chrono::{Duration, Utc};
use st_auth::token_store::{PROFILE_KEY, TOKEN_KEY};
use st_auth::{Credential, CredentialStorage, FileStorage, SessionContext, TokenStore};

#[test]
fn past_expiry_is_never_returned_and_is_cleared() {
    let tmp = tempfile::TempDir::new().expect("tmp dir");
    let storage = Arc::new(FileStorage::new(tmp.path()));
    let stale = Credential {
        token: "stale".into(),
        expires_at: (Utc::now() - Duration::minutes(5)).timestamp_millis(),
    };
    storage
        .write(TOKEN_KEY, &serde_json::to_string(&stale).expect("encode"))
        .expect("write token");
    storage
        .write(PROFILE_KEY, r#"{"id":1,"phone":"13800000000"}"#)
        .expect("write profile");

    let store = TokenStore::new(storage.clone());
    assert_eq!(store.get_token(), None);
    assert!(!storage.path_for(TOKEN_KEY).exists());
    assert!(!storage.path_for(PROFILE_KEY).exists());
}

#[test]
fn file_session_survives_reopen() {
    let tmp = tempfile::TempDir::new().expect("tmp dir");

    let first = SessionContext::with_file_storage(tmp.path(), 3600);
    first
        .token_store()
        .set_token("persisted", 600)
        .expect("set token");

    let reopened = SessionContext::with_file_storage(tmp.path(), 3600);
    assert_eq!(reopened.bearer_token().as_deref(), Some("persisted"));

    reopened.invalidate();
    assert_eq!(first.bearer_token(), None);
}
