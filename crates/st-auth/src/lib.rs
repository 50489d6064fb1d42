//! # st-auth
//!
//! Credential handling for the SaveTime client.
//!
//! A [`TokenStore`] persists `{token, expiresAt}` through a pluggable
//! [`CredentialStorage`] and clears it lazily once it expires. A
//! [`SessionContext`] wraps the store for injection into the HTTP client.

pub mod credential;
pub mod error;
pub mod session;
pub mod storage;
pub mod token_store;

pub use credential::Credential;
pub use error::AuthError;
pub use session::SessionContext;
pub use storage::{CredentialStorage, FileStorage, MemoryStorage};
pub use token_store::TokenStore;
