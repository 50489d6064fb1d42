use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated, run `savetime auth login`")]
    NotAuthenticated,

    #[error("session expired, run `savetime auth login`")]
    TokenExpired,

    #[error("token store error: {0}")]
    TokenStoreError(String),

    #[error("credential encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
