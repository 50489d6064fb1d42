//! Client error types.

use std::path::PathBuf;
use std::time::Duration;

use st_auth::AuthError;
use st_config::ConfigError;
use thiserror::Error;

/// Errors from talking to the SaveTime API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the credential. The session has already been
    /// cleared when this is returned.
    #[error("session expired, run `savetime auth login`")]
    Unauthorized,

    /// 429 Too Many Requests.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Any other non-success status.
    #[error("API error ({status}): {detail}")]
    Request { status: u16, detail: String },

    /// Transport failure: DNS, connect, TLS, timeout.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A success body that is not valid JSON or not the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Input refused before anything was sent.
    #[error("invalid input: {0}")]
    Invalid(#[from] st_core::CoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ClientError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::Request { status, .. } => *status >= 500 || *status == 408,
            Self::Network(error) => !error.is_builder() && !error.is_decode(),
            _ => false,
        }
    }

    /// Server-suggested wait before the next attempt.
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after_secs } => Some(Duration::from_secs(*retry_after_secs)),
            _ => None,
        }
    }
}
