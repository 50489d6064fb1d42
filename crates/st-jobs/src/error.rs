use thiserror::Error;

use crate::runner::PollTarget;

/// Ways a job loop can end without a terminal job state.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("session expired, run `savetime auth login` ({0})")]
    Auth(String),

    /// Consecutive transient failures exceeded the retry budget.
    #[error("polling failed after {attempts} consecutive errors: {message}")]
    Transport { attempts: u32, message: String },

    /// The server rejected the call with a non-retryable error.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The server answered with a payload the protocol cannot interpret.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("{target} still running after {polls} polls")]
    Timeout { target: PollTarget, polls: u32 },
}

impl From<st_core::CoreError> for JobError {
    fn from(error: st_core::CoreError) -> Self {
        Self::Protocol(error.to_string())
    }
}
