//! Cross-cutting error types for SaveTime.
//!
//! Domain-specific errors (e.g., `ClientError`, `JobError`) are defined in
//! their respective crates and wrap this one where they need to.

use thiserror::Error;

/// Errors that can be raised by any SaveTime crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (unknown identifier, malformed payload).
    #[error("Validation error: {0}")]
    Validation(String),
}
