use st_core::SearchEntity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("'{key}' is not a {entity} filter (accepted: {accepted})")]
    UnknownFilter {
        entity: SearchEntity,
        key: String,
        accepted: String,
    },

    #[error("invalid value for filter '{key}': {reason}")]
    InvalidFilter { key: String, reason: String },

    #[error("{entity} search needs a query or at least one filter")]
    EmptyQuery { entity: SearchEntity },

    #[error("session expired, run `savetime auth login` ({0})")]
    Unauthorized(String),

    #[error("search request failed: {0}")]
    Request(String),
}
