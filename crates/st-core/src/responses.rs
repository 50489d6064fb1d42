//! CLI response types returned as JSON by `savetime` commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::AnalysisResult;
use crate::enums::{JobStatus, SearchEntity};
use crate::excerpt::SourceSnippet;
use crate::identity::UserProfile;

/// Response from `savetime auth status`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AuthStatusResponse {
    pub logged_in: bool,
    /// Expiry of the stored credential, epoch milliseconds.
    pub expires_at: Option<i64>,
    pub profile: Option<UserProfile>,
}

/// Response from `savetime auth logout`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LogoutResponse {
    pub cleared: bool,
}

/// Response from `savetime analyze`, `savetime job status` and `savetime job wait`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JobResponse {
    pub job_id: Option<String>,
    pub status: JobStatus,
    pub result: Option<AnalysisResult>,
    pub error: Option<String>,
    /// Number of status polls issued.
    pub polls: u32,
}

/// Response from `savetime analyze workload|costing` and `savetime task wait`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TaskRunResponse {
    pub task_id: String,
    pub status: JobStatus,
    /// `result_payload` of a finished task, as the server sent it.
    pub result: Option<Value>,
    pub error: Option<String>,
    pub polls: u32,
}

/// Response from `savetime job delete`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct JobDeleteResponse {
    pub job_id: String,
    pub deleted: bool,
}

/// Response from `savetime auth change-password` and `savetime auth reset`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PasswordResponse {
    pub changed: bool,
    /// Whether the server issued a new session.
    pub logged_in: bool,
    /// Expiry of the new credential, epoch milliseconds.
    pub expires_at: Option<i64>,
}

/// Response from `savetime job source`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SourceViewResponse {
    pub job_id: String,
    pub snippet: SourceSnippet,
    /// Excerpt the context was searched for.
    pub excerpt: String,
    pub located: bool,
    pub rendered: String,
}

/// Response from `savetime search`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SearchResponse {
    pub entity: SearchEntity,
    pub query: String,
    pub page: u32,
    pub offset: u32,
    pub limit: u32,
    pub total: u64,
    pub has_more: bool,
    pub results: Vec<Value>,
}
