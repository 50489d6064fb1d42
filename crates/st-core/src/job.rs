//! Job payloads and classification of the initial submission response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::AnalysisResult;
use crate::enums::JobStatus;
use crate::errors::CoreError;
use crate::normalize::normalize_result;
use crate::wire;

/// Error text used when the server reports failure without a message.
pub const DEFAULT_FAILURE_MESSAGE: &str = "analysis failed";

/// One observation of a server-side job, as returned by submission or by
/// `GET /jobs/{id}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JobSnapshot {
    #[serde(default, deserialize_with = "wire::opt_id")]
    pub job_id: Option<String>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default, alias = "error_message", deserialize_with = "wire::opt_text")]
    pub error: Option<String>,
    #[serde(default)]
    pub has_source_text: Option<bool>,
}

impl JobSnapshot {
    /// Parse a raw response body. `null` and non-object bodies are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] when the body is not a JSON object.
    pub fn from_value(raw: Value) -> Result<Self, CoreError> {
        if !raw.is_object() {
            return Err(CoreError::Validation(format!(
                "expected a job object, got {}",
                type_name(&raw)
            )));
        }
        serde_json::from_value(raw)
            .map_err(|error| CoreError::Validation(format!("malformed job payload: {error}")))
    }

    /// Logical status, treating a missing status as still processing.
    #[must_use]
    pub fn effective_status(&self) -> JobStatus {
        self.status.unwrap_or(JobStatus::Processing)
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.has_result() || self.effective_status().is_terminal()
    }

    #[must_use]
    pub fn has_result(&self) -> bool {
        self.result.as_ref().is_some_and(|value| !value.is_null())
    }

    /// Server error text, or [`DEFAULT_FAILURE_MESSAGE`].
    #[must_use]
    pub fn failure_message(&self) -> String {
        self.error
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(DEFAULT_FAILURE_MESSAGE)
            .to_string()
    }

    /// Normalized result; an absent result normalizes to the empty schema.
    #[must_use]
    pub fn normalized_result(&self) -> AnalysisResult {
        self.result
            .as_ref()
            .map_or_else(AnalysisResult::empty, normalize_result)
    }
}

/// What the initial submission response tells the client to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The result came back inline; no polling.
    Completed {
        job_id: Option<String>,
        result: AnalysisResult,
    },
    /// The job failed at submission time.
    Failed {
        job_id: Option<String>,
        error: String,
    },
    /// A job was queued; poll it by id.
    Pending { job_id: String, status: JobStatus },
    /// The upload created a task record instead of a job; follow it under
    /// `/tasks/{id}`.
    Task { task_id: String, status: JobStatus },
}

impl Submission {
    /// Classify the body of a submission response.
    ///
    /// A non-null `result` always wins. A body with no `status`, no `job_id`
    /// and no `result` is the legacy inline form and is normalized whole. A
    /// body carrying a task `id` and `task_type` but no `job_id` is a task.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for non-object bodies and for a
    /// non-terminal status that carries no `job_id`.
    pub fn classify(raw: Value) -> Result<Self, CoreError> {
        if let Some(task) = Self::task_receipt(&raw) {
            return Ok(task);
        }

        let legacy_inline = raw.is_object()
            && ["status", "job_id", "result"]
                .iter()
                .all(|key| raw.get(*key).is_none_or(Value::is_null));
        if legacy_inline {
            return Ok(Self::Completed {
                job_id: None,
                result: normalize_result(&raw),
            });
        }

        let snapshot = JobSnapshot::from_value(raw)?;
        Self::from_snapshot(snapshot)
    }

    /// Classify an already-parsed snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for a non-terminal status without a
    /// `job_id`.
    pub fn from_snapshot(snapshot: JobSnapshot) -> Result<Self, CoreError> {
        if snapshot.has_result() {
            let result = snapshot.normalized_result();
            return Ok(Self::Completed {
                job_id: snapshot.job_id,
                result,
            });
        }

        match snapshot.effective_status() {
            JobStatus::Failed => Ok(Self::Failed {
                error: snapshot.failure_message(),
                job_id: snapshot.job_id,
            }),
            JobStatus::Completed => Ok(Self::Completed {
                job_id: snapshot.job_id,
                result: AnalysisResult::empty(),
            }),
            status => snapshot
                .job_id
                .map(|job_id| Self::Pending { job_id, status })
                .ok_or_else(|| {
                    CoreError::Validation(format!(
                        "server reported status '{status}' without a job id"
                    ))
                }),
        }
    }

    fn task_receipt(raw: &Value) -> Option<Self> {
        let absent = |key: &str| raw.get(key).is_none_or(Value::is_null);
        if !absent("job_id") || !absent("result") || absent("task_type") {
            return None;
        }
        let task_id = match raw.get("id")? {
            Value::String(id) if !id.trim().is_empty() => id.trim().to_string(),
            Value::Number(id) => id.to_string(),
            _ => return None,
        };
        let status = raw
            .get("status")
            .and_then(Value::as_str)
            .map_or(JobStatus::Pending, JobStatus::from_wire);
        Some(Self::Task { task_id, status })
    }

    /// Id of the analysis job, if the server assigned one. Tasks have none.
    #[must_use]
    pub fn job_id(&self) -> Option<&str> {
        match self {
            Self::Completed { job_id, .. } | Self::Failed { job_id, .. } => job_id.as_deref(),
            Self::Pending { job_id, .. } => Some(job_id),
            Self::Task { .. } => None,
        }
    }
}

/// One row of `GET {jobs}`: a job without its result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(deserialize_with = "wire::id")]
    pub job_id: String,
    #[serde(default)]
    pub status: Option<JobStatus>,
    /// `text` or `file`.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_id")]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub text_length: Option<u64>,
    /// Epoch seconds.
    #[serde(default)]
    pub created_at: Option<f64>,
    #[serde(default)]
    pub started_at: Option<f64>,
    #[serde(default)]
    pub completed_at: Option<f64>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default, deserialize_with = "wire::opt_text")]
    pub error: Option<String>,
    #[serde(default)]
    pub has_source_text: bool,
}

/// Envelope of the job list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JobList {
    #[serde(default)]
    pub jobs: Vec<JobRecord>,
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
