//! Server-side analysis task records (`/tasks`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::JobStatus;
use crate::errors::CoreError;
use crate::wire;

/// Error text used when a task fails without a message.
pub const DEFAULT_TASK_FAILURE: &str = "task failed";

/// Known task types. The server may add more; unknown values are kept as-is.
pub const TASK_TYPES: &[(&str, &str)] = &[
    ("bidding_analysis", "Bid analysis"),
    ("workload_analysis", "Workload split"),
    ("costing_estimate", "Cost estimate"),
];

/// Human label for a task type, falling back to the raw value.
#[must_use]
pub fn task_type_label(task_type: &str) -> &str {
    TASK_TYPES
        .iter()
        .find(|(key, _)| *key == task_type)
        .map_or(task_type, |&(_, label)| label)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    pub task_type: String,
    /// Raw status: `pending`, `running`, `succeeded` or `failed`.
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub summary: TaskSummary,
    #[serde(default)]
    pub request_payload: Option<Value>,
    #[serde(default)]
    pub result_payload: Option<Value>,
}

impl TaskDetail {
    /// Parse a raw `GET /tasks/{id}` body.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] when the body is not a task record.
    pub fn from_value(raw: Value) -> Result<Self, CoreError> {
        serde_json::from_value(raw)
            .map_err(|error| CoreError::Validation(format!("malformed task payload: {error}")))
    }

    /// Logical status. `running` folds to processing, `succeeded` to completed.
    #[must_use]
    pub fn status(&self) -> JobStatus {
        JobStatus::from_wire(&self.summary.status)
    }

    /// Server error text, or [`DEFAULT_TASK_FAILURE`].
    #[must_use]
    pub fn failure_message(&self) -> String {
        self.summary
            .error_message
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(DEFAULT_TASK_FAILURE)
            .to_string()
    }
}

/// Envelope of `GET /tasks` and `GET /tasks/history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListResponse {
    #[serde(default)]
    pub items: Vec<TaskSummary>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn labels_known_types_and_passes_through_unknown() {
        assert_eq!(task_type_label("costing_estimate"), "Cost estimate");
        assert_eq!(task_type_label("translation"), "translation");
    }

    #[test]
    fn detail_flattens_summary_fields() {
        let detail: TaskDetail = serde_json::from_value(json!({
            "id": 12,
            "task_type": "bidding_analysis",
            "status": "failed",
            "created_at": "2024-05-01T08:00:00",
            "updated_at": "2024-05-01T08:01:00",
            "error_message": "analysis failed",
            "result_payload": { "job_id": "42" },
        }))
        .expect("detail");
        assert_eq!(detail.summary.id, "12");
        assert_eq!(detail.summary.error_message.as_deref(), Some("analysis failed"));
        assert_eq!(detail.result_payload, Some(json!({ "job_id": "42" })));
        assert!(detail.request_payload.is_none());
        assert_eq!(detail.status(), JobStatus::Failed);
        assert_eq!(detail.failure_message(), "analysis failed");
    }

    #[test]
    fn running_task_is_still_processing() {
        let detail = TaskDetail::from_value(json!({
            "id": "17",
            "task_type": "costing_estimate",
            "status": "running",
            "error_message": " ",
        }))
        .expect("detail");
        assert_eq!(detail.status(), JobStatus::Processing);
        assert!(!detail.status().is_terminal());
        assert_eq!(detail.failure_message(), DEFAULT_TASK_FAILURE);
    }

    #[test]
    fn body_without_task_fields_is_rejected() {
        assert!(TaskDetail::from_value(json!({ "status": "running" })).is_err());
    }
}
