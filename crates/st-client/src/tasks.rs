//! `/tasks` endpoints.

use serde_json::Value;
use st_core::task::{TaskDetail, TaskListResponse, TaskSummary};

use crate::http::decode;
use crate::{ApiClient, ClientError};

/// Filters for the active task list.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub limit: Option<u32>,
    pub task_type: Option<String>,
    pub status: Option<String>,
}

impl TaskQuery {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(task_type) = self.task_type.as_deref().filter(|t| !t.is_empty()) {
            pairs.push(("task_type", task_type.to_string()));
        }
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("status_filter", status.to_string()));
        }
        pairs
    }
}

impl ApiClient {
    /// Active (non-archived) tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status or decode failures.
    pub async fn tasks(&self, query: &TaskQuery) -> Result<Vec<TaskSummary>, ClientError> {
        let body = self.get_json("/tasks", &query.pairs()).await?;
        let list: TaskListResponse = decode(body, "task list")?;
        Ok(list.items)
    }

    /// Finished tasks. Status filtering is not supported by the server here.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status or decode failures.
    pub async fn task_history(&self, query: &TaskQuery) -> Result<Vec<TaskSummary>, ClientError> {
        let query = TaskQuery {
            status: None,
            ..query.clone()
        };
        let body = self.get_json("/tasks/history", &query.pairs()).await?;
        let list: TaskListResponse = decode(body, "task history")?;
        Ok(list.items)
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Request`] with status 404 for unknown ids.
    pub async fn task(&self, task_id: &str) -> Result<TaskDetail, ClientError> {
        decode(self.task_value(task_id).await?, "task detail")
    }

    /// `GET /tasks/{id}`, raw.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport or status failures.
    pub async fn task_value(&self, task_id: &str) -> Result<Value, ClientError> {
        let path = format!("/tasks/{}", urlencoding::encode(task_id));
        self.get_json::<&str, &str>(&path, &[]).await
    }
}
