//! Live-API implementations of the job and search transport traits.

use async_trait::async_trait;
use serde_json::Value;
use st_core::SearchEntity;
use st_core::search::SearchPage;
use st_jobs::{BackendFailure, JobBackend, JobPayload, JobRequest};
use st_search::{SearchBackend, SearchError};

use crate::{ApiClient, ClientError};

impl From<ClientError> for BackendFailure {
    fn from(error: ClientError) -> Self {
        let message = error.to_string();
        if matches!(error, ClientError::Unauthorized) {
            return Self::auth(message);
        }
        if error.is_transient() {
            let failure = Self::transient(message);
            return match error.retry_after() {
                Some(delay) => failure.with_retry_after(delay),
                None => failure,
            };
        }
        Self::fatal(message)
    }
}

impl From<ClientError> for SearchError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Unauthorized => Self::Unauthorized(error.to_string()),
            other => Self::Request(other.to_string()),
        }
    }
}

#[async_trait]
impl JobBackend for ApiClient {
    async fn submit(&self, request: &JobRequest) -> Result<Value, BackendFailure> {
        let endpoint = request.endpoint.as_deref();
        let response = match &request.payload {
            JobPayload::Text(text) => self.submit_text(text, endpoint).await,
            JobPayload::File(path) => {
                self.submit_file(path, endpoint, request.config.as_ref())
                    .await
            }
        };
        Ok(response?)
    }

    async fn fetch_job(&self, job_id: &str) -> Result<Value, BackendFailure> {
        Ok(self.job(job_id).await?)
    }

    async fn fetch_task(&self, task_id: &str) -> Result<Value, BackendFailure> {
        Ok(self.task_value(task_id).await?)
    }
}

#[async_trait]
impl SearchBackend for ApiClient {
    async fn search(
        &self,
        entity: SearchEntity,
        params: &[(String, String)],
    ) -> Result<SearchPage, SearchError> {
        Ok(self.search_page(entity, params).await?)
    }
}
