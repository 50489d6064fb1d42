//! The transport seam between the polling protocol and the HTTP client.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

/// A unit of analysis work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobPayload {
    /// Sent as JSON `{"text": ...}`.
    Text(String),
    /// Sent as a multipart `file` part.
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    /// Submission path. `None` uses the configured default for the payload kind.
    pub endpoint: Option<String>,
    pub payload: JobPayload,
    /// Sent as JSON text in a multipart `config` part. File uploads only.
    pub config: Option<Value>,
}

impl JobRequest {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            endpoint: None,
            payload: JobPayload::Text(text.into()),
            config: None,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            endpoint: None,
            payload: JobPayload::File(path.into()),
            config: None,
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }
}

/// How the polling loop should react to a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Credentials rejected; abort at once.
    Auth,
    /// Network failure, 429 or 5xx; retry with backoff.
    Transient,
    /// Anything else; abort.
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendFailure {
    pub kind: FailureKind,
    pub message: String,
    /// Server-requested wait before the next attempt.
    pub retry_after: Option<Duration>,
}

impl BackendFailure {
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Auth, message)
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Transient, message)
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Fatal, message)
    }

    fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retry_after: None,
        }
    }

    #[must_use]
    pub const fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = Some(retry_after);
        self
    }
}

impl fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Raw job endpoints. Responses are returned as untyped JSON; the runner
/// classifies them.
#[async_trait]
pub trait JobBackend: Send + Sync {
    /// Submit a request and return the raw response body.
    async fn submit(&self, request: &JobRequest) -> Result<Value, BackendFailure>;

    /// Fetch one job record.
    async fn fetch_job(&self, job_id: &str) -> Result<Value, BackendFailure>;

    /// Fetch `GET /tasks/{id}`.
    async fn fetch_task(&self, task_id: &str) -> Result<Value, BackendFailure>;
}
