//! Analysis submission and job endpoints.
//!
//! Job paths hang off `api.jobs_endpoint`, e.g. `/bidding/jobs/{id}`.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;
use st_core::excerpt::{SourceRange, SourceSnippet};
use st_core::job::{JobList, JobRecord};

use crate::http::{decode, with_query};
use crate::{ApiClient, ClientError};

#[derive(Debug, Serialize)]
struct TextSubmission<'a> {
    text: &'a str,
    async_mode: bool,
}

impl ApiClient {
    /// `POST` text for analysis in async mode. `endpoint` defaults to the
    /// configured text endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport or status failures.
    pub async fn submit_text(&self, text: &str, endpoint: Option<&str>) -> Result<Value, ClientError> {
        let endpoint = endpoint.unwrap_or(&self.config().analyze_text_endpoint);
        self.post_json(
            endpoint,
            &TextSubmission {
                text,
                async_mode: true,
            },
        )
        .await
    }

    /// Upload a file for analysis in async mode. `config`, when given, goes
    /// out as JSON text in a `config` part; the workload and costing
    /// endpoints read their options from it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] when the file cannot be read.
    pub async fn submit_file(
        &self,
        path: &Path,
        endpoint: Option<&str>,
        config: Option<&Value>,
    ) -> Result<Value, ClientError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |name| name.to_string_lossy().into_owned());

        let mut form = Form::new()
            .text("async_mode", "true")
            .part("file", Part::bytes(bytes).file_name(file_name));
        if let Some(config) = config {
            form = form.text("config", config.to_string());
        }

        let endpoint = endpoint.unwrap_or(&self.config().analyze_file_endpoint);
        let url = with_query(&self.url(endpoint), &[("async_mode", "true")]);
        tracing::debug!(%url, file = %path.display(), "POST multipart");
        self.send(self.post(&url).multipart(form)).await
    }

    /// Jobs owned by the current user, newest first, without results.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status or decode failures.
    pub async fn jobs(&self) -> Result<Vec<JobRecord>, ClientError> {
        let body = self
            .get_json::<&str, &str>(&self.config().jobs_endpoint, &[])
            .await?;
        let list: JobList = decode(body, "job list")?;
        Ok(list.jobs)
    }

    /// One job, raw.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport or status failures.
    pub async fn job(&self, job_id: &str) -> Result<Value, ClientError> {
        self.get_json::<&str, &str>(&self.job_path(job_id, ""), &[])
            .await
    }

    /// Delete a job. Returns whether the server acknowledged it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Request`] with status 404 for unknown ids.
    pub async fn delete_job(&self, job_id: &str) -> Result<bool, ClientError> {
        let body = self.delete_json(&self.job_path(job_id, "")).await?;
        Ok(body.get("ok").and_then(Value::as_bool).unwrap_or(true))
    }

    /// Source text of a job around `range`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Request`] when the job kept no source text.
    pub async fn source_snippet(
        &self,
        job_id: &str,
        range: SourceRange,
        window: u32,
    ) -> Result<SourceSnippet, ClientError> {
        let path = self.job_path(job_id, "/source");
        let body = self.get_json(&path, &range.query_pairs(window)).await?;
        decode(body, "source snippet")
    }

    fn job_path(&self, job_id: &str, suffix: &str) -> String {
        self.config()
            .job_path(&urlencoding::encode(job_id), suffix)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use st_auth::SessionContext;
    use st_config::ApiConfig;

    use super::*;

    #[test]
    fn job_urls_follow_the_configured_collection() {
        let config = ApiConfig {
            base_url: "https://api.example.com/api".into(),
            jobs_endpoint: "/bidding/jobs".into(),
            ..ApiConfig::default()
        };
        let client = ApiClient::new(&config, SessionContext::in_memory()).expect("client");
        assert_eq!(
            client.url(&client.job_path("a/b", "/source")),
            "https://api.example.com/api/bidding/jobs/a%2Fb/source"
        );
        assert_eq!(
            client.url(&client.job_path("42", "")),
            "https://api.example.com/api/bidding/jobs/42"
        );
    }
}
