//! # st-client
//!
//! HTTP client for the SaveTime REST API.
//!
//! [`ApiClient`] attaches the session's bearer token to every call, maps
//! statuses onto [`ClientError`] (a 401 also clears the session), and
//! exposes one method per endpoint:
//! - auth: login, register, me, password change and reset
//! - analysis: text and file submission, job status, list and delete,
//!   source snippets
//! - search: `GET /search/{entity}`
//! - tasks: active list, history, detail
//!
//! It also implements [`st_jobs::JobBackend`] and
//! [`st_search::SearchBackend`] so the polling and search state machines
//! can run against the live API.

pub mod analysis;
pub mod auth;
mod backends;
pub mod error;
pub mod http;
pub mod search;
pub mod tasks;

pub use error::ClientError;

use reqwest::RequestBuilder;
use serde::Serialize;
use serde_json::Value;
use st_auth::SessionContext;
use st_config::ApiConfig;

use crate::http::{check_response, read_json, with_query};

/// Client for one SaveTime deployment.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionContext,
    config: ApiConfig,
}

impl ApiClient {
    /// Build a client for `config.base_url` sharing `session`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when no usable base URL is set and
    /// [`ClientError::Network`] when the transport cannot be built.
    pub fn new(config: &ApiConfig, session: SessionContext) -> Result<Self, ClientError> {
        let base_url = config.require_base_url()?.to_string();
        let http = reqwest::Client::builder()
            .user_agent(concat!("savetime/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url,
            session,
            config: config.clone(),
        })
    }

    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path`. Paths that already carry a scheme are used
    /// as-is.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send `request` with auth and return the JSON body.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Value, ClientError> {
        let resp = self.authorize(request).send().await?;
        let resp = check_response(resp, &self.session).await?;
        read_json(resp).await
    }

    pub(crate) async fn get_json<K, V>(&self, path: &str, query: &[(K, V)]) -> Result<Value, ClientError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = with_query(&self.url(path), query);
        tracing::debug!(%url, "GET");
        self.send(self.http.get(&url)).await
    }

    pub(crate) async fn post_json<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ClientError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        self.send(self.http.post(&url).json(body)).await
    }

    pub(crate) async fn delete_json(&self, path: &str) -> Result<Value, ClientError> {
        let url = self.url(path);
        tracing::debug!(%url, "DELETE");
        self.send(self.http.delete(&url)).await
    }

    pub(crate) fn post(&self, url: &str) -> RequestBuilder {
        self.http.post(url)
    }
}
