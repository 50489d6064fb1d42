//! API endpoint configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_timeout_secs() -> u64 {
    60
}

fn default_analyze_text_endpoint() -> String {
    "/analyze/text".to_string()
}

fn default_analyze_file_endpoint() -> String {
    "/analyze/file".to_string()
}

fn default_jobs_endpoint() -> String {
    "/jobs".to_string()
}

fn default_workload_endpoint() -> String {
    "/workload/analyze".to_string()
}

fn default_costing_endpoint() -> String {
    "/costing/analyze".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the SaveTime API (e.g., `https://api.example.com/api`).
    #[serde(default)]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Submission path for text analysis.
    #[serde(default = "default_analyze_text_endpoint")]
    pub analyze_text_endpoint: String,

    /// Submission path for file analysis.
    #[serde(default = "default_analyze_file_endpoint")]
    pub analyze_file_endpoint: String,

    /// Collection path for analysis jobs; a job lives at `{jobs_endpoint}/{id}`.
    #[serde(default = "default_jobs_endpoint")]
    pub jobs_endpoint: String,

    /// Upload path for workload splitting. The server answers with a task.
    #[serde(default = "default_workload_endpoint")]
    pub workload_endpoint: String,

    /// Upload path for cost estimation. The server answers with a task.
    #[serde(default = "default_costing_endpoint")]
    pub costing_endpoint: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: default_timeout_secs(),
            analyze_text_endpoint: default_analyze_text_endpoint(),
            analyze_file_endpoint: default_analyze_file_endpoint(),
            jobs_endpoint: default_jobs_endpoint(),
            workload_endpoint: default_workload_endpoint(),
            costing_endpoint: default_costing_endpoint(),
        }
    }
}

impl ApiConfig {
    pub fn is_configured(&self) -> bool {
        !self.base_url.trim().is_empty()
    }

    /// Base URL without a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when no base URL is set, and
    /// [`ConfigError::InvalidValue`] when it is not an http(s) URL.
    pub fn require_base_url(&self) -> Result<&str, ConfigError> {
        let base = self.base_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "api".into(),
                hint: "set SAVETIME_API__BASE_URL or api.base_url in config.toml".into(),
            });
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".into(),
                reason: format!("'{base}' is not an http(s) URL"),
            });
        }
        Ok(base)
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Path of one job under [`Self::jobs_endpoint`], with `suffix` appended.
    pub fn job_path(&self, encoded_id: &str, suffix: &str) -> String {
        format!(
            "{}/{encoded_id}{suffix}",
            self.jobs_endpoint.trim_end_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = ApiConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.analyze_text_endpoint, "/analyze/text");
        assert_eq!(config.analyze_file_endpoint, "/analyze/file");
        assert_eq!(config.jobs_endpoint, "/jobs");
        assert_eq!(config.workload_endpoint, "/workload/analyze");
        assert_eq!(config.costing_endpoint, "/costing/analyze");
        assert!(matches!(
            config.require_base_url(),
            Err(ConfigError::NotConfigured { .. })
        ));
    }

    #[test]
    fn base_url_is_trimmed() {
        let config = ApiConfig {
            base_url: " https://api.example.com/api/ ".into(),
            ..Default::default()
        };
        assert_eq!(
            config.require_base_url().expect("configured"),
            "https://api.example.com/api"
        );
    }

    #[test]
    fn job_paths_hang_off_the_jobs_endpoint() {
        let config = ApiConfig {
            jobs_endpoint: "/bidding/jobs/".into(),
            ..Default::default()
        };
        assert_eq!(config.job_path("42", ""), "/bidding/jobs/42");
        assert_eq!(config.job_path("42", "/source"), "/bidding/jobs/42/source");
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let config = ApiConfig {
            base_url: "ftp://files".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.require_base_url(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
