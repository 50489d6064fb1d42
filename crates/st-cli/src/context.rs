use anyhow::Context;
use st_auth::SessionContext;
use st_client::ApiClient;
use st_config::SaveTimeConfig;

/// Shared state for command handlers.
pub struct AppContext {
    pub config: SaveTimeConfig,
    pub session: SessionContext,
}

impl AppContext {
    /// Open the file-backed session under the configured credentials
    /// directory.
    ///
    /// # Errors
    ///
    /// Fails when no credentials directory can be determined.
    pub fn init(config: SaveTimeConfig) -> anyhow::Result<Self> {
        let dir = config.auth.credentials_dir().context(
            "cannot locate a home directory for credentials; set auth.credentials_dir",
        )?;
        tracing::debug!(dir = %dir.display(), "using credential directory");
        let session = SessionContext::with_file_storage(dir, config.auth.default_expires_in_secs);
        Ok(Self { config, session })
    }

    /// HTTP client sharing this context's session.
    ///
    /// # Errors
    ///
    /// Fails when `api.base_url` is missing or malformed.
    pub fn client(&self) -> anyhow::Result<ApiClient> {
        ApiClient::new(&self.config.api, self.session.clone())
            .context("cannot reach the SaveTime API")
    }
}

/// Warn when `SAVETIME_*` variables are set but the API section still
/// holds defaults, which usually means a single underscore was used.
pub fn warn_unconfigured(config: &SaveTimeConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &SaveTimeConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let mut warnings = Vec::new();

    if !config.api.is_configured() && has_env_prefix(&env_keys, "SAVETIME_API") {
        warnings.push(
            "API config appears default while SAVETIME_API* env vars exist. Use double underscores (example: SAVETIME_API__BASE_URL)."
                .to_string(),
        );
    }

    if has_env_prefix(&env_keys, "SAVETIME_POLLING_")
        && !has_env_prefix(&env_keys, "SAVETIME_POLLING__")
    {
        warnings.push(
            "SAVETIME_POLLING_* env vars are ignored. Use double underscores (example: SAVETIME_POLLING__INTERVAL_MS)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use st_config::{ApiConfig, SaveTimeConfig};

    use super::collect_unconfigured_warnings;

    #[test]
    fn warns_for_single_underscore_keys() {
        let warnings = collect_unconfigured_warnings(
            &SaveTimeConfig::default(),
            vec![
                ("SAVETIME_API_BASE_URL".to_string(), "https://x".to_string()),
                ("SAVETIME_POLLING_INTERVAL_MS".to_string(), "500".to_string()),
            ],
        );
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn configured_api_is_quiet() {
        let config = SaveTimeConfig {
            api: ApiConfig {
                base_url: "https://api.example.com".into(),
                ..ApiConfig::default()
            },
            ..SaveTimeConfig::default()
        };
        let warnings = collect_unconfigured_warnings(
            &config,
            vec![(
                "SAVETIME_API__BASE_URL".to_string(),
                "https://api.example.com".to_string(),
            )],
        );
        assert!(warnings.is_empty());
    }
}
