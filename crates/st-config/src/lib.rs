//! # st-config
//!
//! Layered configuration loading for SaveTime using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SAVETIME_*` prefix, `__` as separator)
//! 2. Project-level `.savetime/config.toml`
//! 3. User-level `~/.config/savetime/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SAVETIME_API__BASE_URL` -> `api.base_url`,
//! `SAVETIME_POLLING__INTERVAL_MS` -> `polling.interval_ms`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use st_config::SaveTimeConfig;
//!
//! let config = SaveTimeConfig::load_with_dotenv().expect("config");
//! if config.api.is_configured() {
//!     println!("API: {}", config.api.base_url);
//! }
//! ```

mod api;
mod auth;
mod error;
mod polling;
mod search;

pub use api::ApiConfig;
pub use auth::AuthConfig;
pub use error::ConfigError;
pub use polling::PollingConfig;
pub use search::SearchConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Prefix of every environment override.
pub const ENV_PREFIX: &str = "SAVETIME_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SaveTimeConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl SaveTimeConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source fails to parse and
    /// [`ConfigError::InvalidValue`] when a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".savetime/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values the polling and search code cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: &str| {
            Err(ConfigError::InvalidValue {
                field: field.to_string(),
                reason: reason.to_string(),
            })
        };

        if self.polling.interval_ms == 0 {
            return invalid("polling.interval_ms", "must be greater than zero");
        }
        if !self.polling.backoff_multiplier.is_finite() || self.polling.backoff_multiplier < 1.0 {
            return invalid("polling.backoff_multiplier", "must be a finite number >= 1.0");
        }
        if self.polling.max_backoff_ms < self.polling.interval_ms {
            return invalid("polling.max_backoff_ms", "must not be below polling.interval_ms");
        }
        if self.search.page_size == 0 {
            return invalid("search.page_size", "must be greater than zero");
        }
        if self.api.timeout_secs == 0 {
            return invalid("api.timeout_secs", "must be greater than zero");
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("savetime").join("config.toml"))
    }

    /// Load `.env` from the current directory, then from the crate's
    /// workspace root when running under cargo. Missing files are ignored.
    fn load_dotenv() {
        if dotenvy::dotenv().is_ok() {
            return;
        }
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }
    }
}
