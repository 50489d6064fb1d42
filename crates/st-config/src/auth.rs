//! Credential storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const fn default_expires_in_secs() -> u64 {
    3600
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Directory holding the token and profile files. Empty means
    /// `~/.savetime`.
    #[serde(default)]
    pub credentials_dir: String,

    /// Token lifetime assumed when the login response omits `expires_in`.
    #[serde(default = "default_expires_in_secs")]
    pub default_expires_in_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            credentials_dir: String::new(),
            default_expires_in_secs: default_expires_in_secs(),
        }
    }
}

impl AuthConfig {
    /// Resolved credentials directory, or `None` when no home directory
    /// can be determined and none is configured.
    pub fn credentials_dir(&self) -> Option<PathBuf> {
        let configured = self.credentials_dir.trim();
        if configured.is_empty() {
            dirs::home_dir().map(|home| home.join(".savetime"))
        } else {
            Some(PathBuf::from(configured))
        }
    }
}
