//! Job polling configuration.

use serde::{Deserialize, Serialize};

const fn default_interval_ms() -> u64 {
    1600
}

/// 900 polls at 1.6 s is roughly 24 minutes.
const fn default_max_polls() -> u32 {
    900
}

const fn default_max_transient_failures() -> u32 {
    5
}

const fn default_backoff_multiplier() -> f64 {
    2.0
}

const fn default_max_backoff_ms() -> u64 {
    30_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollingConfig {
    /// Delay between status polls, in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Maximum number of polls before giving up. `0` disables the cap.
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,

    /// Consecutive transient failures tolerated before the loop aborts.
    #[serde(default = "default_max_transient_failures")]
    pub max_transient_failures: u32,

    /// Growth factor of the retry delay after each consecutive failure.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Upper bound on the retry delay, in milliseconds.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_polls: default_max_polls(),
            max_transient_failures: default_max_transient_failures(),
            backoff_multiplier: default_backoff_multiplier(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}
