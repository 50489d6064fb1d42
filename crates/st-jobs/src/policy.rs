use std::time::Duration;

use st_config::PollingConfig;

/// Timing and bounds of a polling loop.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `0` means no cap.
    pub max_polls: u32,
    pub max_transient_failures: u32,
    pub backoff_multiplier: f64,
    pub max_backoff: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from(&PollingConfig::default())
    }
}

impl From<&PollingConfig> for PollPolicy {
    fn from(config: &PollingConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.interval_ms),
            max_polls: config.max_polls,
            max_transient_failures: config.max_transient_failures,
            backoff_multiplier: config.backoff_multiplier,
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        }
    }
}

impl PollPolicy {
    /// Delay before retrying after `consecutive_failures` failures in a row:
    /// `interval * multiplier^n`, capped at `max_backoff`. A server-supplied
    /// `Retry-After` raises the delay but never past the cap.
    pub fn retry_delay(&self, consecutive_failures: u32, retry_after: Option<Duration>) -> Duration {
        let exponent = i32::try_from(consecutive_failures).unwrap_or(i32::MAX);
        let factor = self.backoff_multiplier.max(1.0).powi(exponent);
        let scaled = self.interval.as_secs_f64() * factor;
        let cap = self.max_backoff.max(self.interval);
        let backoff = if scaled.is_finite() && scaled < cap.as_secs_f64() {
            Duration::from_secs_f64(scaled)
        } else {
            cap
        };
        retry_after.map_or(backoff, |hint| backoff.max(hint).min(cap))
    }

    /// Whether `polls` has reached the cap.
    pub const fn exhausted(&self, polls: u32) -> bool {
        self.max_polls > 0 && polls >= self.max_polls
    }
}
