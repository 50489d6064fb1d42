use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bearer token with an absolute expiry.
///
/// On disk this is `{"token": "...", "expiresAt": <epoch millis>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: i64,
}

impl Credential {
    /// A credential for `token` valid for `expires_in_secs` from `now`.
    #[must_use]
    pub fn issue(token: impl Into<String>, expires_in_secs: u64, now: DateTime<Utc>) -> Self {
        let lifetime_ms = i64::try_from(expires_in_secs)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);
        Self {
            token: token.into(),
            expires_at: now.timestamp_millis().saturating_add(lifetime_ms),
        }
    }

    /// Live while `now <= expiresAt`.
    #[must_use]
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && now.timestamp_millis() <= self.expires_at
    }

    #[must_use]
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.expires_at)
    }
}
