//! Shared HTTP response helpers.
//!
//! Centralizes status mapping so the endpoint modules only build requests
//! and decode bodies.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use st_auth::SessionContext;

use crate::error::ClientError;

const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Map a response onto success or a [`ClientError`].
///
/// - **401** clears `session` and yields [`ClientError::Unauthorized`].
/// - **429** yields [`ClientError::RateLimited`], honoring `Retry-After`
///   seconds (60 s when absent or unparseable).
/// - Any other non-success yields [`ClientError::Request`] with the detail
///   from [`error_detail`].
pub async fn check_response(
    resp: reqwest::Response,
    session: &SessionContext,
) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED {
        session.invalidate();
        return Err(ClientError::Unauthorized);
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ClientError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !status.is_success() {
        let reason = status.canonical_reason().unwrap_or("request failed");
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Request {
            status: status.as_u16(),
            detail: error_detail(&body, reason),
        });
    }
    Ok(resp)
}

fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// Human-readable detail of an error body.
///
/// Tries the `detail` string, then the first `detail[].msg` or
/// `detail[].message`, then the raw JSON body, then `reason`.
pub fn error_detail(body: &str, reason: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return reason.to_string();
    };

    match json.get("detail") {
        Some(Value::String(detail)) if !detail.trim().is_empty() => {
            return detail.trim().to_string();
        }
        Some(Value::Array(entries)) => {
            let first = entries.iter().find_map(|entry| {
                ["msg", "message"]
                    .iter()
                    .find_map(|key| entry.get(*key).and_then(Value::as_str))
                    .filter(|text| !text.trim().is_empty())
            });
            if let Some(text) = first {
                return text.trim().to_string();
            }
        }
        _ => {}
    }

    if json.is_null() {
        reason.to_string()
    } else {
        body.trim().to_string()
    }
}

/// Read a success body as JSON. An empty body is `null`.
pub async fn read_json(resp: reqwest::Response) -> Result<Value, ClientError> {
    let text = resp.text().await?;
    parse_body(&text)
}

pub fn parse_body(text: &str) -> Result<Value, ClientError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| ClientError::Parse(format!("response is not JSON: {e}")))
}

/// Decode an already-read body into `T`.
pub fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|e| ClientError::Parse(format!("unexpected {what}: {e}")))
}

/// Append `pairs` to `url` as a percent-encoded query string.
pub fn with_query<K, V>(url: &str, pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    if pairs.is_empty() {
        return url.to_string();
    }
    let query = pairs
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k.as_ref()),
                urlencoding::encode(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&");
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}
