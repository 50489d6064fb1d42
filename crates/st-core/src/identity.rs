use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::wire;

/// Account record returned by `GET /auth/me` and `POST /auth/register`.
///
/// Cached next to the credential and cleared with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    pub phone: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

const fn default_active() -> bool {
    true
}

impl UserProfile {
    /// Name to greet the user with: full name when set, else the phone.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.phone)
    }
}

/// Bearer token issued by `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct LoginGrant {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime in seconds. Absent means the configured default applies.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub phone: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub phone: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<&'a str>,
}

/// Body of `POST /auth/change-password`. Answered with a fresh [`LoginGrant`].
#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
}

/// Body of `POST /auth/forgot-password`.
#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordRequest<'a> {
    pub phone: &'a str,
}

/// Answer to a reset request. Deployments that deliver the token out of
/// band leave both fields empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetTicket {
    #[serde(default, deserialize_with = "wire::opt_text")]
    pub reset_token: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_text")]
    pub expires_at: Option<String>,
}

/// Body of `POST /auth/reset-password`.
#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordRequest<'a> {
    pub phone: &'a str,
    pub reset_token: &'a str,
    pub new_password: &'a str,
}

/// Mainland mobile number: 11 digits, `1` then `3`-`9`.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] for anything else.
pub fn validate_phone(phone: &str) -> Result<(), CoreError> {
    let bytes = phone.as_bytes();
    let valid = bytes.len() == 11
        && bytes[0] == b'1'
        && (b'3'..=b'9').contains(&bytes[1])
        && bytes.iter().all(u8::is_ascii_digit);
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "'{phone}' is not an 11-digit mobile number"
        )))
    }
}

/// New passwords need at least 8 characters with a letter and a digit.
///
/// # Errors
///
/// Returns [`CoreError::Validation`] naming the rule that failed.
pub fn validate_new_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < 8 {
        return Err(CoreError::Validation(
            "new password must be at least 8 characters".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic())
        || !password.chars().any(|c| c.is_ascii_digit())
    {
        return Err(CoreError::Validation(
            "new password must contain a letter and a digit".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn profile_accepts_numeric_id_and_defaults() {
        let profile: UserProfile =
            serde_json::from_value(json!({ "id": 7, "phone": "13800000000" })).expect("profile");
        assert_eq!(profile.id, "7");
        assert!(profile.is_active);
        assert_eq!(profile.display_name(), "13800000000");
    }

    #[test]
    fn display_name_prefers_full_name() {
        let profile: UserProfile = serde_json::from_value(json!({
            "id": "u1",
            "phone": "13800000000",
            "full_name": "Li Wei",
            "is_active": false,
        }))
        .expect("profile");
        assert_eq!(profile.display_name(), "Li Wei");
        assert!(!profile.is_active);
    }

    #[test]
    fn grant_defaults_token_type() {
        let grant: LoginGrant =
            serde_json::from_value(json!({ "access_token": "abc", "expires_in": 3600 }))
                .expect("grant");
        assert_eq!(grant.token_type, "bearer");
        assert_eq!(grant.expires_in, Some(3600));
    }

    #[test]
    fn register_request_omits_missing_name() {
        let body = serde_json::to_value(RegisterRequest {
            phone: "1",
            password: "secret1",
            full_name: None,
        })
        .expect("serialize");
        assert_eq!(body, json!({ "phone": "1", "password": "secret1" }));
    }

    #[test]
    fn phone_must_be_a_mobile_number() {
        assert!(validate_phone("13800000000").is_ok());
        assert!(validate_phone("12800000000").is_err());
        assert!(validate_phone("1380000000").is_err());
        assert!(validate_phone("1380000000a").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn new_password_needs_length_letter_and_digit() {
        assert!(validate_new_password("abc12345").is_ok());
        assert!(validate_new_password("abc1234").is_err());
        assert!(validate_new_password("abcdefgh").is_err());
        assert!(validate_new_password("12345678").is_err());
    }

    #[test]
    fn reset_ticket_accepts_numeric_expiry() {
        let ticket: ResetTicket = serde_json::from_value(json!({
            "reset_token": "r-1",
            "expires_at": 1_714_550_400_000_u64,
        }))
        .expect("ticket");
        assert_eq!(ticket.reset_token.as_deref(), Some("r-1"));
        assert_eq!(ticket.expires_at.as_deref(), Some("1714550400000"));

        let empty: ResetTicket = serde_json::from_value(json!({ "ok": true })).expect("ticket");
        assert_eq!(empty, ResetTicket::default());
    }
}
