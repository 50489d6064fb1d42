//! `/auth` endpoints.

use serde_json::Value;
use st_core::identity::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginGrant, LoginRequest, RegisterRequest,
    ResetPasswordRequest, ResetTicket, UserProfile, validate_new_password, validate_phone,
};

use crate::http::decode;
use crate::{ApiClient, ClientError};

impl ApiClient {
    /// Log in and store the grant in the session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Request`] for rejected credentials,
    /// [`ClientError::Auth`] when the grant cannot be stored.
    pub async fn login(&self, phone: &str, password: &str) -> Result<LoginGrant, ClientError> {
        let body = self
            .post_json("/auth/login", &LoginRequest { phone, password })
            .await?;
        let grant: LoginGrant = decode(body, "login response")?;
        self.session().store_grant(&grant)?;
        tracing::info!("logged in");
        Ok(grant)
    }

    /// Create an account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Request`] when the phone is already registered.
    pub async fn register(
        &self,
        phone: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<UserProfile, ClientError> {
        let body = self
            .post_json(
                "/auth/register",
                &RegisterRequest {
                    phone,
                    password,
                    full_name,
                },
            )
            .await?;
        decode(body, "user record")
    }

    /// Fetch the current user and cache it in the session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] without a valid session.
    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        let body = self.get_json::<&str, &str>("/auth/me", &[]).await?;
        let profile: UserProfile = decode(body, "user record")?;
        self.session().cache_profile(&profile)?;
        Ok(profile)
    }

    /// Change the password of the logged-in user. The server answers with
    /// a fresh grant, which replaces the stored one.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Invalid`] when the new password is too weak,
    /// [`ClientError::Request`] when the current password is wrong.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<LoginGrant, ClientError> {
        validate_new_password(new_password)?;
        let body = self
            .post_json(
                "/auth/change-password",
                &ChangePasswordRequest {
                    current_password,
                    new_password,
                },
            )
            .await?;
        let grant: LoginGrant = decode(body, "password change response")?;
        self.session().store_grant(&grant)?;
        tracing::info!("password changed");
        Ok(grant)
    }

    /// Ask for a reset token for `phone`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Invalid`] for a malformed phone number.
    pub async fn forgot_password(&self, phone: &str) -> Result<ResetTicket, ClientError> {
        validate_phone(phone)?;
        let body = self
            .post_json("/auth/forgot-password", &ForgotPasswordRequest { phone })
            .await?;
        decode(body, "reset ticket")
    }

    /// Set a new password with a reset token. When the server also logs the
    /// user in, the grant is stored and returned.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Invalid`] for a malformed phone, an empty token
    /// or a weak password, and [`ClientError::Request`] for an expired token.
    pub async fn reset_password(
        &self,
        phone: &str,
        reset_token: &str,
        new_password: &str,
    ) -> Result<Option<LoginGrant>, ClientError> {
        validate_phone(phone)?;
        if reset_token.trim().is_empty() {
            return Err(st_core::CoreError::Validation("reset token is required".into()).into());
        }
        validate_new_password(new_password)?;

        let body = self
            .post_json(
                "/auth/reset-password",
                &ResetPasswordRequest {
                    phone,
                    reset_token: reset_token.trim(),
                    new_password,
                },
            )
            .await?;
        let grant = reset_grant(body)?;
        if let Some(grant) = &grant {
            self.session().store_grant(grant)?;
            tracing::info!("password reset; logged in");
        }
        Ok(grant)
    }

    /// Forget the local session. The server keeps no session state.
    pub fn logout(&self) {
        self.session().invalidate();
    }
}

/// A reset answer may or may not carry a new session.
fn reset_grant(body: Value) -> Result<Option<LoginGrant>, ClientError> {
    let has_token = body
        .get("access_token")
        .and_then(Value::as_str)
        .is_some_and(|token| !token.trim().is_empty());
    if !has_token {
        return Ok(None);
    }
    decode(body, "password reset response").map(Some)
}
