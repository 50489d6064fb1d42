use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Log in with phone and password.
    Login(AuthLoginArgs),
    /// Create an account.
    Register(AuthRegisterArgs),
    /// Clear stored credentials.
    Logout,
    /// Show current auth status.
    Status(AuthStatusArgs),
    /// Change the password of the logged-in account.
    ChangePassword(AuthChangePasswordArgs),
    /// Request a password reset token for a phone number.
    Forgot(AuthForgotArgs),
    /// Set a new password with a reset token.
    Reset(AuthResetArgs),
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Clone, Debug, Args)]
pub struct AuthRegisterArgs {
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub password: String,
    /// Display name.
    #[arg(long)]
    pub full_name: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AuthStatusArgs {
    /// Confirm the token with `GET /auth/me`.
    #[arg(long)]
    pub remote: bool,
}

#[derive(Clone, Debug, Args)]
pub struct AuthChangePasswordArgs {
    #[arg(long)]
    pub current: String,
    /// At least 8 characters with a letter and a digit.
    #[arg(long)]
    pub new: String,
}

#[derive(Clone, Debug, Args)]
pub struct AuthForgotArgs {
    #[arg(long)]
    pub phone: String,
}

#[derive(Clone, Debug, Args)]
pub struct AuthResetArgs {
    #[arg(long)]
    pub phone: String,
    /// Token from `savetime auth forgot`.
    #[arg(long)]
    pub token: String,
    #[arg(long)]
    pub new: String,
}
