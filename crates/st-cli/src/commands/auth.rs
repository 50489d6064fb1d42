use chrono::Utc;
use serde::Serialize;
use st_core::identity::UserProfile;
use st_core::responses::{AuthStatusResponse, LogoutResponse, PasswordResponse};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;
use crate::cli::subcommands::auth::{
    AuthChangePasswordArgs, AuthLoginArgs, AuthRegisterArgs, AuthResetArgs, AuthStatusArgs,
};
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct LoginResponse {
    logged_in: bool,
    token_type: String,
    expires_at: i64,
    profile: Option<UserProfile>,
}

/// Handle `savetime auth <subcommand>`.
pub async fn handle(action: &AuthCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login(args) => login(args, ctx, flags).await,
        AuthCommands::Register(args) => register(args, ctx, flags).await,
        AuthCommands::Logout => logout(ctx, flags),
        AuthCommands::Status(args) => status(args, ctx, flags).await,
        AuthCommands::ChangePassword(args) => change_password(args, ctx, flags).await,
        AuthCommands::Forgot(args) => {
            let ticket = ctx.client()?.forgot_password(&args.phone).await?;
            output(&ticket, flags.format)
        }
        AuthCommands::Reset(args) => reset(args, ctx, flags).await,
    }
}

async fn login(args: &AuthLoginArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let grant = client.login(&args.phone, &args.password).await?;

    // The token is stored; a failing profile fetch only loses the greeting.
    let profile = match client.me().await {
        Ok(profile) => Some(profile),
        Err(error) => {
            tracing::warn!(%error, "logged in but could not fetch the profile");
            None
        }
    };

    let expires_at = ctx
        .session
        .token_store()
        .credential_at(Utc::now())
        .map_or(0, |credential| credential.expires_at);

    output(
        &LoginResponse {
            logged_in: true,
            token_type: grant.token_type,
            expires_at,
            profile,
        },
        flags.format,
    )
}

async fn register(args: &AuthRegisterArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let profile = client
        .register(&args.phone, &args.password, args.full_name.as_deref())
        .await?;
    output(&profile, flags.format)
}

async fn change_password(
    args: &AuthChangePasswordArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    ctx.client()?.change_password(&args.current, &args.new).await?;
    output(&password_response(ctx, true), flags.format)
}

async fn reset(args: &AuthResetArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let grant = ctx
        .client()?
        .reset_password(&args.phone, &args.token, &args.new)
        .await?;
    output(&password_response(ctx, grant.is_some()), flags.format)
}

fn password_response(ctx: &AppContext, logged_in: bool) -> PasswordResponse {
    let expires_at = logged_in
        .then(|| ctx.session.token_store().credential_at(Utc::now()))
        .flatten()
        .map(|credential| credential.expires_at);
    PasswordResponse {
        changed: true,
        logged_in,
        expires_at,
    }
}

fn logout(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.session.invalidate();
    output(&LogoutResponse { cleared: true }, flags.format)
}

async fn status(args: &AuthStatusArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let credential = ctx.session.token_store().credential_at(Utc::now());

    let profile = if args.remote && credential.is_some() {
        Some(ctx.client()?.me().await?)
    } else {
        ctx.session.profile()
    };

    // A remote 401 invalidates the session, so re-read before reporting.
    let credential = if args.remote {
        ctx.session.token_store().credential_at(Utc::now())
    } else {
        credential
    };

    let response = AuthStatusResponse {
        logged_in: credential.is_some(),
        expires_at: credential.as_ref().map(|credential| credential.expires_at),
        profile: credential.and(profile),
    };
    output(&response, flags.format)
}
