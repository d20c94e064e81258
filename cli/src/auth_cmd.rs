use anyhow::Result;
use anyhow::bail;
use chrono::Utc;
use saferoute_backend_client::CredentialStore;
use saferoute_backend_client::types::RegisterFields;
use saferoute_backend_client::types::Role;
use saferoute_login::AuthOutcome;
use saferoute_login::parse_access_token;

use crate::context::AppContext;
use crate::render::print_json;

#[derive(Debug, clap::Parser)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long, env = "SAFEROUTE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, clap::Parser)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, env = "SAFEROUTE_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[arg(long)]
    pub gender: Option<String>,
}

#[derive(Debug, clap::Parser)]
pub struct ResetPasswordArgs {
    #[arg(long)]
    pub email: String,

    /// One-time password received by email.
    #[arg(long)]
    pub otp: String,

    #[arg(long)]
    pub new_password: String,
}

/// Print the outcome's message and fail the command if it did not succeed.
fn finish(outcome: AuthOutcome, success_message: &str) -> Result<()> {
    if !outcome.success {
        bail!(outcome.message.unwrap_or_default());
    }
    println!(
        "{}",
        outcome.message.as_deref().unwrap_or(success_message)
    );
    Ok(())
}

pub(crate) async fn run_login(ctx: &AppContext, args: LoginArgs) -> Result<()> {
    let outcome = ctx.auth.login(&args.email, &args.password).await;
    let signed_in_as = ctx
        .auth
        .current_user()
        .map(|user| format!("Signed in as {} ({}).", user.name, user.role))
        .unwrap_or_default();
    finish(outcome, &signed_in_as)
}

pub(crate) async fn run_register(ctx: &AppContext, args: RegisterArgs) -> Result<()> {
    let RegisterArgs {
        name,
        email,
        password,
        gender,
    } = args;
    let outcome = ctx
        .auth
        .register(&RegisterFields {
            name,
            email,
            password,
            gender,
        })
        .await;
    finish(outcome, "Account created. You are now signed in.")
}

pub(crate) async fn run_logout(ctx: &AppContext) -> Result<()> {
    let outcome = ctx.auth.logout().await;
    finish(outcome, "Signed out.")
}

pub(crate) fn run_whoami(ctx: &AppContext, json: bool) -> Result<()> {
    let user = ctx.require(Role::User)?;
    if json {
        return print_json(&user);
    }
    println!("{} <{}>", user.name, user.email);
    println!("role: {}", user.role);
    if let Some(token) = ctx.auth.store().access_token() {
        match parse_access_token(&token) {
            Ok(info) => {
                if let Some(expires_at) = info.expires_at {
                    let state = if info.is_expired_at(Utc::now()) {
                        "expired"
                    } else {
                        "expires"
                    };
                    println!("session {state} {}", expires_at.format("%Y-%m-%d %H:%M UTC"));
                }
            }
            Err(err) => tracing::debug!("access token is not a readable JWT: {err}"),
        }
    }
    Ok(())
}

pub(crate) async fn run_forgot_password(ctx: &AppContext, email: &str) -> Result<()> {
    let outcome = ctx.auth.forgot_password(email).await;
    finish(outcome, "OTP sent. Check your email.")
}

pub(crate) async fn run_reset_password(ctx: &AppContext, args: ResetPasswordArgs) -> Result<()> {
    let outcome = ctx
        .auth
        .reset_password(&args.email, &args.otp, &args.new_password)
        .await;
    finish(outcome, "Password updated. You can sign in now.")
}
