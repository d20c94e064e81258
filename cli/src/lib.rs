mod admin_cmd;
mod auth_cmd;
pub mod config_command;
mod contacts_cmd;
mod context;
mod feedback_cmd;
mod render;
mod routes_cmd;
mod sos_cmd;

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use saferoute_common::CliConfigOverrides;
use saferoute_common::Config;
use tracing_subscriber::EnvFilter;

pub use admin_cmd::AdminCommand;
pub use auth_cmd::LoginArgs;
pub use auth_cmd::RegisterArgs;
pub use auth_cmd::ResetPasswordArgs;
pub use contacts_cmd::ContactsCommand;
pub use feedback_cmd::FeedbackCommand;
pub use routes_cmd::RoutesArgs;
pub use sos_cmd::SosCommand;

use crate::context::AppContext;

/// SafeRoute: safety-aware navigation from the command line.
///
/// Every command except `config` first restores the saved session from
/// `~/.saferoute/storage.json` (or `$SAFEROUTE_HOME`).
#[derive(Debug, Parser)]
#[clap(author, version, bin_name = "saferoute", subcommand_required = true)]
pub struct Cli {
    #[clap(flatten)]
    pub config_overrides: CliConfigOverrides,

    /// Backend API base URL, e.g. `http://localhost:5000/api`.
    #[arg(long, global = true, value_name = "URL")]
    pub api_base_url: Option<String>,

    #[clap(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    /// Validate the configuration and print the effective settings.
    Config,

    /// Sign in with email and password.
    Login(LoginArgs),

    /// Create an account and sign in.
    Register(RegisterArgs),

    /// Sign out and forget the saved session.
    Logout,

    /// Show the signed-in user.
    Whoami {
        #[arg(long)]
        json: bool,
    },

    /// Email a one-time password for resetting the account password.
    ForgotPassword {
        #[arg(long)]
        email: String,
    },

    /// Reset the password with an emailed one-time password.
    ResetPassword(ResetPasswordArgs),

    /// Manage trusted contacts.
    #[clap(subcommand)]
    Contacts(ContactsCommand),

    /// Raise and track SOS alerts.
    #[clap(subcommand)]
    Sos(SosCommand),

    /// Read and submit location feedback.
    #[clap(subcommand)]
    Feedback(FeedbackCommand),

    /// Score candidate routes between two points.
    Routes(RoutesArgs),

    /// Administrator tools.
    #[clap(subcommand)]
    Admin(AdminCommand),
}

pub async fn run_main(cli: Cli) -> Result<()> {
    let Cli {
        config_overrides,
        api_base_url,
        subcommand,
    } = cli;

    if let Subcommand::Config = subcommand {
        config_command::validate_config(config_overrides, api_base_url, true);
        return Ok(());
    }

    let config = context::load_config(&config_overrides, api_base_url)?;
    init_tracing(&config);
    let ctx = AppContext::restore(config).await?;

    match subcommand {
        Subcommand::Config => {}
        Subcommand::Login(args) => auth_cmd::run_login(&ctx, args).await?,
        Subcommand::Register(args) => auth_cmd::run_register(&ctx, args).await?,
        Subcommand::Logout => auth_cmd::run_logout(&ctx).await?,
        Subcommand::Whoami { json } => auth_cmd::run_whoami(&ctx, json)?,
        Subcommand::ForgotPassword { email } => {
            auth_cmd::run_forgot_password(&ctx, &email).await?;
        }
        Subcommand::ResetPassword(args) => auth_cmd::run_reset_password(&ctx, args).await?,
        Subcommand::Contacts(cmd) => contacts_cmd::run(&ctx, cmd).await?,
        Subcommand::Sos(cmd) => sos_cmd::run(&ctx, cmd).await?,
        Subcommand::Feedback(cmd) => feedback_cmd::run(&ctx, cmd).await?,
        Subcommand::Routes(args) => routes_cmd::run(&ctx, args).await?,
        Subcommand::Admin(cmd) => admin_cmd::run(&ctx, cmd).await?,
    }
    Ok(())
}

fn init_tracing(config: &Config) {
    let default_level = config.log_filter.as_str();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}
