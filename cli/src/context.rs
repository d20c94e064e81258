use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
use saferoute_backend_client::ApiError;
use saferoute_backend_client::Client;
use saferoute_backend_client::types::Role;
use saferoute_backend_client::types::User;
use saferoute_common::CliConfigOverrides;
use saferoute_common::Config;
use saferoute_common::ConfigOverrides;
use saferoute_login::AuthManager;
use tracing::debug;

pub(crate) fn load_config(
    config_overrides: &CliConfigOverrides,
    api_base_url: Option<String>,
) -> Result<Config> {
    let cli_overrides = config_overrides.parse_overrides().map_err(|e| anyhow!(e))?;
    let overrides = ConfigOverrides {
        api_base_url,
        ..Default::default()
    };
    Config::load_with_cli_overrides(cli_overrides, overrides).context("failed to load config")
}

/// Configuration plus the restored session, shared by every command.
pub(crate) struct AppContext {
    pub config: Config,
    pub auth: AuthManager,
}

impl AppContext {
    pub async fn restore(config: Config) -> Result<Self> {
        let mut client = Client::new(config.api_base_url.clone())?;
        if let Some(ua) = &config.user_agent {
            client = client.with_user_agent(ua.clone());
        }
        let auth = AuthManager::load(client, &config.saferoute_home);
        let state = auth.restore().await;
        debug!(?state, "session restored");
        Ok(Self { config, auth })
    }

    pub fn client(&self) -> &Client {
        self.auth.client()
    }

    pub fn require(&self, role: Role) -> Result<User> {
        self.auth.require(role).map_err(|err| anyhow!(err))
    }
}

/// Turn a client error into the message shown to the user.
pub(crate) trait ApiResultExt<T> {
    fn or_user_message(self, fallback: &str) -> Result<T>;
}

impl<T> ApiResultExt<T> for Result<T, ApiError> {
    fn or_user_message(self, fallback: &str) -> Result<T> {
        self.map_err(|err| {
            debug!("request failed: {err}");
            anyhow!(err.user_message(fallback))
        })
    }
}
