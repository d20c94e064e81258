mod config;
mod config_loader;
mod config_summary;

#[cfg(feature = "cli")]
mod config_override;

pub use config::Config;
pub use config::ConfigError;
pub use config::ConfigOverrides;
pub use config::ConfigToml;
pub use config::DEFAULT_LOG_FILTER;
pub use config::MapConfig;
pub use config::find_saferoute_home;
pub use config_loader::load_config_as_toml;
pub use config_summary::create_config_summary_entries;

#[cfg(feature = "cli")]
pub use config_override::CliConfigOverrides;
