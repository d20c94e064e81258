use std::path::PathBuf;

use saferoute_backend_client::DEFAULT_API_BASE_URL;
use saferoute_backend_client::normalize_base_url;
use serde::Deserialize;
use toml::Value as TomlValue;

use crate::config_loader::load_config_as_toml;
use crate::config_loader::merge_toml_values;

pub const DEFAULT_LOG_FILTER: &str = "error";
pub const DEFAULT_MAP_LAT: f64 = 17.385;
pub const DEFAULT_MAP_LNG: f64 = 78.486;
pub const DEFAULT_NEARBY_FEEDBACK_LIMIT: u32 = 100;

const SAFEROUTE_HOME_ENV_VAR: &str = "SAFEROUTE_HOME";
const API_BASE_URL_ENV_VAR: &str = "SAFEROUTE_API_BASE_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine the SafeRoute home directory")]
    NoHomeDir,
    #[error("failed to load config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] toml::de::Error),
    #[error(transparent)]
    BaseUrl(#[from] saferoute_backend_client::ApiError),
    #[error("invalid value for {key}: {reason}")]
    Value { key: &'static str, reason: String },
}

/// On-disk shape of `config.toml`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ConfigToml {
    pub api_base_url: Option<String>,
    pub user_agent: Option<String>,
    pub log_filter: Option<String>,
    #[serde(default)]
    pub map: MapConfigToml,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MapConfigToml {
    pub default_lat: Option<f64>,
    pub default_lng: Option<f64>,
    pub nearby_feedback_limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub default_lat: f64,
    pub default_lng: f64,
    pub nearby_feedback_limit: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_lat: DEFAULT_MAP_LAT,
            default_lng: DEFAULT_MAP_LNG,
            nearby_feedback_limit: DEFAULT_NEARBY_FEEDBACK_LIMIT,
        }
    }
}

/// Values supplied directly by the caller; they win over everything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub saferoute_home: Option<PathBuf>,
}

/// Effective settings after merging files, environment and overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub saferoute_home: PathBuf,
    /// Normalized: no trailing slash.
    pub api_base_url: String,
    pub user_agent: Option<String>,
    pub log_filter: String,
    pub map: MapConfig,
}

impl Config {
    /// Load `config.toml` (plus the system overlay), apply
    /// `SAFEROUTE_API_BASE_URL`, then `-c` overrides, then `overrides`.
    pub fn load_with_cli_overrides(
        cli_overrides: Vec<(String, TomlValue)>,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let saferoute_home = match &overrides.saferoute_home {
            Some(home) => home.clone(),
            None => find_saferoute_home()?,
        };
        let mut root = load_config_as_toml(&saferoute_home)?;

        if let Ok(url) = std::env::var(API_BASE_URL_ENV_VAR) {
            if !url.trim().is_empty() {
                apply_toml_override(&mut root, "api_base_url", TomlValue::String(url));
            }
        }
        for (path, value) in cli_overrides {
            apply_toml_override(&mut root, &path, value);
        }

        let cfg: ConfigToml = root.try_into()?;
        Self::load_from_base_config_with_overrides(cfg, overrides, saferoute_home)
    }

    pub fn load_from_base_config_with_overrides(
        cfg: ConfigToml,
        overrides: ConfigOverrides,
        saferoute_home: PathBuf,
    ) -> Result<Self, ConfigError> {
        let api_base_url = overrides
            .api_base_url
            .or(cfg.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = normalize_base_url(&api_base_url)?;

        let map_defaults = MapConfig::default();
        let map = MapConfig {
            default_lat: cfg.map.default_lat.unwrap_or(map_defaults.default_lat),
            default_lng: cfg.map.default_lng.unwrap_or(map_defaults.default_lng),
            nearby_feedback_limit: cfg
                .map
                .nearby_feedback_limit
                .unwrap_or(map_defaults.nearby_feedback_limit),
        };
        if !(-90.0..=90.0).contains(&map.default_lat) {
            return Err(ConfigError::Value {
                key: "map.default_lat",
                reason: format!("{} is outside -90..=90", map.default_lat),
            });
        }
        if !(-180.0..=180.0).contains(&map.default_lng) {
            return Err(ConfigError::Value {
                key: "map.default_lng",
                reason: format!("{} is outside -180..=180", map.default_lng),
            });
        }

        Ok(Self {
            saferoute_home,
            api_base_url,
            user_agent: cfg.user_agent.filter(|ua| !ua.trim().is_empty()),
            log_filter: cfg
                .log_filter
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            map,
        })
    }
}

/// Set `value` at the dotted `path` inside `root`, creating intermediate
/// tables as needed.
fn apply_toml_override(root: &mut TomlValue, path: &str, value: TomlValue) {
    let mut overlay = value;
    for segment in path.rsplit('.') {
        let mut table = toml::map::Map::new();
        table.insert(segment.to_string(), overlay);
        overlay = TomlValue::Table(table);
    }
    merge_toml_values(root, &overlay);
}

/// `$SAFEROUTE_HOME` if set and non-empty, otherwise `~/.saferoute`.
///
/// The directory is not required to exist.
pub fn find_saferoute_home() -> Result<PathBuf, ConfigError> {
    if let Ok(val) = std::env::var(SAFEROUTE_HOME_ENV_VAR) {
        if !val.is_empty() {
            return Ok(PathBuf::from(val));
        }
    }
    let mut p = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    p.push(".saferoute");
    Ok(p)
}
