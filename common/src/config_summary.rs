use crate::config::Config;

/// Build a list of key/value pairs summarizing the effective configuration.
pub fn create_config_summary_entries(config: &Config) -> Vec<(&'static str, String)> {
    vec![
        ("home", config.saferoute_home.display().to_string()),
        ("api_base_url", config.api_base_url.clone()),
        (
            "user_agent",
            config
                .user_agent
                .clone()
                .unwrap_or_else(|| "(default)".to_string()),
        ),
        ("log_filter", config.log_filter.clone()),
        (
            "map.center",
            format!("{}, {}", config.map.default_lat, config.map.default_lng),
        ),
        (
            "map.nearby_feedback_limit",
            config.map.nearby_feedback_limit.to_string(),
        ),
    ]
}
