//! `-c key=value` overrides shared by every subcommand.

use clap::ArgAction;
use clap::Parser;
use toml::Value as TomlValue;

#[derive(Parser, Debug, Default, Clone)]
pub struct CliConfigOverrides {
    /// Override a configuration value that would otherwise be loaded from
    /// `~/.saferoute/config.toml`. Use a dotted path (`map.default_lat`) to
    /// override nested values. The `value` portion is parsed as TOML; if that
    /// fails it is used as a literal string.
    ///
    /// Examples:
    ///   - `-c api_base_url="https://saferoute.example/api"`
    ///   - `-c map.nearby_feedback_limit=50`
    #[arg(
        short = 'c',
        long = "config",
        value_name = "key=value",
        action = ArgAction::Append,
        global = true,
    )]
    pub raw_overrides: Vec<String>,
}

impl CliConfigOverrides {
    /// Parse every raw override into a `(path, value)` pair.
    pub fn parse_overrides(&self) -> Result<Vec<(String, TomlValue)>, String> {
        self.raw_overrides
            .iter()
            .map(|s| {
                let mut parts = s.splitn(2, '=');
                let key = match parts.next() {
                    Some(k) => k.trim(),
                    None => return Err("Override missing key".to_string()),
                };
                let value_str = parts
                    .next()
                    .ok_or_else(|| format!("Invalid override (missing '='): {s}"))?
                    .trim();

                if key.is_empty() {
                    return Err(format!("Empty key in override: {s}"));
                }

                let value = match parse_toml_value(value_str) {
                    Ok(v) => v,
                    Err(_) => {
                        let trimmed = value_str.trim().trim_matches(|c| c == '"' || c == '\'');
                        TomlValue::String(trimmed.to_string())
                    }
                };

                Ok((key.to_string(), value))
            })
            .collect()
    }
}

/// Parse a bare TOML value by wrapping it in a one-key table.
fn parse_toml_value(raw: &str) -> Result<TomlValue, toml::de::Error> {
    let wrapped = format!("_x_ = {raw}");
    let table: toml::Table = toml::from_str(&wrapped)?;
    table
        .get("_x_")
        .cloned()
        .ok_or_else(|| serde::de::Error::custom("missing sentinel key"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn overrides(raw: &[&str]) -> CliConfigOverrides {
        CliConfigOverrides {
            raw_overrides: raw.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn parses_basic_scalar() {
        let parsed = overrides(&["map.nearby_feedback_limit=42"])
            .parse_overrides()
            .unwrap();
        assert_eq!(
            parsed,
            vec![(
                "map.nearby_feedback_limit".to_string(),
                TomlValue::Integer(42)
            )]
        );
    }

    #[test]
    fn unparsable_values_become_strings() {
        let parsed = overrides(&["api_base_url=http://localhost:5000/api"])
            .parse_overrides()
            .unwrap();
        assert_eq!(
            parsed[0].1,
            TomlValue::String("http://localhost:5000/api".to_string())
        );
    }

    #[test]
    fn missing_equals_is_an_error() {
        assert!(overrides(&["log_filter"]).parse_overrides().is_err());
        assert!(overrides(&["=debug"]).parse_overrides().is_err());
    }
}
