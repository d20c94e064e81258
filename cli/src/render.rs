use anyhow::Result;
use chrono::DateTime;
use chrono::Utc;
use owo_colors::OwoColorize;
use serde::Serialize;

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Paint `text` with a `#rrggbb` color when stdout supports color.
pub(crate) fn paint(text: &str, hex: &str) -> String {
    if supports_color::on_cached(supports_color::Stream::Stdout).is_none() {
        return text.to_string();
    }
    match parse_hex(hex) {
        Some((r, g, b)) => text.truecolor(r, g, b).to_string(),
        None => text.to_string(),
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

pub(crate) fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or("-")
}

pub(crate) fn format_time(when: Option<DateTime<Utc>>) -> String {
    when.map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_css_hex() {
        assert_eq!(parse_hex("#22c55e"), Some((0x22, 0xc5, 0x5e)));
        assert_eq!(parse_hex("22c55e"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn dash_for_missing_values() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("  ")), "-");
        assert_eq!(or_dash(Some("Mom")), "Mom");
    }
}
