//! Colors, labels and explanation texts for safety data on the map.
//!
//! Colors are CSS hex strings so any renderer can use them directly.

use saferoute_backend_client::types::ActivityKind;
use saferoute_backend_client::types::FeedbackRating;
use saferoute_backend_client::types::LatLng;
use saferoute_backend_client::types::RiskLevel;
use saferoute_backend_client::types::SafeRoute;
use saferoute_backend_client::types::SafetyLabel;
use saferoute_backend_client::types::SosStatus;
use serde::Serialize;
use strum_macros::Display;

pub const GREEN: &str = "#22c55e";
pub const BLUE: &str = "#3b82f6";
pub const ORANGE: &str = "#f97316";
pub const RED: &str = "#ef4444";
pub const AMBER: &str = "#f59e0b";
pub const YELLOW: &str = "#eab308";
pub const GRAY: &str = "#6b7280";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScoreTier {
    Safe,
    Moderate,
    Risky,
}

impl ScoreTier {
    pub fn color(self) -> &'static str {
        match self {
            Self::Safe => GREEN,
            Self::Moderate => AMBER,
            Self::Risky => RED,
        }
    }
}

/// A route score as shown in a badge: rounded, tiered and labelled.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreBadge {
    pub value: i64,
    pub tier: ScoreTier,
    pub title: String,
}

impl ScoreBadge {
    /// `None` when there is no usable score to show.
    pub fn new(score: Option<f64>, safety: SafetyLabel) -> Option<Self> {
        let value = score.filter(|s| s.is_finite())?.round() as i64;
        let tier = if value >= 70 {
            ScoreTier::Safe
        } else if value < 40 {
            ScoreTier::Risky
        } else {
            ScoreTier::Moderate
        };
        Some(Self {
            value,
            tier,
            title: format!("AI safety score: {value}/100 ({safety})"),
        })
    }
}

/// Drawing hints derived from a [`SafeRoute`].
pub trait SafeRouteExt {
    /// Line color; an explicit color from the backend wins.
    fn line_color(&self) -> String;
    /// Line weight in pixels.
    fn line_weight(&self) -> u8;
    /// Where the score marker sits: the middle point of the geometry.
    fn marker_position(&self) -> Option<LatLng>;
    fn score_badge(&self) -> Option<ScoreBadge>;
    /// Human-readable reason for the route's classification.
    fn explanation(&self) -> String;
}

impl SafeRouteExt for SafeRoute {
    fn line_color(&self) -> String {
        if let Some(color) = self.color.as_deref().filter(|c| !c.trim().is_empty()) {
            return color.to_string();
        }
        safety_color(self.safety).to_string()
    }

    fn line_weight(&self) -> u8 {
        match self.safety {
            SafetyLabel::Safe => 6,
            SafetyLabel::Moderate => 5,
            SafetyLabel::Risky | SafetyLabel::Unknown => 4,
        }
    }

    fn marker_position(&self) -> Option<LatLng> {
        self.geometry.get(self.geometry.len() / 2).copied()
    }

    fn score_badge(&self) -> Option<ScoreBadge> {
        ScoreBadge::new(self.score, self.safety)
    }

    fn explanation(&self) -> String {
        explain(self.safety, self.score)
    }
}

pub fn safety_color(safety: SafetyLabel) -> &'static str {
    match safety {
        SafetyLabel::Safe => GREEN,
        SafetyLabel::Moderate => ORANGE,
        SafetyLabel::Risky => RED,
        SafetyLabel::Unknown => BLUE,
    }
}

pub fn explain(safety: SafetyLabel, score: Option<f64>) -> String {
    let rounded = score
        .filter(|s| s.is_finite())
        .map(|s| (s.round() as i64).to_string())
        .unwrap_or_else(|| "?".to_string());
    match safety {
        SafetyLabel::Safe => format!(
            "This route is classified as SAFE by SafeRoute AI. The model found fewer nearby \
             high-risk zones, more positive feedback and lower recent SOS activity. \
             Score ≈ {rounded}/100."
        ),
        SafetyLabel::Moderate => format!(
            "This route is MODERATE. It may pass near some risk zones or mixed feedback at \
             certain segments, especially at night. Score ≈ {rounded}/100."
        ),
        SafetyLabel::Risky => format!(
            "This route is RISKY. SafeRoute AI detected multiple risk indicators such as \
             high-risk zones, negative feedback or nearby SOS alerts. Score ≈ {rounded}/100."
        ),
        SafetyLabel::Unknown => "Score is computed by SafeRoute AI using XGBoost on factors \
                                 like risk zones, user feedback, SOS alerts and time of day."
            .to_string(),
    }
}

pub fn feedback_color(rating: FeedbackRating) -> &'static str {
    match rating {
        FeedbackRating::VerySafe => GREEN,
        FeedbackRating::Okay => BLUE,
        FeedbackRating::Risky => ORANGE,
        FeedbackRating::Avoid => RED,
        FeedbackRating::Unknown => GRAY,
    }
}

pub fn feedback_label(rating: FeedbackRating) -> &'static str {
    match rating {
        FeedbackRating::VerySafe => "Very safe",
        FeedbackRating::Okay => "Okay",
        FeedbackRating::Risky => "Risky",
        FeedbackRating::Avoid => "Avoid",
        FeedbackRating::Unknown => "Feedback",
    }
}

/// Which map a zone is drawn on; the two differ only for low-risk zones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MapProfile {
    #[default]
    Traveller,
    Admin,
}

pub fn zone_color(level: RiskLevel, profile: MapProfile) -> &'static str {
    match (level, profile) {
        (RiskLevel::High, _) => RED,
        (RiskLevel::Medium, _) => ORANGE,
        (_, MapProfile::Traveller) => YELLOW,
        (_, MapProfile::Admin) => GREEN,
    }
}

pub fn sos_status_color(status: SosStatus) -> &'static str {
    match status {
        SosStatus::Pending => ORANGE,
        SosStatus::Acknowledged => BLUE,
        SosStatus::Closed => GREEN,
    }
}

pub fn activity_label(kind: ActivityKind) -> &'static str {
    match kind {
        ActivityKind::Feedback => "Feedback",
        ActivityKind::RiskZone => "Risk zone",
        ActivityKind::Sos => "SOS alert",
        ActivityKind::User => "User",
        ActivityKind::Other => "Event",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn route(value: serde_json::Value) -> SafeRoute {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn score_tiers_use_rounded_value() {
        let badge = ScoreBadge::new(Some(69.5), SafetyLabel::Safe).unwrap();
        assert_eq!(badge.value, 70);
        assert_eq!(badge.tier, ScoreTier::Safe);
        assert_eq!(badge.title, "AI safety score: 70/100 (safe)");

        assert_eq!(
            ScoreBadge::new(Some(39.4), SafetyLabel::Risky).unwrap().tier,
            ScoreTier::Risky
        );
        assert_eq!(
            ScoreBadge::new(Some(40.0), SafetyLabel::Moderate)
                .unwrap()
                .tier
                .color(),
            AMBER
        );
        assert_eq!(ScoreBadge::new(None, SafetyLabel::Safe), None);
        assert_eq!(ScoreBadge::new(Some(f64::NAN), SafetyLabel::Safe), None);
    }

    #[test]
    fn explicit_route_color_wins() {
        let r = route(json!({"id": 1, "safety": "risky", "color": "#123456"}));
        assert_eq!(r.line_color(), "#123456");
        let r = route(json!({"id": 2, "safety": "moderate"}));
        assert_eq!(r.line_color(), ORANGE);
        assert_eq!(r.line_weight(), 5);
        let r = route(json!({"id": 3}));
        assert_eq!(r.line_color(), BLUE);
        assert_eq!(r.line_weight(), 4);
    }

    #[test]
    fn marker_sits_at_the_middle_point() {
        let r = route(json!({
            "id": "a",
            "safety": "safe",
            "geometry": [
                {"lat": 1.0, "lng": 1.0},
                {"lat": 2.0, "lng": 2.0},
                {"lat": 3.0, "lng": 3.0},
                {"lat": 4.0, "lng": 4.0}
            ]
        }));
        assert_eq!(r.marker_position(), Some(LatLng::new(3.0, 3.0)));
        assert_eq!(r.line_weight(), 6);
        assert_eq!(route(json!({"id": "b"})).marker_position(), None);
    }

    #[test]
    fn explanation_mentions_rounded_score() {
        let text = explain(SafetyLabel::Moderate, Some(54.6));
        assert!(text.starts_with("This route is MODERATE."));
        assert!(text.ends_with("Score ≈ 55/100."));
        assert!(explain(SafetyLabel::Unknown, Some(10.0)).contains("XGBoost"));
    }

    #[test]
    fn zone_colors_differ_only_for_low_risk() {
        assert_eq!(zone_color(RiskLevel::High, MapProfile::Admin), RED);
        assert_eq!(zone_color(RiskLevel::Low, MapProfile::Traveller), YELLOW);
        assert_eq!(zone_color(RiskLevel::Low, MapProfile::Admin), GREEN);
    }

    #[test]
    fn labels() {
        assert_eq!(feedback_label(FeedbackRating::VerySafe), "Very safe");
        assert_eq!(feedback_color(FeedbackRating::Unknown), GRAY);
        assert_eq!(activity_label(ActivityKind::RiskZone), "Risk zone");
        assert_eq!(sos_status_color(SosStatus::Acknowledged), BLUE);
    }
}
