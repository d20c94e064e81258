use std::collections::BTreeMap;

use saferoute_backend_client::types::Feedback;
use saferoute_backend_client::types::FeedbackRating;
use saferoute_backend_client::types::LatLng;
use saferoute_backend_client::types::RiskLevel;
use saferoute_backend_client::types::RiskZone;
use serde::Serialize;
use strum_macros::Display;
use strum_macros::EnumString;

/// Which records feed the heat layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HeatMode {
    #[default]
    None,
    Feedback,
    Zones,
    Combined,
}

impl HeatMode {
    fn includes_feedback(self) -> bool {
        matches!(self, Self::Feedback | Self::Combined)
    }

    fn includes_zones(self) -> bool {
        matches!(self, Self::Zones | Self::Combined)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lng: f64,
    /// Always within `0.0..=1.0`.
    pub intensity: f64,
}

impl HeatPoint {
    pub fn new(position: LatLng, intensity: f64) -> Self {
        let intensity = if intensity.is_finite() && intensity > 0.0 {
            intensity.min(1.0)
        } else {
            0.5
        };
        Self {
            lat: position.lat,
            lng: position.lng,
            intensity,
        }
    }
}

/// Intensity assigned to each feedback rating.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeedbackWeights {
    pub very_safe: f64,
    pub okay: f64,
    pub risky: f64,
    pub avoid: f64,
    pub other: f64,
}

impl FeedbackWeights {
    /// Weights used on the traveller's map.
    pub const MAP: Self = Self {
        very_safe: 0.2,
        okay: 0.5,
        risky: 0.8,
        avoid: 1.0,
        other: 0.4,
    };

    /// Weights used on the admin feedback heatmap, which plays down "okay".
    pub const ADMIN: Self = Self {
        very_safe: 0.2,
        okay: 0.3,
        risky: 0.7,
        avoid: 1.0,
        other: 0.4,
    };

    pub fn weight(&self, rating: FeedbackRating) -> f64 {
        match rating {
            FeedbackRating::VerySafe => self.very_safe,
            FeedbackRating::Okay => self.okay,
            FeedbackRating::Risky => self.risky,
            FeedbackRating::Avoid => self.avoid,
            FeedbackRating::Unknown => self.other,
        }
    }
}

impl Default for FeedbackWeights {
    fn default() -> Self {
        Self::MAP
    }
}

pub fn zone_weight(level: RiskLevel) -> f64 {
    match level {
        RiskLevel::High => 1.0,
        RiskLevel::Medium => 0.8,
        RiskLevel::Low | RiskLevel::Unknown => 0.6,
    }
}

/// Build heat points for `mode`. Feedback points come first, then zones.
/// Records without usable coordinates are skipped.
pub fn build_heat_points(
    mode: HeatMode,
    feedback: &[Feedback],
    zones: &[RiskZone],
    weights: &FeedbackWeights,
) -> Vec<HeatPoint> {
    let mut points = Vec::new();
    if mode.includes_feedback() {
        points.extend(feedback.iter().filter_map(|fb| {
            fb.position()
                .map(|position| HeatPoint::new(position, weights.weight(fb.rating)))
        }));
    }
    if mode.includes_zones() {
        points.extend(zones.iter().filter_map(|zone| {
            zone.position()
                .map(|position| HeatPoint::new(position, zone_weight(zone.risk_level)))
        }));
    }
    points
}

/// Record counts shown next to a heat layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HeatSummary {
    pub feedback_total: usize,
    pub by_rating: BTreeMap<String, usize>,
    pub zones_total: usize,
    pub by_risk_level: BTreeMap<String, usize>,
}

pub fn summarize(feedback: &[Feedback], zones: &[RiskZone]) -> HeatSummary {
    let mut summary = HeatSummary {
        feedback_total: feedback.len(),
        zones_total: zones.len(),
        ..Default::default()
    };
    for fb in feedback {
        *summary.by_rating.entry(fb.rating.to_string()).or_default() += 1;
    }
    for zone in zones {
        *summary
            .by_risk_level
            .entry(zone.risk_level.to_string())
            .or_default() += 1;
    }
    summary
}
