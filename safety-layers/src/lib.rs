//! Client-side map layers: heatmap points built from feedback and risk
//! zones, and the colors, labels and texts used to draw safety data.

pub mod heatmap;
pub mod style;

pub use heatmap::FeedbackWeights;
pub use heatmap::HeatMode;
pub use heatmap::HeatPoint;
pub use heatmap::HeatSummary;
pub use heatmap::build_heat_points;
pub use heatmap::summarize;
