use anyhow::Result;
use saferoute_backend_client::types::DEFAULT_ZONE_RADIUS_METERS;
use saferoute_backend_client::types::LatLng;
use saferoute_backend_client::types::NearbyFeedbackQuery;
use saferoute_backend_client::types::NewRiskZone;
use saferoute_backend_client::types::RiskLevel;
use saferoute_backend_client::types::Role;
use saferoute_safety_layers::FeedbackWeights;
use saferoute_safety_layers::HeatMode;
use saferoute_safety_layers::HeatPoint;
use saferoute_safety_layers::HeatSummary;
use saferoute_safety_layers::build_heat_points;
use saferoute_safety_layers::style::MapProfile;
use saferoute_safety_layers::style::activity_label;
use saferoute_safety_layers::style::zone_color;
use saferoute_safety_layers::summarize;
use serde::Serialize;

use crate::context::AppContext;
use crate::context::ApiResultExt;
use crate::render::format_time;
use crate::render::or_dash;
use crate::render::paint;
use crate::render::print_json;
use crate::routes_cmd::parse_lat_lng;

#[derive(Debug, clap::Subcommand)]
pub enum AdminCommand {
    /// Headline counts.
    Dashboard {
        #[arg(long)]
        json: bool,
    },

    /// List risk zones.
    RiskZones {
        #[arg(long)]
        json: bool,
    },

    /// Mark an area as risky.
    AddZone {
        #[arg(long)]
        name: String,
        #[arg(long, value_parser = parse_lat_lng, allow_hyphen_values = true)]
        at: LatLng,
        #[arg(long, default_value_t = DEFAULT_ZONE_RADIUS_METERS)]
        radius: f64,
        /// low, medium or high.
        #[arg(long, default_value_t = RiskLevel::Medium)]
        level: RiskLevel,
        #[arg(long)]
        description: Option<String>,
    },

    /// Recent activity across the system.
    Activity {
        #[arg(long)]
        json: bool,
    },

    /// Build the feedback/zone heatmap layer.
    Heatmap {
        /// none, feedback, zones or combined.
        #[arg(long, default_value_t = HeatMode::Combined)]
        mode: HeatMode,
        #[arg(long)]
        limit: Option<u32>,
        /// Print the heat points as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct HeatmapReport<'a> {
    mode: HeatMode,
    summary: &'a HeatSummary,
    points: &'a [HeatPoint],
}

pub(crate) async fn run(ctx: &AppContext, cmd: AdminCommand) -> Result<()> {
    ctx.require(Role::Admin)?;
    let client = ctx.client();
    match cmd {
        AdminCommand::Dashboard { json } => {
            let stats = client
                .dashboard_stats()
                .await
                .or_user_message("Unable to load dashboard.")?;
            if json {
                return print_json(&stats);
            }
            println!("feedback:       {}", stats.feedback_count);
            println!("pending SOS:    {}", stats.sos_pending);
            println!("risk zones:     {}", stats.risk_zones_count);
        }
        AdminCommand::RiskZones { json } => {
            let zones = client
                .list_risk_zones()
                .await
                .or_user_message("Unable to load risk zones.")?;
            if json {
                return print_json(&zones);
            }
            if zones.is_empty() {
                println!("No risk zones.");
            }
            for zone in zones {
                let position = zone
                    .position()
                    .map(|p| format!("{:.5},{:.5}", p.lat, p.lng))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{}  {}  [{}]  {position}  r={:.0}m  {}",
                    zone.id,
                    zone.name,
                    paint(
                        &zone.risk_level.to_string(),
                        zone_color(zone.risk_level, MapProfile::Admin)
                    ),
                    zone.radius_meters,
                    or_dash(zone.description.as_deref()),
                );
            }
        }
        AdminCommand::AddZone {
            name,
            at,
            radius,
            level,
            description,
        } => {
            let zone = client
                .create_risk_zone(&NewRiskZone {
                    name,
                    lat: at.lat,
                    lng: at.lng,
                    radius_meters: radius,
                    risk_level: level,
                    description: description.filter(|d| !d.trim().is_empty()),
                })
                .await
                .or_user_message("Unable to save risk zone.")?;
            println!("Added risk zone {} ({}).", zone.name, zone.id);
        }
        AdminCommand::Activity { json } => {
            let events = client
                .activity_log()
                .await
                .or_user_message("Unable to load activity log.")?;
            if json {
                return print_json(&events);
            }
            if events.is_empty() {
                println!("No recent activity.");
            }
            for event in events {
                println!(
                    "{}  {:<10} {}  {}",
                    format_time(event.when),
                    activity_label(event.kind),
                    event.summary,
                    or_dash(event.actor.as_deref()),
                );
            }
        }
        AdminCommand::Heatmap { mode, limit, json } => {
            let map = &ctx.config.map;
            let feedback = client
                .nearby_feedback(NearbyFeedbackQuery {
                    limit: Some(limit.unwrap_or(map.nearby_feedback_limit)),
                    near: None,
                })
                .await
                .or_user_message("Unable to load feedback.")?;
            let zones = client
                .list_risk_zones()
                .await
                .or_user_message("Unable to load risk zones.")?;
            let points = build_heat_points(mode, &feedback, &zones, &FeedbackWeights::ADMIN);
            let summary = summarize(&feedback, &zones);
            if json {
                return print_json(&HeatmapReport {
                    mode,
                    summary: &summary,
                    points: &points,
                });
            }
            println!("mode: {mode}  points: {}", points.len());
            println!("feedback: {}", summary.feedback_total);
            for (rating, count) in &summary.by_rating {
                println!("  {rating}: {count}");
            }
            println!("risk zones: {}", summary.zones_total);
            for (level, count) in &summary.by_risk_level {
                println!("  {level}: {count}");
            }
        }
    }
    Ok(())
}
