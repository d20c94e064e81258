use anyhow::Result;
use saferoute_backend_client::types::FeedbackRating;
use saferoute_backend_client::types::LatLng;
use saferoute_backend_client::types::NearbyFeedbackQuery;
use saferoute_backend_client::types::NewFeedback;
use saferoute_backend_client::types::Role;
use saferoute_safety_layers::style::feedback_color;
use saferoute_safety_layers::style::feedback_label;

use crate::context::AppContext;
use crate::context::ApiResultExt;
use crate::render::format_time;
use crate::render::or_dash;
use crate::render::paint;
use crate::render::print_json;
use crate::routes_cmd::parse_lat_lng;

#[derive(Debug, clap::Subcommand)]
pub enum FeedbackCommand {
    /// Show feedback near a point (defaults to the configured map center).
    Nearby {
        #[arg(long, value_parser = parse_lat_lng, allow_hyphen_values = true)]
        near: Option<LatLng>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        json: bool,
    },

    /// Rate how safe a place feels.
    Submit {
        #[arg(long, value_parser = parse_lat_lng, allow_hyphen_values = true)]
        at: LatLng,
        #[arg(long)]
        location_name: String,
        /// very_safe, okay, risky or avoid.
        #[arg(long)]
        rating: FeedbackRating,
        #[arg(long)]
        comment: Option<String>,
    },
}

pub(crate) async fn run(ctx: &AppContext, cmd: FeedbackCommand) -> Result<()> {
    let client = ctx.client();
    match cmd {
        FeedbackCommand::Nearby { near, limit, json } => {
            let map = &ctx.config.map;
            let query = NearbyFeedbackQuery {
                limit: Some(limit.unwrap_or(map.nearby_feedback_limit)),
                near: Some(near.unwrap_or(LatLng::new(map.default_lat, map.default_lng))),
            };
            let feedback = client
                .nearby_feedback(query)
                .await
                .or_user_message("Unable to load feedback.")?;
            if json {
                return print_json(&feedback);
            }
            if feedback.is_empty() {
                println!("No feedback nearby.");
            }
            for fb in feedback {
                let position = fb
                    .position()
                    .map(|p| format!("{:.5},{:.5}", p.lat, p.lng))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{}  {}  {position}  {}  {}",
                    paint(feedback_label(fb.rating), feedback_color(fb.rating)),
                    or_dash(fb.location_name.as_deref()),
                    format_time(fb.created_at),
                    or_dash(fb.comment.as_deref()),
                );
            }
        }
        FeedbackCommand::Submit {
            at,
            location_name,
            rating,
            comment,
        } => {
            ctx.require(Role::User)?;
            client
                .submit_feedback(&NewFeedback {
                    lat: at.lat,
                    lng: at.lng,
                    location_name,
                    rating,
                    comment: comment.filter(|c| !c.trim().is_empty()),
                })
                .await
                .or_user_message("Unable to submit feedback.")?;
            println!("Thanks! Your feedback was recorded.");
        }
    }
    Ok(())
}
