use anyhow::Result;
use saferoute_backend_client::types::LatLng;
use saferoute_backend_client::types::Role;
use saferoute_backend_client::types::RouteRequest;
use saferoute_safety_layers::style::SafeRouteExt;
use saferoute_safety_layers::style::safety_color;

use crate::context::AppContext;
use crate::context::ApiResultExt;
use crate::render::paint;
use crate::render::print_json;

#[derive(Debug, clap::Parser)]
pub struct RoutesArgs {
    /// Start point as `lat,lng`.
    #[arg(long, value_parser = parse_lat_lng, allow_hyphen_values = true)]
    pub from: LatLng,

    /// Destination as `lat,lng`.
    #[arg(long, value_parser = parse_lat_lng, allow_hyphen_values = true)]
    pub to: LatLng,

    /// Print the routes as JSON.
    #[arg(long)]
    pub json: bool,

    /// Include the explanation of each route's score.
    #[arg(long)]
    pub explain: bool,
}

pub(crate) fn parse_lat_lng(raw: &str) -> Result<LatLng, String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected `lat,lng`, got `{raw}`"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude `{}`", lat.trim()))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude `{}`", lng.trim()))?;
    Ok(LatLng::new(lat, lng))
}

pub(crate) async fn run(ctx: &AppContext, args: RoutesArgs) -> Result<()> {
    ctx.require(Role::User)?;
    let routes = ctx
        .client()
        .safe_routes(&RouteRequest {
            source: args.from,
            destination: args.to,
        })
        .await
        .or_user_message("Unable to fetch routes.")?;

    if args.json {
        return print_json(&routes);
    }
    if routes.is_empty() {
        println!("No routes found.");
        return Ok(());
    }

    for route in &routes {
        let label = route.label.as_deref().unwrap_or("Route");
        let mut line = format!(
            "{}  {}",
            paint(label, &route.line_color()),
            paint(&route.safety.to_string(), safety_color(route.safety)),
        );
        if let Some(minutes) = route.duration_min {
            line.push_str(&format!("  {minutes:.0} min"));
        }
        if let Some(km) = route.distance_km {
            line.push_str(&format!("  {km:.1} km"));
        }
        if let Some(badge) = route.score_badge() {
            line.push_str(&format!(
                "  score {}",
                paint(&format!("{}/100", badge.value), badge.tier.color())
            ));
        }
        println!("{line}");
        if args.explain {
            println!("    {}", route.explanation());
        }
    }
    Ok(())
}
