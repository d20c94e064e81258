use anyhow::Result;
use saferoute_backend_client::types::LatLng;
use saferoute_backend_client::types::Role;
use saferoute_backend_client::types::SosStatus;
use saferoute_backend_client::types::TriggerSos;
use saferoute_safety_layers::style::sos_status_color;

use crate::context::AppContext;
use crate::context::ApiResultExt;
use crate::render::format_time;
use crate::render::or_dash;
use crate::render::paint;
use crate::render::print_json;
use crate::routes_cmd::parse_lat_lng;

#[derive(Debug, clap::Subcommand)]
pub enum SosCommand {
    /// Alert your trusted contacts.
    Trigger {
        /// Current position as `lat,lng`.
        #[arg(long, value_parser = parse_lat_lng, allow_hyphen_values = true)]
        at: Option<LatLng>,
        #[arg(long)]
        location_name: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },

    /// List SOS alerts (admin).
    List {
        #[arg(long)]
        json: bool,
    },

    /// Move an alert along pending -> acknowledged -> closed (admin).
    Status { id: String, status: SosStatus },
}

pub(crate) async fn run(ctx: &AppContext, cmd: SosCommand) -> Result<()> {
    let client = ctx.client();
    match cmd {
        SosCommand::Trigger {
            at,
            location_name,
            note,
        } => {
            ctx.require(Role::User)?;
            let mut alert = TriggerSos::at(at, location_name);
            if let Some(note) = note.filter(|n| !n.trim().is_empty()) {
                alert = alert.with_note(note);
            }
            let message = client
                .trigger_sos(&alert)
                .await
                .or_user_message("Failed to send SOS. Please try again.")?;
            println!("{}", message.as_deref().unwrap_or("SOS alert sent."));
        }
        SosCommand::List { json } => {
            ctx.require(Role::Admin)?;
            let alerts = client
                .list_sos_alerts()
                .await
                .or_user_message("Unable to load SOS alerts.")?;
            if json {
                return print_json(&alerts);
            }
            if alerts.is_empty() {
                println!("No SOS alerts.");
            }
            for alert in alerts {
                let reporter = alert
                    .user
                    .as_ref()
                    .and_then(|u| u.name.as_deref().or(u.email.as_deref()));
                println!(
                    "{}  [{}]  {}  by {}  at {}  {}",
                    alert.id,
                    paint(&alert.status.to_string(), sos_status_color(alert.status)),
                    or_dash(alert.location_name.as_deref()),
                    or_dash(reporter),
                    format_time(alert.created_at),
                    or_dash(alert.note.as_deref()),
                );
            }
        }
        SosCommand::Status { id, status } => {
            ctx.require(Role::Admin)?;
            client
                .update_sos_status(&id, status)
                .await
                .or_user_message("Unable to update SOS status.")?;
            println!("Alert {id} is now {status}.");
        }
    }
    Ok(())
}
