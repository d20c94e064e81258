use crate::client::Client;
use crate::error::Result;
use crate::request::PendingRequest;
use crate::types::SosAlert;
use crate::types::SosStatus;
use crate::types::SosStatusUpdate;
use crate::types::TriggerSos;
use crate::validation::require;

impl Client {
    /// Raise an SOS alert. Returns the backend's confirmation message.
    pub async fn trigger_sos(&self, alert: &TriggerSos) -> Result<Option<String>> {
        self.send_for_message(PendingRequest::post("/sos").with_json(alert)?)
            .await
    }

    pub async fn list_sos_alerts(&self) -> Result<Vec<SosAlert>> {
        self.send_list(PendingRequest::get("/sos")).await
    }

    pub async fn update_sos_status(&self, id: &str, status: SosStatus) -> Result<()> {
        require("Alert id", id)?;
        self.execute(
            PendingRequest::patch(format!("/sos/{id}/status"))
                .with_json(&SosStatusUpdate { status })?,
        )
        .await?;
        Ok(())
    }
}
