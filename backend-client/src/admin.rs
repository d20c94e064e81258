use crate::client::Client;
use crate::error::Result;
use crate::request::PendingRequest;
use crate::types::ActivityEvent;
use crate::types::DashboardStats;
use crate::types::NewRiskZone;
use crate::types::RiskZone;
use crate::validation::Validate;

impl Client {
    pub async fn list_risk_zones(&self) -> Result<Vec<RiskZone>> {
        self.send_list(PendingRequest::get("/admin/risk-zones")).await
    }

    pub async fn create_risk_zone(&self, zone: &NewRiskZone) -> Result<RiskZone> {
        zone.validate()?;
        self.send_json(PendingRequest::post("/admin/risk-zones").with_json(zone)?)
            .await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.send_json(PendingRequest::get("/admin/dashboard")).await
    }

    pub async fn activity_log(&self) -> Result<Vec<ActivityEvent>> {
        self.send_list(PendingRequest::get("/admin/activity-log")).await
    }
}
