use crate::client::Client;
use crate::error::Result;
use crate::request::PendingRequest;
use crate::types::RouteRequest;
use crate::types::SafeRoute;
use crate::types::SafeRoutesResponse;
use crate::validation::Validate;

impl Client {
    /// Candidate routes between two points, each scored by the backend.
    pub async fn safe_routes(&self, request: &RouteRequest) -> Result<Vec<SafeRoute>> {
        request.validate()?;
        let response: SafeRoutesResponse = self
            .send_json(PendingRequest::post("/routes/safe").with_json(request)?)
            .await?;
        Ok(response.routes.unwrap_or_default())
    }
}
