use serde_json::Value;

use crate::client::Client;
use crate::error::Result;
use crate::request::PendingRequest;
use crate::types::Feedback;
use crate::types::NearbyFeedbackQuery;
use crate::types::NewFeedback;
use crate::validation::Validate;

impl Client {
    pub async fn nearby_feedback(&self, query: NearbyFeedbackQuery) -> Result<Vec<Feedback>> {
        let mut request = PendingRequest::get("/feedback/nearby");
        if let Some(limit) = query.limit {
            request = request.with_query("limit", limit);
        }
        if let Some(near) = query.near {
            request = request.with_query("lat", near.lat).with_query("lng", near.lng);
        }
        self.send_list(request).await
    }

    /// Submit a feedback record. The created record is returned as the
    /// backend sent it.
    pub async fn submit_feedback(&self, feedback: &NewFeedback) -> Result<Value> {
        feedback.validate()?;
        self.send_json(PendingRequest::post("/feedback").with_json(feedback)?)
            .await
    }
}
