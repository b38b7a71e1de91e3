//! Schedule publishing and staff availability endpoints

use reqwest::Method;
use shiftwise_core::dto::availability::{AvailabilityRequest, AvailabilityResponse};
use shiftwise_core::dto::publish::{PublishRequest, PublishResponse};
use tracing::debug;

use crate::SchedulerClient;
use crate::error::Result;

impl SchedulerClient {
    /// Publish a generated schedule
    ///
    /// # Returns
    /// The id of the persisted schedule
    pub async fn publish_schedule(&self, request: &PublishRequest) -> Result<PublishResponse> {
        debug!(
            "Publishing {} shift(s) for venue {}",
            request.shifts.len(),
            request.venue_id
        );
        let response = self
            .request(Method::POST, &["ai-scheduler", "publish"])?
            .json(request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Check staff availability for a venue over a date range
    pub async fn check_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<AvailabilityResponse> {
        let response = self
            .request(Method::POST, &["ai-scheduler", "check-availability"])?
            .json(request)
            .send()
            .await?;

        self.handle_response(response).await
    }
}
