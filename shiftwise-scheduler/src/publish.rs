//! Result view and publish flow
//!
//! A [`ResultView`] owns the schedule handed over by a completed job. A
//! successful publish consumes it; a failed publish hands it back untouched so
//! the user can retry without generating again.

use shiftwise_client::{ClientError, SchedulerApi};
use shiftwise_core::domain::request::{DateRange, GenerationMode, GenerationRequest};
use shiftwise_core::domain::schedule::ScheduleResult;
use shiftwise_core::dto::publish::{PublishRequest, PublishResponse};
use thiserror::Error;
use tracing::{info, warn};

/// A publish attempt that failed, carrying the view for a retry
#[derive(Debug, Error)]
#[error("failed to publish schedule: {error}")]
pub struct PublishFailure {
    pub view: ResultView,
    #[source]
    pub error: ClientError,
}

/// A generated schedule awaiting publication
#[derive(Debug, Clone)]
pub struct ResultView {
    venue_id: String,
    range: DateRange,
    mode: Option<GenerationMode>,
    result: ScheduleResult,
}

impl ResultView {
    /// Wraps the result of the job submitted with `request`
    pub fn new(request: &GenerationRequest, result: ScheduleResult) -> Self {
        Self {
            venue_id: request.venue_id.clone(),
            range: request.date_range,
            mode: Some(request.mode),
            result,
        }
    }

    pub fn result(&self) -> &ScheduleResult {
        &self.result
    }

    pub fn venue_id(&self) -> &str {
        &self.venue_id
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// The payload the publish endpoint receives
    pub fn publish_request(&self, send_notification: bool) -> PublishRequest {
        PublishRequest::from_result(
            self.venue_id.clone(),
            self.range,
            self.mode,
            &self.result,
            send_notification,
        )
    }

    /// Publishes the schedule
    ///
    /// On success the view is consumed and the persisted schedule is returned.
    pub async fn publish(
        self,
        api: &dyn SchedulerApi,
        send_notification: bool,
    ) -> Result<PublishResponse, PublishFailure> {
        let request = self.publish_request(send_notification);

        match api.publish_schedule(&request).await {
            Ok(response) => {
                info!(
                    "Published {} shift(s) as schedule {}",
                    request.shifts.len(),
                    response.schedule_id
                );
                Ok(response)
            }
            Err(error) => {
                warn!("Failed to publish schedule for venue {}: {}", self.venue_id, error);
                Err(PublishFailure { view: self, error })
            }
        }
    }
}
