//! Job-related API endpoints

use reqwest::Method;
use shiftwise_core::domain::job::JobHandle;
use shiftwise_core::domain::request::GenerationRequest;
use shiftwise_core::dto::job::{JobStatusResponse, StartJobResponse};
use tracing::debug;

use crate::SchedulerClient;
use crate::error::Result;

impl SchedulerClient {
    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Start an asynchronous schedule generation job
    ///
    /// # Arguments
    /// * `request` - The accumulated generation request
    ///
    /// # Returns
    /// The accepted job, carrying the handle to poll
    pub async fn start_generation_job(
        &self,
        request: &GenerationRequest,
    ) -> Result<StartJobResponse> {
        debug!(
            "Submitting generation job for venue {} ({} to {})",
            request.venue_id, request.date_range.start_date, request.date_range.end_date
        );
        let response = self
            .request(Method::POST, &["ai-scheduler", "generate", "async"])?
            .json(request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get the status of a job
    ///
    /// # Arguments
    /// * `job_id` - The job handle returned when the job was started
    ///
    /// # Returns
    /// The job status, with the result or error once terminal
    pub async fn get_job_status(&self, job_id: &JobHandle) -> Result<JobStatusResponse> {
        let response = self
            .request(Method::GET, &["ai-scheduler", "job", job_id.as_str()])?
            .send()
            .await?;

        self.handle_response(response).await
    }
}
