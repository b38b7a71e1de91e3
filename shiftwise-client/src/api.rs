//! Backend abstraction used by the job lifecycle
//!
//! Every AI-scheduler endpoint the client consumes, behind a trait so the
//! orchestrator and result view can be driven by scripted fakes in tests.

use async_trait::async_trait;
use shiftwise_core::domain::job::JobHandle;
use shiftwise_core::domain::request::GenerationRequest;
use shiftwise_core::dto::availability::{AvailabilityRequest, AvailabilityResponse};
use shiftwise_core::dto::job::{JobStatusResponse, StartJobResponse};
use shiftwise_core::dto::publish::{PublishRequest, PublishResponse};

use crate::SchedulerClient;
use crate::error::Result;

/// AI-scheduler endpoints
#[async_trait]
pub trait SchedulerApi: Send + Sync {
    /// Submits a generation request and returns the accepted job
    async fn start_generation_job(&self, request: &GenerationRequest) -> Result<StartJobResponse>;

    /// Fetches the current status of a job, with its result once terminal
    async fn get_job_status(&self, job_id: &JobHandle) -> Result<JobStatusResponse>;

    /// Persists a generated schedule
    async fn publish_schedule(&self, request: &PublishRequest) -> Result<PublishResponse>;

    /// Lists staff availability over a date range
    async fn check_availability(&self, request: &AvailabilityRequest)
    -> Result<AvailabilityResponse>;
}

#[async_trait]
impl SchedulerApi for SchedulerClient {
    async fn start_generation_job(&self, request: &GenerationRequest) -> Result<StartJobResponse> {
        SchedulerClient::start_generation_job(self, request).await
    }

    async fn get_job_status(&self, job_id: &JobHandle) -> Result<JobStatusResponse> {
        SchedulerClient::get_job_status(self, job_id).await
    }

    async fn publish_schedule(&self, request: &PublishRequest) -> Result<PublishResponse> {
        SchedulerClient::publish_schedule(self, request).await
    }

    async fn check_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<AvailabilityResponse> {
        SchedulerClient::check_availability(self, request).await
    }
}
