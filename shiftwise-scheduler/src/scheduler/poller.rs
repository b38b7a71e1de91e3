//! Job status poller
//!
//! Fetches the status of one job at a fixed interval until the backend
//! reports a terminal status. Polls are strictly sequential: the next fetch is
//! scheduled only after the previous one has resolved and its freshly
//! received status has been inspected.

use shiftwise_client::{ClientError, SchedulerApi};
use shiftwise_core::domain::job::JobHandle;
use shiftwise_core::dto::job::JobStatusResponse;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::time::{self, Duration, Instant};
use tracing::{debug, warn};

/// Polling cadence and bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between the end of one fetch and the start of the next
    pub interval: Duration,
    /// Consecutive failed fetches after which polling gives up
    pub max_consecutive_failures: u32,
    /// Longest time one job is polled
    pub max_duration: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_consecutive_failures: 20,
            max_duration: Duration::from_secs(900),
        }
    }
}

/// What a single poll tick produced
#[derive(Debug)]
pub enum PollUpdate {
    /// The backend answered with the job's current status
    Status(JobStatusResponse),
    /// The fetch failed; polling continues unless the failure bound is hit
    Error {
        error: ClientError,
        consecutive_failures: u32,
    },
}

/// Why a polling run ended
#[derive(Debug)]
pub enum PollEnd {
    /// The job reached `COMPLETED` or `FAILED`
    Terminal(JobStatusResponse),
    /// The observer asked to stop
    Stopped,
    /// Too many consecutive fetches failed
    FailureLimit { failures: u32, last_error: ClientError },
    /// The job stayed non-terminal for longer than `max_duration`
    DeadlineExceeded { elapsed: Duration },
}

/// Polls job status through the scheduler API
#[derive(Clone)]
pub struct JobPoller {
    api: Arc<dyn SchedulerApi>,
    config: PollConfig,
}

impl JobPoller {
    pub fn new(api: Arc<dyn SchedulerApi>, config: PollConfig) -> Self {
        Self { api, config }
    }

    /// Performs a single status fetch
    pub async fn fetch(&self, handle: &JobHandle) -> Result<JobStatusResponse, ClientError> {
        self.api.get_job_status(handle).await
    }

    /// Polls `handle` until a terminal status, a bound, or the observer stops it
    ///
    /// `on_update` sees every tick before the poller decides whether to
    /// schedule another fetch.
    pub async fn run<F>(&self, handle: &JobHandle, mut on_update: F) -> PollEnd
    where
        F: FnMut(&PollUpdate) -> ControlFlow<()>,
    {
        let started = Instant::now();
        let mut failures = 0u32;

        loop {
            let update = match self.fetch(handle).await {
                Ok(response) => {
                    failures = 0;
                    debug!("Job {} status: {}", handle, response.status);
                    PollUpdate::Status(response)
                }
                Err(error) => {
                    failures += 1;
                    warn!(
                        "Status check for job {} failed ({}/{}): {}",
                        handle, failures, self.config.max_consecutive_failures, error
                    );
                    PollUpdate::Error {
                        error,
                        consecutive_failures: failures,
                    }
                }
            };

            if on_update(&update).is_break() {
                return PollEnd::Stopped;
            }

            match update {
                PollUpdate::Status(response) if response.status.is_terminal() => {
                    return PollEnd::Terminal(response);
                }
                PollUpdate::Error { error, .. }
                    if failures >= self.config.max_consecutive_failures =>
                {
                    return PollEnd::FailureLimit {
                        failures,
                        last_error: error,
                    };
                }
                _ => {}
            }

            let elapsed = started.elapsed();
            if elapsed + self.config.interval > self.config.max_duration {
                return PollEnd::DeadlineExceeded { elapsed };
            }

            time::sleep(self.config.interval).await;
        }
    }
}
