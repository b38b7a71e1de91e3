//! Deferred delivery of job outcomes
//!
//! The orchestrator never invokes caller callbacks from inside its own state
//! transitions. Outcomes are enqueued on a [`HandOffQueue`] and a dedicated
//! dispatcher task delivers them, one at a time and in enqueue order, after
//! the orchestrator has finished its cleanup.

use shiftwise_core::domain::schedule::ScheduleResult;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Terminal outcome of a generation job
#[derive(Debug, Clone)]
pub enum JobOutcome {
    Completed(ScheduleResult),
    Failed(String),
}

/// Caller-supplied completion and error callbacks
pub trait JobCallbacks: Send + Sync + 'static {
    /// The job completed; `result` is handed over exactly once
    fn on_complete(&self, result: ScheduleResult);

    /// Submission failed or the job ended without a result
    fn on_error(&self, message: String);
}

/// Queue whose dispatcher task invokes [`JobCallbacks`]
#[derive(Debug, Clone)]
pub struct HandOffQueue {
    tx: mpsc::UnboundedSender<JobOutcome>,
}

impl HandOffQueue {
    /// Creates the queue and spawns its dispatcher
    ///
    /// The dispatcher exits once every queue handle has been dropped and the
    /// remaining outcomes have been delivered.
    pub fn spawn(callbacks: Arc<dyn JobCallbacks>) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<JobOutcome>();

        let dispatcher = tokio::spawn(async move {
            while let Some(outcome) = rx.recv().await {
                match outcome {
                    JobOutcome::Completed(result) => {
                        debug!("Delivering schedule with {} shift(s)", result.shifts.len());
                        callbacks.on_complete(result);
                    }
                    JobOutcome::Failed(message) => {
                        debug!("Delivering job error: {}", message);
                        callbacks.on_error(message);
                    }
                }
            }
        });

        (Self { tx }, dispatcher)
    }

    /// Schedules delivery of `outcome`; returns false if the dispatcher is gone
    pub fn enqueue(&self, outcome: JobOutcome) -> bool {
        self.tx.send(outcome).is_ok()
    }
}
