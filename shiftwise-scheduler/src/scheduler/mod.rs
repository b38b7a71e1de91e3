//! Job lifecycle layer
//!
//! This layer submits generation jobs, polls their status until a terminal
//! state and delivers the outcome to the caller exactly once.

pub mod handoff;
pub mod orchestrator;
pub mod poller;

pub use handoff::{HandOffQueue, JobCallbacks, JobOutcome};
pub use orchestrator::{JobOrchestrator, JobState, OrchestratorError};
pub use poller::{JobPoller, PollConfig, PollEnd, PollUpdate};
