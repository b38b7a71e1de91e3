//! Shiftwise Scheduler
//!
//! Client-side lifecycle of AI schedule generation jobs.
//!
//! Architecture:
//! - Configuration: Load settings from environment or defaults
//! - Store: Durable single-slot storage of the in-flight job handle
//! - Scheduler: Job status polling, orchestration and deferred result hand-off
//! - Publish: The result view that turns a generated schedule into a publish request
//!
//! A generation request built by the wizard is submitted through the
//! [`JobOrchestrator`], which persists the job handle, polls the backend until
//! the job finishes and hands the [`ScheduleResult`] to the caller once. The
//! caller wraps it in a [`ResultView`] to publish it.
//!
//! [`ScheduleResult`]: shiftwise_core::domain::schedule::ScheduleResult

pub mod config;
pub mod publish;
pub mod scheduler;
pub mod store;

pub use config::Config;
pub use publish::{PublishFailure, ResultView};
pub use scheduler::{JobCallbacks, JobOrchestrator, JobOutcome, JobState, OrchestratorError};
pub use store::{FileHandleStore, JobHandleStore, MemoryHandleStore};
