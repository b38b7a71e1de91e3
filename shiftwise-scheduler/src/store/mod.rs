//! Job handle store
//!
//! Holds at most one in-flight job handle so a restarted process can resume
//! watching a job instead of losing it. The orchestrator is the only writer.
//!
//! All stores are trait-based so tests can inject an in-memory fake.

mod file;
mod memory;

pub use file::FileHandleStore;
pub use memory::MemoryHandleStore;

use shiftwise_core::domain::job::JobHandle;
use thiserror::Error;

/// Errors raised while persisting the job handle
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("job state I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode job state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable storage for the single in-flight job handle
pub trait JobHandleStore: Send + Sync {
    /// Returns the stored handle, if any
    ///
    /// Never fails: unreadable state is reported as "no job in flight".
    fn get(&self) -> Option<JobHandle>;

    /// Stores `handle`, replacing any previous one
    fn set(&self, handle: &JobHandle) -> Result<(), StoreError>;

    /// Removes the stored handle; clearing an empty store succeeds
    fn clear(&self) -> Result<(), StoreError>;
}
