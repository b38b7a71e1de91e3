//! In-memory job handle store

use shiftwise_core::domain::job::JobHandle;
use std::sync::{Mutex, MutexGuard};

use super::{JobHandleStore, StoreError};

/// Store that lives as long as the process
#[derive(Debug, Default)]
pub struct MemoryHandleStore {
    handle: Mutex<Option<JobHandle>>,
}

impl MemoryHandleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `handle`, as after a restart
    pub fn with_handle(handle: JobHandle) -> Self {
        Self {
            handle: Mutex::new(Some(handle)),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<JobHandle>> {
        self.handle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl JobHandleStore for MemoryHandleStore {
    fn get(&self) -> Option<JobHandle> {
        self.slot().clone()
    }

    fn set(&self, handle: &JobHandle) -> Result<(), StoreError> {
        *self.slot() = Some(handle.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.slot().take();
        Ok(())
    }
}
