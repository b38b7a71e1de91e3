//! File-backed job handle store
//!
//! The handle is written as `{"jobId": "..."}` to a single state file. Writes
//! go through a temporary sibling file and a rename so a crash never leaves a
//! half-written handle behind.

use serde::{Deserialize, Serialize};
use shiftwise_core::domain::job::JobHandle;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{JobHandleStore, StoreError};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredJob {
    job_id: JobHandle,
}

/// Store persisting the handle to a JSON file
#[derive(Debug, Clone)]
pub struct FileHandleStore {
    path: PathBuf,
}

impl FileHandleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl JobHandleStore for FileHandleStore {
    fn get(&self) -> Option<JobHandle> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read job state {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<StoredJob>(&contents) {
            Ok(stored) if !stored.job_id.as_str().is_empty() => Some(stored.job_id),
            Ok(_) => None,
            Err(e) => {
                warn!("Ignoring corrupt job state {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn set(&self, handle: &JobHandle) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_vec(&StoredJob {
            job_id: handle.clone(),
        })?;
        let temp = self.temp_path();
        std::fs::write(&temp, contents)?;
        std::fs::rename(&temp, &self.path)?;

        debug!("Persisted job {} to {}", handle, self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Cleared job state {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
