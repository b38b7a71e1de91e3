//! Job DTOs for the async generation endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::job::{JobError, JobHandle, JobStatus};
use crate::domain::schedule::ScheduleResult;

/// Message used when a job fails without a server-supplied reason
pub const GENERIC_FAILURE_MESSAGE: &str = "Schedule generation failed";

/// Response of `POST /ai-scheduler/generate/async`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartJobResponse {
    pub job_id: JobHandle,
    pub status: JobStatus,
    #[serde(default)]
    pub message: String,
}

/// Response of `GET /ai-scheduler/job/{jobId}`
///
/// `result` stays raw JSON until [`JobStatusResponse::schedule`] decodes it, so
/// a malformed schedule never hides the terminal status around it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    pub job_id: JobHandle,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JobError>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobStatusResponse {
    /// Decodes the schedule attached to the job, if any
    pub fn schedule(&self) -> Result<Option<ScheduleResult>, serde_json::Error> {
        self.result
            .as_ref()
            .map(ScheduleResult::deserialize)
            .transpose()
    }

    /// Human-readable failure reason, falling back to a generic message
    pub fn error_message(&self) -> String {
        self.error
            .as_ref()
            .map(|e| e.message.trim())
            .filter(|m| !m.is_empty())
            .unwrap_or(GENERIC_FAILURE_MESSAGE)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_fallback() {
        let mut response: JobStatusResponse = serde_json::from_value(serde_json::json!({
            "jobId": "j1",
            "status": "FAILED",
            "createdAt": "2025-01-05T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(response.error_message(), GENERIC_FAILURE_MESSAGE);

        response.error = Some(JobError {
            message: "no staff available".to_string(),
        });
        assert_eq!(response.error_message(), "no staff available");

        response.error = Some(JobError {
            message: "  ".to_string(),
        });
        assert_eq!(response.error_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_malformed_schedule_keeps_status() {
        let response: JobStatusResponse = serde_json::from_value(serde_json::json!({
            "jobId": "j1",
            "status": "COMPLETED",
            "createdAt": "2025-01-05T10:00:00Z",
            "result": {
                "shifts": [],
                "metadata": { "totalShifts": 0, "totalHours": 0.0, "totalCost": 0.0 }
            }
        }))
        .unwrap();

        assert_eq!(response.status, JobStatus::Completed);
        let err = response.schedule().unwrap_err();
        assert!(err.to_string().contains("coveragePercentage"));
    }

    #[test]
    fn test_schedule_absent() {
        let response: JobStatusResponse = serde_json::from_value(serde_json::json!({
            "jobId": "j1",
            "status": "PROCESSING",
            "createdAt": "2025-01-05T10:00:00Z"
        }))
        .unwrap();
        assert!(response.schedule().unwrap().is_none());
    }
}
