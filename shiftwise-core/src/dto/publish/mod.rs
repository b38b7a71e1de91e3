//! Publish DTOs
//!
//! The publish endpoint recomputes cost, role and display fields server-side,
//! so a published shift carries only who works, in which phase, and when.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::request::{DateRange, GenerationMode};
use crate::domain::schedule::{ScheduleResult, ShiftAssignment};

/// A shift as accepted by `POST /ai-scheduler/publish`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishShift {
    pub staff_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl From<&ShiftAssignment> for PublishShift {
    fn from(shift: &ShiftAssignment) -> Self {
        Self {
            staff_id: shift.staff_id.clone(),
            phase_id: shift.phase_id.clone(),
            start_time: shift.start_time,
            end_time: shift.end_time,
        }
    }
}

/// Body of `POST /ai-scheduler/publish`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub venue_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub shifts: Vec<PublishShift>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_mode: Option<GenerationMode>,
    /// Ask the backend to notify staff of their new shifts
    #[serde(
        rename = "sendWhatsApp",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub send_notification: Option<bool>,
}

impl PublishRequest {
    /// Builds the publish payload for a generated schedule, keeping shift order
    pub fn from_result(
        venue_id: impl Into<String>,
        range: DateRange,
        mode: Option<GenerationMode>,
        result: &ScheduleResult,
        send_notification: bool,
    ) -> Self {
        Self {
            venue_id: venue_id.into(),
            start_date: range.start_date,
            end_date: range.end_date,
            shifts: result.shifts.iter().map(PublishShift::from).collect(),
            ai_reasoning: result.metadata.reasoning.clone(),
            ai_mode: mode,
            send_notification: Some(send_notification),
        }
    }
}

/// Response of `POST /ai-scheduler/publish`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub schedule_id: String,
    #[serde(default)]
    pub message: String,
}
