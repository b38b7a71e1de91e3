//! Availability DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::availability::StaffAvailability;
use crate::domain::request::DateRange;

/// Body of `POST /ai-scheduler/check-availability`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub venue_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl AvailabilityRequest {
    pub fn new(venue_id: impl Into<String>, range: DateRange) -> Self {
        Self {
            venue_id: venue_id.into(),
            start_date: range.start_date,
            end_date: range.end_date,
        }
    }
}

/// Per-staff availability for the requested range
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    #[serde(default)]
    pub staff: Vec<StaffAvailability>,
}

impl AvailabilityResponse {
    pub fn available_count(&self) -> usize {
        self.staff.iter().filter(|s| s.available).count()
    }
}
