//! Generated schedule domain types
//!
//! A [`ScheduleResult`] is produced once per completed generation job. Cost,
//! hours and coverage figures are computed by the backend and only displayed
//! here.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One staff member assigned to one shift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftAssignment {
    pub staff_id: String,
    pub staff_name: String,
    pub role: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub hours: f64,
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_name: Option<String>,
}

/// Totals for a single calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: NaiveDate,
    pub total_shifts: u32,
    pub total_hours: f64,
    pub total_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_percentage: Option<f64>,
}

/// Aggregate figures for the whole generated schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMetadata {
    pub total_shifts: u32,
    pub total_hours: f64,
    pub total_cost: f64,
    pub coverage_percentage: f64,
    /// Free-text explanation produced by the AI scheduler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Outcome of a completed generation job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub shifts: Vec<ShiftAssignment>,
    #[serde(default)]
    pub daily_summaries: Vec<DaySummary>,
    pub metadata: ScheduleMetadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ScheduleResult {
    /// Sum of shift hours, independent of the server-reported total
    pub fn total_hours(&self) -> f64 {
        self.shifts.iter().map(|s| s.hours).sum()
    }

    /// Sum of shift costs, independent of the server-reported total
    pub fn total_cost(&self) -> f64 {
        self.shifts.iter().map(|s| s.cost).sum()
    }

    /// Shifts grouped by the calendar day they start on, in chronological order
    pub fn shifts_by_day(&self) -> Vec<(NaiveDate, Vec<&ShiftAssignment>)> {
        let mut days: std::collections::BTreeMap<NaiveDate, Vec<&ShiftAssignment>> =
            std::collections::BTreeMap::new();
        for shift in &self.shifts {
            days.entry(shift.start_time.date_naive())
                .or_default()
                .push(shift);
        }
        for shifts in days.values_mut() {
            shifts.sort_by_key(|s| s.start_time);
        }
        days.into_iter().collect()
    }
}
