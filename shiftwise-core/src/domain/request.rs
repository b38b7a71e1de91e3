//! Generation request domain types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Strategy the AI scheduler should favour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationMode {
    CoverageFirst,
    CostHint,
    ManualSeed,
    #[default]
    Balanced,
}

impl GenerationMode {
    pub const ALL: [GenerationMode; 4] = [
        GenerationMode::CoverageFirst,
        GenerationMode::CostHint,
        GenerationMode::ManualSeed,
        GenerationMode::Balanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GenerationMode::CoverageFirst => "COVERAGE_FIRST",
            GenerationMode::CostHint => "COST_HINT",
            GenerationMode::ManualSeed => "MANUAL_SEED",
            GenerationMode::Balanced => "BALANCED",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = String;

    /// Accepts `BALANCED`, `balanced`, `coverage-first` and `coverage_first` spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_").to_ascii_uppercase();
        GenerationMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown generation mode '{}' (expected one of: coverage-first, cost-hint, manual-seed, balanced)",
                    s
                )
            })
    }
}

/// Error returned when a date range ends before it starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("end date {end} is before start date {start}")]
pub struct InvalidDateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, InvalidDateRange> {
        if start_date > end_date {
            return Err(InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Number of calendar days covered, both ends included
    pub fn num_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Every day of the range in order, both ends included
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |day| *day <= end)
    }
}

/// Body of `POST /ai-scheduler/generate/async`
///
/// Absent staff or phase subsets mean "all staff" / "all phases" of the venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub venue_id: String,
    pub date_range: DateRange,
    pub mode: GenerationMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_ids: Option<Vec<String>>,
    /// Required staff count per phase id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_staff_overrides: Option<BTreeMap<String, u32>>,
}
