//! Generation wizard
//!
//! A linear four-step form that accumulates a [`GenerationRequest`]:
//!
//! 1. Date range and generation mode
//! 2. Staff availability review (optional staff subset)
//! 3. Phase selection with per-phase staff-count overrides
//! 4. Review, the only step from which a request can be generated
//!
//! Steps are reached only through [`GenerationWizard::next`] and
//! [`GenerationWizard::previous`]. Values entered on one step survive moving
//! back and forth between steps.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::domain::request::{DateRange, GenerationMode, GenerationRequest, InvalidDateRange};

/// Wizard steps in navigation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    DateRangeMode,
    StaffAvailability,
    PhaseSelection,
    Review,
}

impl WizardStep {
    /// One-based position, as shown to the user
    pub fn number(self) -> u8 {
        match self {
            WizardStep::DateRangeMode => 1,
            WizardStep::StaffAvailability => 2,
            WizardStep::PhaseSelection => 3,
            WizardStep::Review => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::DateRangeMode => "Date range & mode",
            WizardStep::StaffAvailability => "Staff availability",
            WizardStep::PhaseSelection => "Phase selection",
            WizardStep::Review => "Review",
        }
    }

    fn following(self) -> Option<Self> {
        match self {
            WizardStep::DateRangeMode => Some(WizardStep::StaffAvailability),
            WizardStep::StaffAvailability => Some(WizardStep::PhaseSelection),
            WizardStep::PhaseSelection => Some(WizardStep::Review),
            WizardStep::Review => None,
        }
    }

    fn preceding(self) -> Option<Self> {
        match self {
            WizardStep::DateRangeMode => None,
            WizardStep::StaffAvailability => Some(WizardStep::DateRangeMode),
            WizardStep::PhaseSelection => Some(WizardStep::StaffAvailability),
            WizardStep::Review => Some(WizardStep::PhaseSelection),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {}/4: {}", self.number(), self.title())
    }
}

/// Reasons a wizard action was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("start and end dates are required")]
    MissingDates,

    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error(transparent)]
    InvalidRange(#[from] InvalidDateRange),

    #[error("a venue is required")]
    MissingVenue,

    #[error("a generation job is already in progress")]
    JobInFlight,

    #[error("already at the first step")]
    AtFirstStep,

    #[error("already at the last step")]
    AtLastStep,

    #[error("generate is only available from the review step")]
    NotAtReview,
}

/// Accumulated wizard state
#[derive(Debug, Clone)]
pub struct GenerationWizard {
    step: WizardStep,
    venue_id: String,
    start_date: String,
    end_date: String,
    mode: GenerationMode,
    staff_ids: Vec<String>,
    phase_ids: Vec<String>,
    phase_overrides: BTreeMap<String, u32>,
    job_in_flight: bool,
}

impl GenerationWizard {
    /// Creates a wizard for a venue, positioned on the first step
    pub fn new(venue_id: impl Into<String>) -> Self {
        Self {
            step: WizardStep::DateRangeMode,
            venue_id: venue_id.into(),
            start_date: String::new(),
            end_date: String::new(),
            mode: GenerationMode::default(),
            staff_ids: Vec::new(),
            phase_ids: Vec::new(),
            phase_overrides: BTreeMap::new(),
            job_in_flight: false,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn venue_id(&self) -> &str {
        &self.venue_id
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    // =============================================================================
    // Step 1: date range & mode
    // =============================================================================

    pub fn set_start_date(&mut self, date: impl Into<String>) {
        self.start_date = date.into();
    }

    pub fn set_end_date(&mut self, date: impl Into<String>) {
        self.end_date = date.into();
    }

    pub fn set_mode(&mut self, mode: GenerationMode) {
        self.mode = mode;
    }

    /// Parses the entered dates into a validated range
    pub fn date_range(&self) -> Result<DateRange, WizardError> {
        let start = self.start_date.trim();
        let end = self.end_date.trim();
        if start.is_empty() || end.is_empty() {
            return Err(WizardError::MissingDates);
        }

        let start = parse_date(start)?;
        let end = parse_date(end)?;
        Ok(DateRange::new(start, end)?)
    }

    // =============================================================================
    // Step 2: staff subset
    // =============================================================================

    /// Toggles a staff member in the subset; returns whether it is now selected
    pub fn toggle_staff(&mut self, staff_id: &str) -> bool {
        toggle(&mut self.staff_ids, staff_id)
    }

    pub fn selected_staff(&self) -> &[String] {
        &self.staff_ids
    }

    // =============================================================================
    // Step 3: phases & overrides
    // =============================================================================

    /// Toggles a phase in the subset; returns whether it is now selected
    ///
    /// Deselecting a phase discards its staff-count override.
    pub fn toggle_phase(&mut self, phase_id: &str) -> bool {
        let selected = toggle(&mut self.phase_ids, phase_id);
        if !selected {
            self.phase_overrides.remove(phase_id);
        }
        selected
    }

    pub fn selected_phases(&self) -> &[String] {
        &self.phase_ids
    }

    /// Sets the required staff count for a selected phase from raw user input
    ///
    /// Input that is not a non-negative integer, or an override for a phase
    /// that is not selected, drops the override. Returns the stored value.
    pub fn set_phase_override(&mut self, phase_id: &str, raw: &str) -> Option<u32> {
        let selected = self.phase_ids.iter().any(|p| p == phase_id);
        match raw.trim().parse::<u32>() {
            Ok(count) if selected => {
                self.phase_overrides.insert(phase_id.to_string(), count);
                Some(count)
            }
            _ => {
                self.phase_overrides.remove(phase_id);
                None
            }
        }
    }

    pub fn phase_override(&self, phase_id: &str) -> Option<u32> {
        self.phase_overrides.get(phase_id).copied()
    }

    // =============================================================================
    // Navigation
    // =============================================================================

    /// Marks whether a generation job is running; forward navigation and
    /// generate are disabled meanwhile.
    pub fn set_job_in_flight(&mut self, in_flight: bool) {
        self.job_in_flight = in_flight;
    }

    pub fn is_job_in_flight(&self) -> bool {
        self.job_in_flight
    }

    /// Checks the current step's requirements without moving
    pub fn validate_step(&self) -> Result<(), WizardError> {
        match self.step {
            WizardStep::DateRangeMode => self.date_range().map(|_| ()),
            // Empty selections mean "all staff" / "all phases".
            WizardStep::StaffAvailability | WizardStep::PhaseSelection | WizardStep::Review => {
                Ok(())
            }
        }
    }

    pub fn can_advance(&self) -> bool {
        !self.job_in_flight && self.step.following().is_some() && self.validate_step().is_ok()
    }

    /// Moves one step forward if the current step is complete
    ///
    /// On error the wizard stays where it is.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        if self.job_in_flight {
            return Err(WizardError::JobInFlight);
        }
        let following = self.step.following().ok_or(WizardError::AtLastStep)?;
        self.validate_step()?;
        self.step = following;
        Ok(self.step)
    }

    /// Moves one step back
    pub fn previous(&mut self) -> Result<WizardStep, WizardError> {
        self.step = self.step.preceding().ok_or(WizardError::AtFirstStep)?;
        Ok(self.step)
    }

    // =============================================================================
    // Generate
    // =============================================================================

    pub fn can_generate(&self) -> bool {
        self.step == WizardStep::Review && !self.job_in_flight && self.date_range().is_ok()
    }

    /// Produces the request to submit; available only on the review step
    pub fn build_request(&self) -> Result<GenerationRequest, WizardError> {
        if self.step != WizardStep::Review {
            return Err(WizardError::NotAtReview);
        }
        if self.job_in_flight {
            return Err(WizardError::JobInFlight);
        }
        if self.venue_id.trim().is_empty() {
            return Err(WizardError::MissingVenue);
        }

        let date_range = self.date_range()?;
        let non_empty = |ids: &[String]| (!ids.is_empty()).then(|| ids.to_vec());

        Ok(GenerationRequest {
            venue_id: self.venue_id.clone(),
            date_range,
            mode: self.mode,
            staff_ids: non_empty(&self.staff_ids),
            phase_ids: non_empty(&self.phase_ids),
            phase_staff_overrides: (!self.phase_overrides.is_empty())
                .then(|| self.phase_overrides.clone()),
        })
    }

    /// Human-readable lines describing the accumulated request
    pub fn summary(&self) -> Vec<String> {
        let range = match self.date_range() {
            Ok(range) => format!(
                "{} to {} ({} days)",
                range.start_date,
                range.end_date,
                range.num_days()
            ),
            Err(e) => format!("incomplete ({})", e),
        };
        let subset = |ids: &[String], all: &str| {
            if ids.is_empty() {
                all.to_string()
            } else {
                ids.join(", ")
            }
        };

        let mut lines = vec![
            format!("Venue:  {}", self.venue_id),
            format!("Dates:  {}", range),
            format!("Mode:   {}", self.mode),
            format!("Staff:  {}", subset(&self.staff_ids, "all staff")),
            format!("Phases: {}", subset(&self.phase_ids, "all phases")),
        ];
        for (phase, count) in &self.phase_overrides {
            lines.push(format!("  {} requires {} staff", phase, count));
        }
        lines
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, WizardError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| WizardError::InvalidDate(raw.to_string()))
}

fn toggle(ids: &mut Vec<String>, id: &str) -> bool {
    if let Some(pos) = ids.iter().position(|existing| existing == id) {
        ids.remove(pos);
        false
    } else {
        ids.push(id.to_string());
        true
    }
}
