//! Staff availability command

use anyhow::{Context, Result};
use chrono::NaiveDate;
use shiftwise_core::domain::request::DateRange;
use shiftwise_core::dto::availability::AvailabilityRequest;
use shiftwise_scheduler::Config;

use crate::render::print_availability;

/// Fetch and print staff availability for a venue
pub async fn show_availability(
    config: &Config,
    venue: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<()> {
    let range = DateRange::new(start, end)?;
    let client = config.build_client()?;

    let availability = client
        .check_availability(&AvailabilityRequest::new(venue, range))
        .await
        .context("Failed to check staff availability")?;

    print_availability(&availability, range);
    Ok(())
}
