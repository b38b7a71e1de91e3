//! Generate command
//!
//! Walks the four wizard steps from command-line arguments, submits the
//! request, waits for the schedule and optionally publishes it.

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::*;
use shiftwise_core::domain::request::GenerationMode;
use shiftwise_core::dto::availability::AvailabilityRequest;
use shiftwise_core::wizard::{GenerationWizard, WizardStep};
use shiftwise_scheduler::{Config, OrchestratorError, ResultView};
use tracing::warn;

use super::job::JobSession;
use crate::render::{print_availability, print_schedule};

/// Arguments of `shiftwise generate`
#[derive(Args)]
pub struct GenerateArgs {
    /// Venue ID
    #[arg(long)]
    venue: String,

    /// First day of the schedule (YYYY-MM-DD)
    #[arg(long)]
    start: String,

    /// Last day of the schedule (YYYY-MM-DD)
    #[arg(long)]
    end: String,

    /// Generation mode: coverage-first, cost-hint, manual-seed or balanced
    #[arg(long, default_value = "balanced")]
    mode: GenerationMode,

    /// Restrict generation to these staff members (default: all staff)
    #[arg(long = "staff")]
    staff: Vec<String>,

    /// Restrict generation to these phases (default: all phases)
    #[arg(long = "phase")]
    phases: Vec<String>,

    /// Required staff count for a selected phase, as PHASE=COUNT
    #[arg(long = "override")]
    overrides: Vec<String>,

    /// Publish the schedule once generated
    #[arg(long)]
    publish: bool,

    /// Notify staff of their shifts when publishing
    #[arg(long, requires = "publish")]
    notify: bool,
}

/// Handle `shiftwise generate`
pub async fn handle_generate(args: GenerateArgs, config: &Config) -> Result<()> {
    let mut session = JobSession::open(config)?;
    if let Some(job_id) = session.orchestrator.current_job() {
        bail!(
            "Job {} is still running; use `shiftwise resume` to follow it or `shiftwise abandon` to discard it",
            job_id
        );
    }
    let mut wizard = GenerationWizard::new(args.venue.clone());

    // Step 1: date range & mode
    print_step(wizard.step());
    wizard.set_start_date(args.start.as_str());
    wizard.set_end_date(args.end.as_str());
    wizard.set_mode(args.mode);
    wizard.next().context("Cannot leave the date range step")?;

    // Step 2: staff availability
    print_step(wizard.step());
    let range = wizard.date_range()?;
    match session
        .client
        .check_availability(&AvailabilityRequest::new(args.venue.as_str(), range))
        .await
    {
        Ok(availability) => print_availability(&availability, range),
        Err(e) => {
            warn!("Availability check failed: {}", e);
            println!("  {}", "Staff availability unavailable, continuing.".yellow());
        }
    }
    for staff_id in &args.staff {
        wizard.toggle_staff(staff_id);
    }
    wizard.next()?;

    // Step 3: phases & overrides
    print_step(wizard.step());
    for phase_id in &args.phases {
        wizard.toggle_phase(phase_id);
    }
    for raw in &args.overrides {
        let (phase_id, count) = raw.split_once('=').unwrap_or((raw.as_str(), ""));
        if wizard.set_phase_override(phase_id.trim(), count).is_none() {
            println!(
                "  {} ignoring override '{}' (needs a selected phase and a whole number)",
                "!".yellow(),
                raw
            );
        }
    }
    wizard.next()?;

    // Step 4: review & generate
    print_step(wizard.step());
    for line in wizard.summary() {
        println!("  {}", line);
    }
    println!();

    let request = wizard.build_request()?;
    let job_id = match session.orchestrator.start_job(request.clone()).await {
        Ok(job_id) => job_id,
        Err(OrchestratorError::JobInFlight(job_id)) => bail!(
            "Job {} is still running; use `shiftwise resume` to follow it or `shiftwise abandon` to discard it",
            job_id
        ),
        Err(e) => return Err(e.into()),
    };
    println!("{} {}", "Generating schedule, job".bold(), job_id.to_string().cyan());

    let result = session.wait_for_outcome().await?;

    let view = ResultView::new(&request, result);
    print_schedule(view.result());

    if !args.publish {
        return Ok(());
    }

    println!();
    match view.publish(session.client.as_ref(), args.notify).await {
        Ok(published) => {
            println!(
                "{} {}",
                "✓ Published schedule".green(),
                published.schedule_id.cyan()
            );
            if !published.message.is_empty() {
                println!("  {}", published.message.dimmed());
            }
            Ok(())
        }
        Err(failure) => Err(failure.into()),
    }
}

fn print_step(step: WizardStep) {
    println!();
    println!("{}", step.to_string().bold());
}
