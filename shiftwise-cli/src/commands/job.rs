//! Job command handlers
//!
//! Resuming, inspecting and abandoning the persisted generation job, plus the
//! shared plumbing that waits for a job's outcome.

use anyhow::{Context, Result, anyhow, bail};
use colored::*;
use shiftwise_client::SchedulerClient;
use shiftwise_core::domain::schedule::ScheduleResult;
use shiftwise_scheduler::{
    Config, FileHandleStore, JobCallbacks, JobHandleStore, JobOrchestrator, JobOutcome, JobState,
};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::render::{colorize_status, print_job_details, print_schedule};

/// Forwards job outcomes to the waiting command
struct ChannelCallbacks {
    tx: mpsc::UnboundedSender<JobOutcome>,
}

impl JobCallbacks for ChannelCallbacks {
    fn on_complete(&self, result: ScheduleResult) {
        let _ = self.tx.send(JobOutcome::Completed(result));
    }

    fn on_error(&self, message: String) {
        let _ = self.tx.send(JobOutcome::Failed(message));
    }
}

/// An orchestrator wired to the persisted state file
pub struct JobSession {
    pub client: Arc<SchedulerClient>,
    pub orchestrator: JobOrchestrator,
    outcomes: mpsc::UnboundedReceiver<JobOutcome>,
}

impl JobSession {
    /// Builds the session; a persisted job is resumed immediately
    pub fn open(config: &Config) -> Result<Self> {
        let client = Arc::new(config.build_client()?);
        let store = Arc::new(FileHandleStore::new(config.state_file()));
        let (tx, outcomes) = mpsc::unbounded_channel();

        let orchestrator = JobOrchestrator::new(
            client.clone(),
            store,
            config.poll_config(),
            Arc::new(ChannelCallbacks { tx }),
        );

        Ok(Self {
            client,
            orchestrator,
            outcomes,
        })
    }

    /// Waits for the current job's outcome, printing progress meanwhile
    ///
    /// Ctrl-C stops waiting but leaves the job persisted for `resume`.
    pub async fn wait_for_outcome(&mut self) -> Result<ScheduleResult> {
        let mut state = self.orchestrator.subscribe();
        let mut watching = true;

        loop {
            tokio::select! {
                outcome = self.outcomes.recv() => {
                    return match outcome {
                        Some(JobOutcome::Completed(result)) => Ok(result),
                        Some(JobOutcome::Failed(message)) => Err(anyhow!(message)),
                        None => Err(anyhow!("Job observer stopped unexpectedly")),
                    };
                }
                changed = state.changed(), if watching => {
                    if changed.is_err() {
                        watching = false;
                        continue;
                    }
                    print_progress(&state.borrow_and_update());
                }
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    println!(
                        "{}",
                        "Stopped waiting. The job keeps running; use `shiftwise resume` to follow it."
                            .yellow()
                    );
                    bail!("interrupted");
                }
            }
        }
    }
}

fn print_progress(state: &JobState) {
    let Some(job_id) = &state.job_id else {
        return;
    };
    match (&state.status, &state.last_error) {
        (_, Some(error)) => println!(
            "  {} job {} status check failed, retrying: {}",
            "!".yellow(),
            job_id.to_string().dimmed(),
            error
        ),
        (Some(status), None) => println!(
            "  {} job {} {}",
            "…".cyan(),
            job_id.to_string().dimmed(),
            colorize_status(status)
        ),
        (None, None) => {}
    }
}

/// Follow the persisted job to completion
pub async fn resume_job(config: &Config) -> Result<()> {
    let mut session = JobSession::open(config)?;

    let Some(job_id) = session.orchestrator.current_job() else {
        println!("{}", "No generation job to resume.".yellow());
        return Ok(());
    };

    println!("{} {}", "Resuming job".bold(), job_id.to_string().cyan());
    let result = session.wait_for_outcome().await?;
    print_schedule(&result);
    println!();
    println!(
        "{}",
        "Run `shiftwise generate ... --publish` to publish a schedule.".dimmed()
    );

    Ok(())
}

/// Show the persisted job and one fresh status check
pub async fn show_status(config: &Config) -> Result<()> {
    let store = FileHandleStore::new(config.state_file());

    let Some(job_id) = store.get() else {
        println!("{}", "No generation job in flight.".yellow());
        return Ok(());
    };

    let client = config.build_client()?;
    let job = client
        .get_job_status(&job_id)
        .await
        .with_context(|| format!("Failed to fetch status of job {}", job_id))?;

    print_job_details(&job);
    if job.status.is_active() {
        println!();
        println!(
            "{}",
            "Run `shiftwise resume` to wait for the schedule.".dimmed()
        );
    }
    Ok(())
}

/// Forget the persisted job
pub async fn abandon_job(config: &Config) -> Result<()> {
    let session = JobSession::open(config)?;

    match session.orchestrator.current_job() {
        Some(job_id) => {
            session.orchestrator.clear_job()?;
            println!(
                "{} {}",
                "✓ Abandoned job".green(),
                job_id.to_string().dimmed()
            );
        }
        None => println!("{}", "No generation job in flight.".yellow()),
    }

    Ok(())
}
