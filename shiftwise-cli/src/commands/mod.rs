//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod availability;
mod generate;
mod job;

pub use generate::GenerateArgs;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;
use shiftwise_scheduler::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Walk the generation wizard, run the job and show the schedule
    Generate(GenerateArgs),
    /// Follow a generation job left running by a previous invocation
    Resume,
    /// Show the persisted generation job and its current status
    Status,
    /// Forget the persisted generation job without waiting for it
    Abandon,
    /// Show staff availability for a venue
    Availability {
        /// Venue ID
        #[arg(long)]
        venue: String,

        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The loaded configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Generate(args) => generate::handle_generate(args, config).await,
        Commands::Resume => job::resume_job(config).await,
        Commands::Status => job::show_status(config).await,
        Commands::Abandon => job::abandon_job(config).await,
        Commands::Availability { venue, start, end } => {
            availability::show_availability(config, &venue, start, end).await
        }
    }
}
