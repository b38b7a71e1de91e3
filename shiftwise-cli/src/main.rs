//! Shiftwise CLI
//!
//! Command-line front end for AI schedule generation: walks the generation
//! wizard, follows the resulting job and publishes the schedule.

mod commands;
mod config;
mod render;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shiftwise")]
#[command(about = "Shiftwise AI schedule generator CLI", long_about = None)]
struct Cli {
    /// Backend API URL
    #[arg(long, env = "SHIFTWISE_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "shiftwise_cli=info,shiftwise_scheduler=info,shiftwise_client=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = config::load(cli.api_url)?;

    handle_command(cli.command, &config).await
}
