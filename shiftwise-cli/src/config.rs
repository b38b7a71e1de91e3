//! Configuration loading
//!
//! Reads the scheduler configuration from the environment, falling back to
//! defaults, and applies command-line overrides.

use anyhow::Result;
use shiftwise_scheduler::Config;
use tracing::debug;

/// Loads and validates the configuration
///
/// # Arguments
/// * `api_url` - Backend URL given on the command line, if any
pub fn load(api_url: Option<String>) -> Result<Config> {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            debug!("Using default backend URL: {}", e);
            Config::default().with_env_overrides()
        }
    };

    let config = match api_url {
        Some(url) => config.with_api_url(url),
        None => config,
    };

    config.validate()?;
    Ok(config)
}
