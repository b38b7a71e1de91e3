//! Scheduler configuration
//!
//! Defines all configurable parameters for talking to the AI-scheduler
//! backend: connection settings, the polling cadence and the bounds on how
//! long a single job is observed.

use anyhow::Context;
use shiftwise_client::SchedulerClient;
use std::path::PathBuf;
use std::time::Duration;

use crate::scheduler::PollConfig;

/// File inside the state directory holding the in-flight job handle
pub const JOB_STATE_FILE: &str = "current-job.json";

/// Scheduler configuration
///
/// All intervals and bounds are configurable to allow tuning for different
/// deployments (local backend vs. remote, fast vs. slow generation).
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL (e.g., "http://localhost:3000/api")
    pub api_url: String,

    /// Bearer token forwarded on every request
    pub api_token: Option<String>,

    /// Directory where the in-flight job handle is persisted
    pub state_dir: PathBuf,

    /// How often to poll the status of a running job
    pub poll_interval: Duration,

    /// Timeout applied to every HTTP request
    pub request_timeout: Duration,

    /// Consecutive failed status checks after which a job is abandoned
    pub max_consecutive_poll_failures: u32,

    /// Longest time a single job is observed before it is abandoned
    pub max_job_duration: Duration,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            api_token: None,
            state_dir: PathBuf::from(".shiftwise"),
            poll_interval: Duration::from_millis(3000),
            request_timeout: Duration::from_secs(30),
            max_consecutive_poll_failures: 20,
            max_job_duration: Duration::from_secs(900), // 15 minutes
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - SHIFTWISE_API_URL (required)
    /// - SHIFTWISE_API_TOKEN (optional)
    /// - SHIFTWISE_STATE_DIR (optional, default: .shiftwise)
    /// - SHIFTWISE_POLL_INTERVAL_MS (optional, milliseconds, default: 3000)
    /// - SHIFTWISE_REQUEST_TIMEOUT (optional, seconds, default: 30)
    /// - SHIFTWISE_MAX_POLL_FAILURES (optional, default: 20)
    /// - SHIFTWISE_MAX_JOB_DURATION (optional, seconds, default: 900)
    pub fn from_env() -> anyhow::Result<Self> {
        let api_url = std::env::var("SHIFTWISE_API_URL")
            .map_err(|_| anyhow::anyhow!("SHIFTWISE_API_URL environment variable not set"))?;

        Ok(Self::new(api_url).with_env_overrides())
    }

    /// Applies the optional SHIFTWISE_* variables on top of this configuration
    pub fn with_env_overrides(self) -> Self {
        let mut config = self;

        config.api_token = std::env::var("SHIFTWISE_API_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());

        if let Ok(dir) = std::env::var("SHIFTWISE_STATE_DIR") {
            config.state_dir = PathBuf::from(dir);
        }

        if let Some(ms) = env_number::<u64>("SHIFTWISE_POLL_INTERVAL_MS") {
            config.poll_interval = Duration::from_millis(ms);
        }

        if let Some(secs) = env_number::<u64>("SHIFTWISE_REQUEST_TIMEOUT") {
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(max) = env_number::<u32>("SHIFTWISE_MAX_POLL_FAILURES") {
            config.max_consecutive_poll_failures = max;
        }

        if let Some(secs) = env_number::<u64>("SHIFTWISE_MAX_JOB_DURATION") {
            config.max_job_duration = Duration::from_secs(secs);
        }

        config
    }

    /// Overrides the backend URL
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_url.is_empty() {
            anyhow::bail!("api_url cannot be empty");
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.max_consecutive_poll_failures == 0 {
            anyhow::bail!("max_consecutive_poll_failures must be greater than 0");
        }

        if self.max_job_duration < self.poll_interval {
            anyhow::bail!("max_job_duration must be at least one poll_interval");
        }

        Ok(())
    }

    /// Path of the persisted job handle
    pub fn state_file(&self) -> PathBuf {
        self.state_dir.join(JOB_STATE_FILE)
    }

    /// Polling parameters for the job poller
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: self.poll_interval,
            max_consecutive_failures: self.max_consecutive_poll_failures,
            max_duration: self.max_job_duration,
        }
    }

    /// Builds an HTTP client honouring the request timeout and token
    pub fn build_client(&self) -> anyhow::Result<SchedulerClient> {
        let http_client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let client = SchedulerClient::with_client(self.api_url.clone(), http_client);
        Ok(match &self.api_token {
            Some(token) => client.with_bearer_token(token.clone()),
            None => client,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:3000/api".to_string())
    }
}

fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse::<T>().ok())
}
