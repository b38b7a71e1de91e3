//! Shiftwise HTTP Client
//!
//! A small, type-safe HTTP client for the AI-scheduler REST API.
//!
//! The scheduler crate talks to the backend exclusively through the
//! [`SchedulerApi`] trait, which [`SchedulerClient`] implements; tests swap in
//! scripted fakes.
//!
//! # Example
//!
//! ```no_run
//! use shiftwise_client::SchedulerClient;
//! use shiftwise_core::domain::job::JobHandle;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = SchedulerClient::new("http://localhost:3000/api");
//!
//!     let job = client.get_job_status(&JobHandle::new("j1")).await?;
//!     println!("Job {} is {}", job.job_id, job.status);
//!     Ok(())
//! }
//! ```

mod api;
pub mod error;
mod jobs;
mod schedules;

// Re-export commonly used types
pub use api::SchedulerApi;
pub use error::{ClientError, Result};

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// HTTP client for the AI-scheduler API
///
/// Endpoints are grouped as:
/// - Job lifecycle (start async generation, fetch job status)
/// - Schedules (publish, staff availability)
#[derive(Debug, Clone)]
pub struct SchedulerClient {
    /// Base URL of the backend API (e.g., "http://localhost:3000/api")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Bearer token forwarded on every request
    token: Option<String>,
}

impl SchedulerClient {
    /// Create a new scheduler client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the backend API (e.g., "http://localhost:3000/api")
    ///
    /// # Example
    /// ```
    /// use shiftwise_client::SchedulerClient;
    ///
    /// let client = SchedulerClient::new("http://localhost:3000/api");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new scheduler client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use shiftwise_client::SchedulerClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = SchedulerClient::with_client("http://localhost:3000/api", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            token: None,
        }
    }

    /// Attach a bearer token to every request
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL of an endpoint below the base URL
    ///
    /// Each segment is percent-encoded on its own, so opaque values such as
    /// job handles can never alter the path or add a query.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let builder = self.client.request(method, self.endpoint(segments)?);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and returns an [`ClientError::ApiError`] carrying
    /// the backend's message if the request failed, or deserializes the body.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(
                status.as_u16(),
                extract_error_message(&error_text),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

/// Unwraps `{"message": ...}` or `{"error": ...}` bodies, falling back to the raw text
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| body.to_string())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = SchedulerClient::new("http://localhost:3000/api");
        assert_eq!(client.base_url(), "http://localhost:3000/api");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = SchedulerClient::new("http://localhost:3000/api/");
        assert_eq!(client.base_url(), "http://localhost:3000/api");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = SchedulerClient::with_client("http://localhost:3000/api", http_client)
            .with_bearer_token("secret");
        assert_eq!(client.base_url(), "http://localhost:3000/api");
        assert_eq!(client.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let client = SchedulerClient::new("http://localhost:3000/api/");
        let url = client.endpoint(&["ai-scheduler", "job", "j?x=1#a/b"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/ai-scheduler/job/j%3Fx=1%23a%2Fb"
        );
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_endpoint_rejects_invalid_base_url() {
        let client = SchedulerClient::new("not a url");
        let err = client.endpoint(&["ai-scheduler"]).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_extract_error_message() {
        assert_eq!(
            extract_error_message(r#"{"message":"venue not found"}"#),
            "venue not found"
        );
        assert_eq!(extract_error_message(r#"{"error":"bad range"}"#), "bad range");
        assert_eq!(extract_error_message("Bad Gateway"), "Bad Gateway");
    }
}
