//! Client configuration.
//!
//! Everything a [`ChatStreamer`](crate::integrations::ChatStreamer) needs to
//! reach the completion endpoint.
//!
//! # Example
//!
//! ```ignore
//! use haven_stream::config::ClientConfig;
//!
//! let config = ClientConfig::new("https://api.example.com/v1/chat/stream", "token")
//!     .with_connect_timeout(Duration::from_secs(10))
//!     .with_header("X-Client", "haven");
//! ```

use std::time::Duration;
use thiserror::Error;

use crate::adapters::ReqwestHttpClient;
use crate::traits::{HttpError, Headers};

/// Endpoint URL
pub const URL_ENV: &str = "HAVEN_STREAM_URL";
/// Bearer token
pub const TOKEN_ENV: &str = "HAVEN_STREAM_TOKEN";
/// Optional whole-request timeout in seconds
pub const TIMEOUT_ENV: &str = "HAVEN_STREAM_TIMEOUT_SECS";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("Invalid timeout {value:?}: expected whole seconds")]
    InvalidTimeout { value: String },

    #[error("Invalid endpoint URL {0:?}: expected http:// or https://")]
    InvalidUrl(String),

    #[error("Bearer token is empty")]
    EmptyToken,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] HttpError),
}

/// Connection settings for the completion endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Streaming completion endpoint
    pub url: String,
    /// Sent as `Authorization: Bearer <token>`
    pub token: String,
    /// Sent on every request in addition to the required headers
    pub extra_headers: Headers,
    /// Bounds the whole request, body included. `None` means no limit.
    pub request_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            extra_headers: Headers::new(),
            request_timeout: None,
            connect_timeout: None,
        }
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Read the configuration from `HAVEN_STREAM_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(URL_ENV).ok_or(ConfigError::MissingVar(URL_ENV))?;
        let token = lookup(TOKEN_ENV).ok_or(ConfigError::MissingVar(TOKEN_ENV))?;
        let mut config = Self::new(url.trim(), token.trim());

        if let Some(value) = lookup(TIMEOUT_ENV) {
            let secs: u64 = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout { value: value.clone() })?;
            config = config.with_request_timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the URL scheme and token.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.url.clone()));
        }
        if self.token.trim().is_empty() {
            return Err(ConfigError::EmptyToken);
        }
        Ok(())
    }

    /// Headers for a streaming request. The required headers always win over
    /// an extra header of the same name.
    pub fn headers(&self) -> Headers {
        let mut headers = self.extra_headers.clone();
        headers.insert("Authorization".to_string(), format!("Bearer {}", self.token));
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        headers
    }

    /// Build the production HTTP client with the configured timeouts.
    pub fn build_http_client(&self) -> Result<ReqwestHttpClient, ConfigError> {
        Ok(ReqwestHttpClient::with_timeouts(
            self.request_timeout,
            self.connect_timeout,
        )?)
    }
}
