//! Reqwest-based HTTP client adapter.
//!
//! Production implementation of [`HttpClient`] on top of reqwest's
//! `bytes_stream`.

use async_trait::async_trait;
use futures_util::StreamExt;
use std::time::Duration;

use crate::error::classify_reqwest_error;
use crate::traits::{ByteStream, Headers, HttpClient, HttpError};

/// HTTP client implementation using reqwest.
///
/// # Example
///
/// ```ignore
/// use haven_stream::adapters::ReqwestHttpClient;
/// use haven_stream::traits::HttpClient;
///
/// let client = ReqwestHttpClient::new();
/// let body = client.post_stream("https://api.example.com/chat", "{}", &Headers::new()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new ReqwestHttpClient with default settings (no timeouts).
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a new ReqwestHttpClient with a custom reqwest::Client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a client with transport-level timeouts.
    ///
    /// The streaming core never times out on its own; this is where a
    /// watchdog belongs. Note that reqwest's request timeout covers the whole
    /// body, so it also bounds how long a reply may stream.
    pub fn with_timeouts(
        request: Option<Duration>,
        connect: Option<Duration>,
    ) -> Result<Self, HttpError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = request {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = connect {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| HttpError::Other(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Get a reference to the underlying reqwest::Client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Apply headers to a request builder.
    fn apply_headers(
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        let mut builder = builder;
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        let builder = self.client.post(url).body(body.to_string());
        let builder = Self::apply_headers(builder, headers);

        let response = builder
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::debug!("POST {} returned HTTP {}", url, status);
            return Err(HttpError::ServerError { status, message });
        }

        let stream = response
            .bytes_stream()
            .map(|result| result.map_err(|e| classify_reqwest_error(&e)));

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reqwest_http_client_new() {
        let client = ReqwestHttpClient::new();
        let _inner = client.inner();
    }

    #[test]
    fn test_reqwest_http_client_with_timeouts() {
        let client = ReqwestHttpClient::with_timeouts(
            Some(Duration::from_secs(120)),
            Some(Duration::from_secs(10)),
        );
        assert!(client.is_ok());
    }

    #[test]
    fn test_apply_headers() {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Authorization".to_string(), "Bearer token".to_string());

        let client = reqwest::Client::new();
        let builder = client.post("http://localhost/chat");
        let request = ReqwestHttpClient::apply_headers(builder, &headers)
            .build()
            .unwrap();

        assert_eq!(request.headers()["content-type"], "application/json");
        assert_eq!(request.headers()["authorization"], "Bearer token");
    }

    #[tokio::test]
    async fn test_connection_refused_is_classified() {
        let client = ReqwestHttpClient::new();
        // Port 9 (discard) on localhost is almost never listening
        let result = client
            .post_stream("http://127.0.0.1:9/chat", "{}", &Headers::new())
            .await;
        assert!(matches!(
            result,
            Err(HttpError::ConnectionFailed(_)) | Err(HttpError::Other(_))
        ));
    }
}
