//! Mock HTTP client for testing.
//!
//! Streams are scripted chunk by chunk so tests can place delays, transport
//! failures and never-ending connections exactly where they want them.

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::traits::{ByteStream, Headers, HttpClient, HttpError};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body
    pub body: String,
}

/// One step of a scripted response body.
#[derive(Debug, Clone)]
pub enum MockChunk {
    /// Deliver these bytes
    Data(Bytes),
    /// Sleep before the next step
    Delay(Duration),
    /// Fail the body stream with this error
    Error(HttpError),
    /// Never deliver anything again and never close
    Hang,
}

impl MockChunk {
    /// Convenience constructor for text chunks.
    pub fn text(text: &str) -> Self {
        MockChunk::Data(Bytes::copy_from_slice(text.as_bytes()))
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a stream of bytes
    Stream(Vec<Bytes>),
    /// Return a scripted stream
    Scripted(Vec<MockChunk>),
    /// Fail the request before any body is returned
    Error(HttpError),
}

/// Mock HTTP client for testing.
///
/// # Example
///
/// ```ignore
/// let client = MockHttpClient::new();
/// client.set_response(
///     "https://api.example.com/chat",
///     MockResponse::Stream(vec![Bytes::from("data: [DONE]\n")]),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Configured responses by URL pattern
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Body streams handed out and later dropped
    opened: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

/// Counts the release of one body stream when dropped.
struct ReleaseGuard(Arc<AtomicUsize>);

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client that answers every URL with the given stream chunks.
    pub fn streaming(chunks: Vec<Bytes>) -> Self {
        let client = Self::new();
        client.set_default_response(MockResponse::Stream(chunks));
        client
    }

    /// Set a response for a specific URL (exact or prefix match).
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of body streams handed out.
    pub fn streams_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Number of body streams that have been dropped (connection released).
    pub fn streams_released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    fn record_request(&self, url: &str, headers: &Headers, body: &str) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
            body: body.to_string(),
        });
    }

    /// Get the response for a URL.
    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        for (pattern, response) in responses.iter() {
            if url.starts_with(pattern) {
                return Some(response.clone());
            }
        }

        let default = self.default_response.lock().unwrap();
        default.clone()
    }

    fn scripted_stream(&self, script: Vec<MockChunk>) -> ByteStream {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let guard = ReleaseGuard(self.released.clone());

        let stream = futures::stream::unfold(script.into_iter(), |mut steps| async move {
            loop {
                match steps.next()? {
                    MockChunk::Data(bytes) => return Some((Ok(bytes), steps)),
                    MockChunk::Error(err) => return Some((Err(err), steps)),
                    MockChunk::Delay(duration) => tokio::time::sleep(duration).await,
                    MockChunk::Hang => futures::future::pending::<()>().await,
                }
            }
        })
        .map(move |item| {
            let _held = &guard;
            item
        });

        Box::pin(stream)
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        self.record_request(url, headers, body);

        match self.get_response(url) {
            Some(MockResponse::Stream(chunks)) => {
                Ok(self.scripted_stream(chunks.into_iter().map(MockChunk::Data).collect()))
            }
            Some(MockResponse::Scripted(script)) => Ok(self.scripted_stream(script)),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_post_stream_records_request() {
        let client = MockHttpClient::new();
        client.set_response(
            "https://example.com/chat",
            MockResponse::Stream(vec![Bytes::from("a"), Bytes::from("b")]),
        );

        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), "Bearer t".to_string());

        let stream = client
            .post_stream("https://example.com/chat", "{}", &headers)
            .await
            .unwrap();
        let chunks: Vec<_> = stream.collect().await;
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], Ok(Bytes::from("a")));

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://example.com/chat");
        assert_eq!(requests[0].body, "{}");
        assert_eq!(
            requests[0].headers.get("Authorization"),
            Some(&"Bearer t".to_string())
        );
    }

    #[tokio::test]
    async fn test_release_counted_on_drop() {
        let client = MockHttpClient::streaming(vec![Bytes::from("x")]);
        let stream = client
            .post_stream("https://example.com", "", &Headers::new())
            .await
            .unwrap();
        assert_eq!(client.streams_opened(), 1);
        assert_eq!(client.streams_released(), 0);
        drop(stream);
        assert_eq!(client.streams_released(), 1);
    }

    #[tokio::test]
    async fn test_scripted_error() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::Scripted(vec![
            MockChunk::text("data"),
            MockChunk::Error(HttpError::Io("reset".to_string())),
        ]));
        let stream = client
            .post_stream("https://example.com", "", &Headers::new())
            .await
            .unwrap();
        let items: Vec<_> = stream.collect().await;
        assert_eq!(items.len(), 2);
        assert!(items[1].is_err());
    }

    #[tokio::test]
    async fn test_request_error() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::Error(HttpError::ServerError {
            status: 500,
            message: "boom".to_string(),
        }));
        let result = client
            .post_stream("https://example.com", "", &Headers::new())
            .await;
        assert!(matches!(
            result,
            Err(HttpError::ServerError { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_no_response_configured() {
        let client = MockHttpClient::new();
        let result = client
            .post_stream("https://example.com", "", &Headers::new())
            .await;
        assert!(matches!(result, Err(HttpError::Other(_))));
    }
}
