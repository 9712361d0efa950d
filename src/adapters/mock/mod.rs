//! Mock implementations for testing.
//!
//! Lets the session driver run without network access.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with scripted streaming bodies

pub mod http;

pub use http::{MockChunk, MockHttpClient, MockResponse, RecordedRequest};
