//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - streaming POST against the completion endpoint
//! - [`StreamCallbacks`] - subscriber for one session's output

pub mod callbacks;
pub mod http;

pub use callbacks::{DoneInfo, ErrorInfo, StreamCallbacks, Termination};
pub use http::{ByteStream, Headers, HttpClient, HttpError};
