//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`FnCallbacks`] - session callbacks from closures
//! - [`ChannelCallbacks`] - session callbacks forwarded into a tokio channel
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - scripted streaming responses

pub mod callbacks;
pub mod mock;
pub mod reqwest_http;

pub use callbacks::{ChannelCallbacks, FnCallbacks, StreamUpdate};
pub use mock::MockHttpClient;
pub use reqwest_http::ReqwestHttpClient;
