//! Request models for the completion endpoint.

mod message;
mod request;

pub use message::{ChatMessage, Role};
pub use request::{StreamRequest, REWRITE_CONTEXT};
