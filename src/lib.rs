//! haven-stream - streaming chat reply assembly
//!
//! Turns a chunked `text/event-stream` completion response into a growing
//! message, delivered to a UI through [`traits::StreamCallbacks`].
//!
//! - [`sse`] - bytes to payload events (decode, frame, parse)
//! - [`assembler`] - payload events to message snapshots
//! - [`session`] - the read loop, lifecycle and cancellation
//! - [`integrations`] - one [`integrations::ChatStreamer`] per UI surface

pub mod adapters;
pub mod assembler;
pub mod cli;
pub mod config;
pub mod error;
pub mod integrations;
pub mod models;
pub mod session;
pub mod sse;
pub mod traits;
