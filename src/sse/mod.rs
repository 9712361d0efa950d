//! SSE (Server-Sent Events) stream parser
//!
//! Parses the chat-completion event stream. The format is a sequence of
//! `\n`-delimited lines (optional trailing `\r`):
//! - `data: <json>` - one completion chunk
//! - `data: [DONE]` - end of stream
//! - Empty line - event separator
//! - Lines starting with `:` - keep-alive comments (ignored)
//!
//! # Module structure
//! - `decoder` - incremental UTF-8 decoding across chunk boundaries
//! - `framer` - carry buffer and complete-line extraction
//! - `events` - line and payload types (SseLine, PayloadEvent, SseParseError)
//! - `payloads` - internal payload deserialization structs
//! - `parser` - line classification and the stateful PayloadParser
//! - `pipeline` - all of the above chained for one session

mod decoder;
mod events;
mod framer;
mod parser;
mod payloads;
mod pipeline;

// Re-export public types
pub use decoder::{Utf8Decoder, REPLACEMENT_CHARACTER};
pub use events::{PayloadEvent, SseLine, SseParseError, DONE_SENTINEL};
pub use framer::LineFramer;
pub use parser::{parse_sse_line, ParserStats, PayloadParser};
pub use pipeline::{PipelineSummary, SsePipeline};
