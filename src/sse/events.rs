//! SSE line and payload types
//!
//! `SseLine` is the classification of one framed line. `PayloadEvent` is what
//! a `data:` payload turns into once parsed.

/// Literal payload that marks the end of a completion stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Represents a classified SSE line
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Empty line - event separator, no effect
    Blank,
    /// Comment / keep-alive line (starts with ':')
    Comment(String),
    /// Data payload with surrounding whitespace trimmed
    Data(String),
    /// Anything else (`event:`, `id:`, stray continuation text, ...)
    Unknown(String),
}

impl SseLine {
    /// Short label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            SseLine::Blank => "blank",
            SseLine::Comment(_) => "comment",
            SseLine::Data(_) => "data",
            SseLine::Unknown(_) => "unknown",
        }
    }
}

/// Result of parsing one `data:` payload
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadEvent {
    /// A completion chunk. `None` when the chunk carried no text fragment
    /// (role announcements, finish_reason chunks, usage records).
    Delta(Option<String>),
    /// The `[DONE]` sentinel
    Done,
}

impl PayloadEvent {
    /// The text fragment, if this is a delta that carries one.
    pub fn fragment(&self) -> Option<&str> {
        match self {
            PayloadEvent::Delta(Some(text)) => Some(text.as_str()),
            _ => None,
        }
    }
}

/// Errors that can occur while parsing a payload
#[derive(Debug, Clone, PartialEq)]
pub enum SseParseError {
    /// Invalid JSON in data payload
    InvalidJson { payload: String, source: String },
}

impl std::fmt::Display for SseParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SseParseError::InvalidJson { payload, source } => {
                write!(f, "Invalid JSON payload ({} bytes): {}", payload.len(), source)
            }
        }
    }
}

impl std::error::Error for SseParseError {}
