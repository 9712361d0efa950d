//! Streaming-related error types.
//!
//! Only `Transport` and `SoftTermination` end a session. Decode and frame
//! problems are absorbed by the pipeline and only ever logged.

use std::fmt;

use super::category::ErrorCategory;
use super::network::NetworkError;

/// Stream-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError {
    /// Connection failure or non-2xx status. Terminal, surfaced via `on_error`.
    Transport(NetworkError),

    /// Undecodable bytes were replaced with U+FFFD. Non-fatal.
    Decode { replacements: usize },

    /// A payload stayed malformed after the merge attempt and was dropped.
    /// Non-fatal.
    Frame { dropped: usize },

    /// The connection closed without the `[DONE]` sentinel. Ends the session
    /// as a completion that may be partial.
    SoftTermination,

    /// The caller cancelled the session. Never shown to the user.
    Cancelled,
}

impl StreamError {
    /// Whether this error ends the session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamError::Transport(_) | StreamError::SoftTermination | StreamError::Cancelled
        )
    }

    /// Whether this error reaches the caller through `on_error`.
    pub fn is_surfaced(&self) -> bool {
        matches!(self, StreamError::Transport(_))
    }

    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            StreamError::Transport(err) => err.is_retryable(),
            StreamError::SoftTermination => true,
            _ => false,
        }
    }

    /// Category used for logging and recovery hints.
    pub fn category(&self) -> ErrorCategory {
        match self {
            StreamError::Transport(err) => err.category(),
            _ => ErrorCategory::Protocol,
        }
    }

    /// Get a user-friendly error message. Never contains raw parser or
    /// transport details.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::Transport(err) => err.user_message(),
            StreamError::Decode { .. } => {
                "Some characters in the reply could not be displayed.".to_string()
            }
            StreamError::Frame { .. } => "Part of the reply could not be read.".to_string(),
            StreamError::SoftTermination => "The reply may be incomplete.".to_string(),
            StreamError::Cancelled => "Stopped.".to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::Transport(err) => err.error_code(),
            StreamError::Decode { .. } => "E_STREAM_DECODE",
            StreamError::Frame { .. } => "E_STREAM_FRAME",
            StreamError::SoftTermination => "E_STREAM_SOFT_END",
            StreamError::Cancelled => "E_STREAM_CANCELLED",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Transport(err) => write!(f, "Transport error: {}", err),
            StreamError::Decode { replacements } => {
                write!(f, "Replaced {} undecodable byte sequence(s)", replacements)
            }
            StreamError::Frame { dropped } => {
                write!(f, "Dropped {} malformed payload(s)", dropped)
            }
            StreamError::SoftTermination => {
                write!(f, "Stream closed without completion sentinel")
            }
            StreamError::Cancelled => write!(f, "Stream cancelled"),
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NetworkError> for StreamError {
    fn from(err: NetworkError) -> Self {
        StreamError::Transport(err)
    }
}
