//! Subscriber contract for a streaming session.
//!
//! Every UI integration receives the same three notifications: the message so
//! far, a single completion, or a single failure.

use crate::error::StreamError;

/// How a completed stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The `[DONE]` sentinel arrived
    Sentinel,
    /// The server closed the body without the sentinel
    ConnectionClosed,
}

/// Passed to [`StreamCallbacks::on_done`].
#[derive(Debug, Clone, PartialEq)]
pub struct DoneInfo {
    /// Final assembled text
    pub text: String,
    pub termination: Termination,
}

impl DoneInfo {
    /// True when the stream ended without the sentinel, so the reply may have
    /// been cut short.
    pub fn is_possibly_partial(&self) -> bool {
        self.termination == Termination::ConnectionClosed
    }
}

/// Passed to [`StreamCallbacks::on_error`].
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorInfo {
    /// What went wrong. Meant for logs, not for display.
    pub error: StreamError,
    /// Everything assembled before the failure. Keep showing it.
    pub partial_text: String,
    /// Message to show in place of the raw error
    pub fallback_message: String,
}

/// Receives the output of one session.
///
/// The session guarantees ordering: zero or more `on_delta` calls, then at
/// most one of `on_done` / `on_error`, then nothing. A cancelled session
/// ends without either.
pub trait StreamCallbacks: Send {
    /// Full accumulated text after a delta was appended (not the delta itself).
    fn on_delta(&mut self, text: &str);

    /// The stream completed.
    fn on_done(&mut self, info: &DoneInfo);

    /// The stream failed. `info.partial_text` is what was shown so far.
    fn on_error(&mut self, info: &ErrorInfo);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_done_info_partial_flag() {
        let confirmed = DoneInfo {
            text: "Hi".to_string(),
            termination: Termination::Sentinel,
        };
        assert!(!confirmed.is_possibly_partial());

        let soft = DoneInfo {
            text: "Hi".to_string(),
            termination: Termination::ConnectionClosed,
        };
        assert!(soft.is_possibly_partial());
    }
}
