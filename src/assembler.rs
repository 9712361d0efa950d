//! Incremental message assembly.
//!
//! The assembler owns the running text for one session and is the only place
//! that talks to the subscriber. That keeps the delivery rules in one spot:
//! snapshots (never diffs) after each accepted delta, at most one terminal
//! notification, and nothing after it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StreamError;
use crate::traits::{DoneInfo, ErrorInfo, StreamCallbacks, Termination};

/// How an assembled message ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    /// Sentinel received
    Complete,
    /// Connection closed without the sentinel
    Partial,
    /// Caller cancelled
    Cancelled,
    /// Transport failure
    Failed,
}

/// A finalized message. Frozen: nothing appends to it after finalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledMessage {
    pub text: String,
    pub completion: Completion,
    /// Number of non-empty fragments appended
    pub delta_count: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Accumulates deltas for one session and notifies its subscriber.
pub struct MessageAssembler<C: StreamCallbacks> {
    callbacks: C,
    text: String,
    delta_count: usize,
    started_at: DateTime<Utc>,
    frozen: Option<AssembledMessage>,
}

impl<C: StreamCallbacks> MessageAssembler<C> {
    /// Start an empty message
    pub fn new(callbacks: C) -> Self {
        Self {
            callbacks,
            text: String::new(),
            delta_count: 0,
            started_at: Utc::now(),
            frozen: None,
        }
    }

    /// Append a fragment and emit the full text so far.
    ///
    /// Returns `false` if the fragment was not accepted because the message
    /// is already finalized. Empty fragments are accepted but emit nothing.
    pub fn push_delta(&mut self, fragment: &str) -> bool {
        if self.frozen.is_some() {
            tracing::trace!("Ignoring delta after finalization");
            return false;
        }
        if fragment.is_empty() {
            return true;
        }

        self.text.push_str(fragment);
        self.delta_count += 1;
        self.callbacks.on_delta(&self.text);
        true
    }

    /// Finalize as done and call `on_done`.
    ///
    /// Like every finalizer, this only notifies on the first call; later
    /// calls return the already frozen message.
    pub fn complete(&mut self, termination: Termination) -> AssembledMessage {
        let completion = match termination {
            Termination::Sentinel => Completion::Complete,
            Termination::ConnectionClosed => Completion::Partial,
        };
        let (message, fresh) = self.finalize(completion);
        if fresh {
            self.callbacks.on_done(&DoneInfo {
                text: message.text.clone(),
                termination,
            });
        }
        message
    }

    /// Finalize as failed, keeping the partial text, and call `on_error`.
    pub fn fail(&mut self, error: StreamError, fallback_message: &str) -> AssembledMessage {
        let (message, fresh) = self.finalize(Completion::Failed);
        if fresh {
            self.callbacks.on_error(&ErrorInfo {
                error,
                partial_text: message.text.clone(),
                fallback_message: fallback_message.to_string(),
            });
        }
        message
    }

    /// Finalize as cancelled. No callback is made.
    pub fn cancel(&mut self) -> AssembledMessage {
        self.finalize(Completion::Cancelled).0
    }

    fn finalize(&mut self, completion: Completion) -> (AssembledMessage, bool) {
        if let Some(message) = &self.frozen {
            tracing::debug!(
                "Message already finalized as {:?}, ignoring {:?}",
                message.completion,
                completion
            );
            return (message.clone(), false);
        }

        let message = AssembledMessage {
            text: self.text.clone(),
            completion,
            delta_count: self.delta_count,
            started_at: self.started_at,
            finished_at: Utc::now(),
        };
        self.frozen = Some(message.clone());
        (message, true)
    }

    /// Text assembled so far
    pub fn text(&self) -> &str {
        &self.text
    }

    /// How the message was finalized, if it has been
    pub fn completion(&self) -> Option<Completion> {
        self.frozen.as_ref().map(|m| m.completion)
    }

    pub fn is_finalized(&self) -> bool {
        self.frozen.is_some()
    }

    /// Give back the subscriber
    pub fn into_callbacks(self) -> C {
        self.callbacks
    }
}
