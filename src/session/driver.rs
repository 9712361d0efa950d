//! The streaming read loop.
//!
//! [`StreamSession`] issues one request, pulls the response body chunk by
//! chunk through an [`SsePipeline`] and a [`MessageAssembler`], and drives the
//! [`SessionState`] machine to exactly one terminal state.
//!
//! # Timeouts
//!
//! The session itself never times out. A peer that keeps the connection open
//! without sending anything hangs the session until it is cancelled. Put a
//! watchdog at the transport boundary (see
//! [`ReqwestHttpClient::with_timeouts`](crate::adapters::ReqwestHttpClient::with_timeouts))
//! or cancel through the [`CancelHandle`].

use futures::StreamExt;
use tokio::sync::watch;
use uuid::Uuid;

use super::cancel::CancelHandle;
use super::state::SessionState;
use crate::assembler::{AssembledMessage, MessageAssembler};
use crate::error::{NetworkError, StreamError};
use crate::sse::{PayloadEvent, PipelineSummary, SsePipeline};
use crate::traits::{ByteStream, Headers, HttpClient, StreamCallbacks, Termination};

const DEFAULT_FALLBACK_MESSAGE: &str = "Something went wrong while generating a reply.";

/// Everything needed to open the response stream.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRequest {
    pub url: String,
    /// Serialized JSON body
    pub body: String,
    pub headers: Headers,
}

/// Result of a finished session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub id: Uuid,
    /// Terminal state the session ended in
    pub state: SessionState,
    pub message: AssembledMessage,
    /// What the decoder and parser absorbed along the way
    pub summary: PipelineSummary,
}

impl SessionOutcome {
    pub fn text(&self) -> &str {
        &self.message.text
    }
}

enum Ending {
    Completed(Termination),
    Failed(NetworkError),
    Cancelled,
}

/// One streaming request/response exchange.
///
/// Each session owns its own pipeline and assembler; nothing is shared
/// between sessions.
pub struct StreamSession<C: StreamCallbacks> {
    id: Uuid,
    label: String,
    fallback_message: String,
    state: watch::Sender<SessionState>,
    cancel: CancelHandle,
    pipeline: SsePipeline,
    assembler: MessageAssembler<C>,
}

impl<C: StreamCallbacks> StreamSession<C> {
    pub fn new(callbacks: C) -> Self {
        let (state, _) = watch::channel(SessionState::Idle);
        Self {
            id: Uuid::new_v4(),
            label: "session".to_string(),
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            state,
            cancel: CancelHandle::new(),
            pipeline: SsePipeline::new(),
            assembler: MessageAssembler::new(callbacks),
        }
    }

    /// Name used in log lines (e.g. the UI integration)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Text handed to `on_error` for display instead of the raw error
    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    /// Use an existing cancel handle instead of a fresh one
    pub fn with_cancel_handle(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Watch state transitions from outside the session.
    pub fn subscribe_state(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Run the session to a terminal state.
    ///
    /// Callbacks are made on the calling task. A cancelled session makes no
    /// further callbacks and releases the connection before returning.
    pub async fn run<H>(mut self, client: &H, request: &SessionRequest) -> SessionOutcome
    where
        H: HttpClient + ?Sized,
    {
        let cancel = self.cancel.clone();

        if cancel.is_cancelled() {
            tracing::debug!(session_id = %self.id, "Session {} cancelled before start", self.label);
            return self.conclude(Ending::Cancelled);
        }

        tracing::info!(
            session_id = %self.id,
            "Starting {} stream to {}",
            self.label,
            request.url
        );
        self.transition(SessionState::Connecting);

        let connected = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = client.post_stream(&request.url, &request.body, &request.headers) => Some(result),
        };

        let stream = match connected {
            None => return self.conclude(Ending::Cancelled),
            Some(Err(e)) => {
                return self.conclude(Ending::Failed(NetworkError::from_http(e, &request.url)))
            }
            Some(Ok(stream)) => stream,
        };

        self.transition(SessionState::Streaming);
        let ending = self.read_loop(stream, &cancel, &request.url).await;
        self.conclude(ending)
    }

    async fn read_loop(&mut self, mut stream: ByteStream, cancel: &CancelHandle, url: &str) -> Ending {
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ending::Cancelled,
                item = stream.next() => item,
            };

            match next {
                Some(Ok(chunk)) => {
                    tracing::trace!(session_id = %self.id, "Received {} bytes", chunk.len());
                    for event in self.pipeline.push_chunk(&chunk) {
                        // A callback may have cancelled us
                        if cancel.is_cancelled() {
                            return Ending::Cancelled;
                        }
                        match event {
                            PayloadEvent::Delta(Some(fragment)) => {
                                self.assembler.push_delta(&fragment);
                            }
                            PayloadEvent::Delta(None) => {}
                            PayloadEvent::Done => return Ending::Completed(Termination::Sentinel),
                        }
                    }
                }
                Some(Err(e)) => return Ending::Failed(NetworkError::from_http(e, url)),
                None => return Ending::Completed(Termination::ConnectionClosed),
            }
        }
    }

    fn transition(&self, next: SessionState) -> bool {
        let current = self.state();
        if !current.can_transition_to(next) {
            tracing::warn!(
                session_id = %self.id,
                "Ignoring invalid session transition {} -> {}",
                current,
                next
            );
            return false;
        }
        tracing::debug!(session_id = %self.id, "Session {} -> {}", current, next);
        self.state.send_replace(next);
        true
    }

    fn conclude(mut self, ending: Ending) -> SessionOutcome {
        let summary = self.pipeline.finish();
        self.log_absorbed(&summary);

        let message = match ending {
            Ending::Completed(termination) => {
                self.transition(SessionState::Completed);
                if termination == Termination::ConnectionClosed {
                    let soft = StreamError::SoftTermination;
                    tracing::warn!(
                        session_id = %self.id,
                        code = soft.error_code(),
                        "{} stream ended without sentinel",
                        self.label
                    );
                }
                self.assembler.complete(termination)
            }
            Ending::Failed(err) => {
                self.transition(SessionState::Failed);
                let err = StreamError::from(err);
                tracing::warn!(
                    session_id = %self.id,
                    code = err.error_code(),
                    "{} stream failed: {}",
                    self.label,
                    err
                );
                let fallback = self.fallback_message.clone();
                self.assembler.fail(err, &fallback)
            }
            Ending::Cancelled => {
                self.transition(SessionState::Cancelled);
                tracing::info!(session_id = %self.id, "{} stream cancelled", self.label);
                self.assembler.cancel()
            }
        };

        tracing::info!(
            session_id = %self.id,
            "{} session finished: {} ({} deltas, {} chars)",
            self.label,
            self.state(),
            message.delta_count,
            message.text.chars().count()
        );

        SessionOutcome {
            id: self.id,
            state: self.state(),
            message,
            summary,
        }
    }

    fn log_absorbed(&self, summary: &PipelineSummary) {
        if summary.replacements > 0 {
            let err = StreamError::Decode {
                replacements: summary.replacements,
            };
            tracing::warn!(session_id = %self.id, code = err.error_code(), "{}", err);
        }
        if summary.parser.dropped > 0 {
            let err = StreamError::Frame {
                dropped: summary.parser.dropped,
            };
            tracing::debug!(session_id = %self.id, code = err.error_code(), "{}", err);
        }
    }
}
