//! Per-UI entry points.
//!
//! Each UI surface (the floating assistant, the full chat page, the
//! rewrite-message action) owns one [`ChatStreamer`]. Every call to
//! [`ChatStreamer::start`] or [`ChatStreamer::run`] creates a fresh
//! [`StreamSession`], so two open widgets never share parser or assembler
//! state.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::NetworkError;
use crate::models::{ChatMessage, StreamRequest};
use crate::session::{CancelHandle, SessionOutcome, SessionRequest, SessionState, StreamSession};
use crate::traits::{HttpClient, StreamCallbacks};

/// The UI surfaces that stream replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Integration {
    FloatingAssistant,
    FullChat,
    RewriteMessage,
}

impl Integration {
    /// Default context tag sent with every request
    pub fn context_tag(&self) -> &'static str {
        match self {
            Integration::FloatingAssistant => "assistant",
            Integration::FullChat => "chat",
            Integration::RewriteMessage => "rewrite",
        }
    }

    /// What the UI shows instead of a raw error
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Integration::FloatingAssistant => {
                "The assistant is unavailable right now. Please try again in a moment."
            }
            Integration::FullChat => "Something went wrong while generating a reply. Please try again.",
            Integration::RewriteMessage => "Couldn't rewrite your message. Your draft is unchanged.",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Integration::FloatingAssistant => "floating_assistant",
            Integration::FullChat => "full_chat",
            Integration::RewriteMessage => "rewrite_message",
        }
    }
}

impl fmt::Display for Integration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Integration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assistant" | "floating_assistant" => Ok(Integration::FloatingAssistant),
            "chat" | "full_chat" => Ok(Integration::FullChat),
            "rewrite" | "rewrite_message" => Ok(Integration::RewriteMessage),
            other => Err(format!(
                "Unknown integration '{}' (expected assistant, chat or rewrite)",
                other
            )),
        }
    }
}

/// A session running on its own task.
#[derive(Debug)]
pub struct SessionHandle {
    id: Uuid,
    cancel: CancelHandle,
    state: watch::Receiver<SessionState>,
    task: JoinHandle<SessionOutcome>,
}

impl SessionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Request cancellation. Returns `false` if it was already requested.
    /// Cancelling a finished session has no effect.
    pub fn cancel(&self) -> bool {
        self.cancel.cancel()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the session to end.
    pub async fn join(self) -> Result<SessionOutcome, tokio::task::JoinError> {
        self.task.await
    }
}

/// Starts streaming sessions for one UI integration.
pub struct ChatStreamer<H: HttpClient> {
    client: Arc<H>,
    config: ClientConfig,
    integration: Integration,
    /// Set by `with_context`; otherwise the integration's own tag is used
    context: Option<String>,
    fallback_message: String,
}

impl<H: HttpClient + 'static> ChatStreamer<H> {
    pub fn new(client: H, config: ClientConfig, integration: Integration) -> Self {
        Self::with_shared_client(Arc::new(client), config, integration)
    }

    /// Share one HTTP client (and its connection pool) between integrations.
    pub fn with_shared_client(client: Arc<H>, config: ClientConfig, integration: Integration) -> Self {
        Self {
            client,
            config,
            integration,
            context: None,
            fallback_message: integration.fallback_message().to_string(),
        }
    }

    /// Override the context tag
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    pub fn integration(&self) -> Integration {
        self.integration
    }

    pub fn context(&self) -> &str {
        self.context
            .as_deref()
            .unwrap_or_else(|| self.integration.context_tag())
    }

    /// Request body for a history
    pub fn build_request(&self, history: Vec<ChatMessage>) -> StreamRequest {
        StreamRequest::new(history, self.context())
    }

    /// Request body for rewriting a draft. Uses the `rewrite` context unless
    /// this streamer's context was overridden.
    pub fn build_rewrite_request(&self, draft: &str) -> StreamRequest {
        let mut request = StreamRequest::rewrite(draft);
        if let Some(context) = &self.context {
            request.context = context.clone();
        }
        request
    }

    fn prepare<C: StreamCallbacks>(
        &self,
        request: &StreamRequest,
        callbacks: C,
    ) -> Result<(StreamSession<C>, SessionRequest), NetworkError> {
        let body = request.to_body().map_err(|e| NetworkError::InvalidRequest {
            message: format!("Failed to serialize request: {}", e),
        })?;

        let session = StreamSession::new(callbacks)
            .with_label(self.integration.as_str())
            .with_fallback_message(self.fallback_message.clone());
        let session_request = SessionRequest {
            url: self.config.url.clone(),
            body,
            headers: self.config.headers(),
        };
        Ok((session, session_request))
    }

    /// Stream a reply on the current task.
    ///
    /// An `Err` means the request could not be built; nothing was sent and
    /// no callback was made.
    pub async fn run<C: StreamCallbacks>(
        &self,
        history: Vec<ChatMessage>,
        callbacks: C,
    ) -> Result<SessionOutcome, NetworkError> {
        self.run_request(&self.build_request(history), callbacks).await
    }

    /// Like [`run`](Self::run) with a prebuilt request.
    pub async fn run_request<C: StreamCallbacks>(
        &self,
        request: &StreamRequest,
        callbacks: C,
    ) -> Result<SessionOutcome, NetworkError> {
        let (session, session_request) = self.prepare(request, callbacks)?;
        Ok(session.run(self.client.as_ref(), &session_request).await)
    }

    /// Stream a reply on a new tokio task.
    pub fn start<C: StreamCallbacks + 'static>(
        &self,
        history: Vec<ChatMessage>,
        callbacks: C,
    ) -> Result<SessionHandle, NetworkError> {
        self.start_request(&self.build_request(history), callbacks)
    }

    /// Like [`start`](Self::start) with a prebuilt request.
    pub fn start_request<C: StreamCallbacks + 'static>(
        &self,
        request: &StreamRequest,
        callbacks: C,
    ) -> Result<SessionHandle, NetworkError> {
        let (session, session_request) = self.prepare(request, callbacks)?;
        let id = session.id();
        let cancel = session.cancel_handle();
        let state = session.subscribe_state();
        let client = self.client.clone();

        let task = tokio::spawn(async move { session.run(client.as_ref(), &session_request).await });

        Ok(SessionHandle {
            id,
            cancel,
            state,
            task,
        })
    }

    /// Rewrite a draft, see [`build_rewrite_request`](Self::build_rewrite_request).
    pub fn start_rewrite<C: StreamCallbacks + 'static>(
        &self,
        draft: &str,
        callbacks: C,
    ) -> Result<SessionHandle, NetworkError> {
        self.start_request(&self.build_rewrite_request(draft), callbacks)
    }
}
