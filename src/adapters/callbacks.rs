//! Ready-made [`StreamCallbacks`] implementations.

use tokio::sync::mpsc;

use crate::traits::{DoneInfo, ErrorInfo, StreamCallbacks};

/// Callbacks built from three closures.
///
/// ```ignore
/// let callbacks = FnCallbacks::new(
///     |text| render(text),
///     |done| finish(done),
///     |err| show_fallback(&err.fallback_message),
/// );
/// ```
pub struct FnCallbacks<D, F, E>
where
    D: FnMut(&str) + Send,
    F: FnMut(&DoneInfo) + Send,
    E: FnMut(&ErrorInfo) + Send,
{
    on_delta: D,
    on_done: F,
    on_error: E,
}

impl<D, F, E> FnCallbacks<D, F, E>
where
    D: FnMut(&str) + Send,
    F: FnMut(&DoneInfo) + Send,
    E: FnMut(&ErrorInfo) + Send,
{
    pub fn new(on_delta: D, on_done: F, on_error: E) -> Self {
        Self {
            on_delta,
            on_done,
            on_error,
        }
    }
}

impl<D, F, E> StreamCallbacks for FnCallbacks<D, F, E>
where
    D: FnMut(&str) + Send,
    F: FnMut(&DoneInfo) + Send,
    E: FnMut(&ErrorInfo) + Send,
{
    fn on_delta(&mut self, text: &str) {
        (self.on_delta)(text)
    }

    fn on_done(&mut self, info: &DoneInfo) {
        (self.on_done)(info)
    }

    fn on_error(&mut self, info: &ErrorInfo) {
        (self.on_error)(info)
    }
}

/// One session notification, as sent by [`ChannelCallbacks`].
#[derive(Debug, Clone, PartialEq)]
pub enum StreamUpdate {
    /// Message so far
    Delta(String),
    Done(DoneInfo),
    Error(ErrorInfo),
}

impl StreamUpdate {
    /// Whether this is the last update a session will send.
    pub fn is_final(&self) -> bool {
        !matches!(self, StreamUpdate::Delta(_))
    }
}

/// Forwards notifications into an unbounded channel, for UIs that drain
/// updates on their own event loop.
#[derive(Debug, Clone)]
pub struct ChannelCallbacks {
    tx: mpsc::UnboundedSender<StreamUpdate>,
}

impl ChannelCallbacks {
    pub fn new(tx: mpsc::UnboundedSender<StreamUpdate>) -> Self {
        Self { tx }
    }

    /// Create the callbacks together with the receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StreamUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn send(&self, update: StreamUpdate) {
        if self.tx.send(update).is_err() {
            tracing::trace!("Stream update receiver dropped");
        }
    }
}

impl StreamCallbacks for ChannelCallbacks {
    fn on_delta(&mut self, text: &str) {
        self.send(StreamUpdate::Delta(text.to_string()));
    }

    fn on_done(&mut self, info: &DoneInfo) {
        self.send(StreamUpdate::Done(info.clone()));
    }

    fn on_error(&mut self, info: &ErrorInfo) {
        self.send(StreamUpdate::Error(info.clone()));
    }
}
