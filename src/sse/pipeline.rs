//! Decoder → framer → parser, chained for one session.

use super::decoder::Utf8Decoder;
use super::events::PayloadEvent;
use super::framer::LineFramer;
use super::parser::{ParserStats, PayloadParser};

/// What the pipeline absorbed over a whole stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Replacement characters substituted for undecodable bytes
    pub replacements: usize,
    /// Bytes of an unterminated final line that were discarded
    pub discarded_tail_bytes: usize,
    /// Payload merge / drop counters
    pub parser: ParserStats,
}

/// Turns raw response chunks into payload events, in arrival order.
#[derive(Debug, Default)]
pub struct SsePipeline {
    decoder: Utf8Decoder,
    framer: LineFramer,
    parser: PayloadParser,
}

impl SsePipeline {
    /// Create a fresh pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and collect every event it completed.
    ///
    /// Once the sentinel has been produced, further input is ignored.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<PayloadEvent> {
        if self.parser.is_finished() {
            tracing::trace!("Ignoring {} bytes after sentinel", chunk.len());
            return Vec::new();
        }

        let text = self.decoder.decode(chunk);
        self.feed_text(&text)
    }

    fn feed_text(&mut self, text: &str) -> Vec<PayloadEvent> {
        let mut events = Vec::new();
        for line in self.framer.push(text) {
            if let Some(event) = self.parser.feed_line(&line) {
                let done = event == PayloadEvent::Done;
                events.push(event);
                if done {
                    break;
                }
            }
        }
        events
    }

    /// Whether the sentinel has been seen
    pub fn is_finished(&self) -> bool {
        self.parser.is_finished()
    }

    /// End of stream: flush the decoder, then discard any unterminated line
    /// and any held payload.
    pub fn finish(&mut self) -> PipelineSummary {
        let tail = self.decoder.finish();
        // A dangling partial character only ever extends the carry buffer
        if !tail.is_empty() && !self.parser.is_finished() {
            let _ = self.framer.push(&tail);
        }

        let discarded_tail_bytes = self.framer.finish();
        if discarded_tail_bytes > 0 {
            tracing::debug!(
                "Discarding {} bytes of unterminated final line",
                discarded_tail_bytes
            );
        }

        PipelineSummary {
            replacements: self.decoder.replacements(),
            discarded_tail_bytes,
            parser: self.parser.finish(),
        }
    }
}
