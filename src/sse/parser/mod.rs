//! SSE line classification and payload parsing
//!
//! `parse_sse_line` labels one framed line. `PayloadParser` is the stateful
//! part: it turns `data:` lines into `PayloadEvent`s, stops after the
//! `[DONE]` sentinel and recovers from a payload that was split across two
//! physical lines.

mod content;

use crate::sse::events::{PayloadEvent, SseLine};

use content::parse_delta_payload;

/// Parse a single SSE line into its component type
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.is_empty() {
        return SseLine::Blank;
    }

    if let Some(stripped) = line.strip_prefix(':') {
        return SseLine::Comment(stripped.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("data:") {
        return SseLine::Data(rest.trim().to_string());
    }

    // event:, id:, retry: and stray text are all ignored
    SseLine::Unknown(line.to_string())
}

/// Text after the `data:` field name, untouched.
fn data_remainder(line: &str) -> Option<&str> {
    line.strip_prefix("data:")
}

/// Counters describing what the parser absorbed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserStats {
    /// Payloads recovered by joining with the following line
    pub merged: usize,
    /// Payloads dropped because they stayed invalid after the merge attempt
    pub dropped: usize,
}

/// Stateful payload parser, one per session.
#[derive(Debug, Default)]
pub struct PayloadParser {
    /// Raw remainder of a `data:` line that failed to parse, waiting to be
    /// joined with the next line. Untrimmed, so whitespace at the split
    /// point survives the merge.
    held: Option<String>,
    /// Set once the sentinel has been seen
    finished: bool,
    stats: ParserStats,
}

impl PayloadParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one framed line.
    ///
    /// Returns:
    /// - `Some(PayloadEvent::Delta(_))` - a chunk was parsed
    /// - `Some(PayloadEvent::Done)` - the sentinel; every later line yields `None`
    /// - `None` - nothing to report (blank, comment, unknown, held or dropped)
    pub fn feed_line(&mut self, line: &str) -> Option<PayloadEvent> {
        if self.finished {
            return None;
        }

        let parsed = parse_sse_line(line);

        if let Some(held) = self.held.take() {
            let continuation = match &parsed {
                SseLine::Blank | SseLine::Comment(_) => {
                    // Keep waiting for a line that can complete the payload
                    self.held = Some(held);
                    return None;
                }
                // One space after the field name is the separator, the rest
                // belongs to the payload
                SseLine::Data(_) => data_remainder(line)
                    .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
                    .unwrap_or_default(),
                SseLine::Unknown(raw) => raw.as_str(),
            };

            let merged = format!("{}{}", held, continuation);
            match parse_delta_payload(merged.trim()) {
                Ok(event) => {
                    self.stats.merged += 1;
                    tracing::debug!("Recovered split payload ({} bytes)", merged.len());
                    return Some(self.accept(event));
                }
                Err(e) => {
                    self.stats.dropped += 1;
                    tracing::debug!("Dropping malformed payload after merge attempt: {}", e);
                    // The current line gets its own chance below
                }
            }
        }

        match parsed {
            SseLine::Data(payload) if payload.is_empty() => None,
            SseLine::Data(payload) => match parse_delta_payload(&payload) {
                Ok(event) => Some(self.accept(event)),
                Err(e) => {
                    tracing::trace!("Holding unparsable payload for merge: {}", e);
                    self.held = Some(data_remainder(line).unwrap_or(&payload).to_string());
                    None
                }
            },
            SseLine::Blank | SseLine::Comment(_) | SseLine::Unknown(_) => None,
        }
    }

    fn accept(&mut self, event: PayloadEvent) -> PayloadEvent {
        if event == PayloadEvent::Done {
            self.finished = true;
        }
        event
    }

    /// Whether the sentinel has been seen
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether a malformed payload is waiting for its continuation
    pub fn has_held_payload(&self) -> bool {
        self.held.is_some()
    }

    /// End of stream. A payload still waiting for its continuation is dropped.
    pub fn finish(&mut self) -> ParserStats {
        if let Some(held) = self.held.take() {
            self.stats.dropped += 1;
            tracing::debug!("Dropping unterminated payload at end of stream ({} bytes)", held.len());
        }
        self.stats
    }

    /// Counters so far
    pub fn stats(&self) -> ParserStats {
        self.stats
    }
}
