//! Line framing over decoded text.
//!
//! Text arrives in arbitrary fragments. `LineFramer` keeps whatever follows
//! the last `\n` in a carry buffer and only hands out complete lines, with a
//! trailing `\r` stripped.

/// Splits decoded text into complete lines, carrying partial lines forward.
#[derive(Debug, Default)]
pub struct LineFramer {
    carry: String,
}

impl LineFramer {
    /// Create a new framer with an empty carry buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` and return every line it completed, in order.
    ///
    /// Calling again with more text resumes from the carry buffer, so the
    /// concatenation of all returned lines never skips or repeats input.
    pub fn push(&mut self, text: &str) -> Vec<String> {
        self.carry.push_str(text);

        let Some(last_newline) = self.carry.rfind('\n') else {
            return Vec::new();
        };

        let remainder = self.carry.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.carry, remainder);

        complete
            .split_terminator('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect()
    }

    /// Text received since the last line delimiter.
    pub fn pending(&self) -> &str {
        &self.carry
    }

    /// End of stream. An unterminated trailing line is never emitted; its
    /// length in bytes is returned so callers can report it.
    pub fn finish(&mut self) -> usize {
        let discarded = self.carry.len();
        self.carry.clear();
        discarded
    }
}
