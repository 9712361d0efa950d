//! Incremental UTF-8 decoding of raw response chunks.
//!
//! The network delivers bytes with no regard for character boundaries, so a
//! multi-byte character can straddle two chunks. `Utf8Decoder` holds back an
//! incomplete trailing sequence until the next chunk completes it. Invalid
//! sequences become U+FFFD and decoding carries on.

use std::borrow::Cow;

/// Placeholder for bytes that cannot be decoded.
pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

/// Stateful UTF-8 decoder, one per session.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    /// Leading bytes of a character whose remaining bytes have not arrived yet.
    /// Never longer than 3 bytes.
    pending: Vec<u8>,
    /// Number of replacement characters emitted so far
    replacements: usize,
}

impl Utf8Decoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk, returning all text that is complete so far.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let bytes: Cow<'_, [u8]> = if self.pending.is_empty() {
            Cow::Borrowed(chunk)
        } else {
            let mut joined = std::mem::take(&mut self.pending);
            joined.extend_from_slice(chunk);
            Cow::Owned(joined)
        };

        let mut out = String::with_capacity(bytes.len());
        let mut rest: &[u8] = &bytes;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    // `valid` is well-formed, so this borrows without copying
                    out.push_str(&String::from_utf8_lossy(valid));

                    match err.error_len() {
                        Some(bad) => {
                            out.push(REPLACEMENT_CHARACTER);
                            self.replacements += 1;
                            rest = &after[bad..];
                        }
                        None => {
                            // Truncated sequence at the end of the chunk
                            self.pending.extend_from_slice(after);
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Flush at end of stream. A dangling partial sequence becomes a single
    /// replacement character.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        self.pending.clear();
        self.replacements += 1;
        REPLACEMENT_CHARACTER.to_string()
    }

    /// Bytes held back waiting for the rest of a character.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Total replacement characters produced by this decoder.
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}
