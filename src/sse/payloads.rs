//! SSE payload deserialization structs
//!
//! Chat-completion chunks look like
//! `{"id":..,"choices":[{"index":0,"delta":{"content":"Hel"}}],..}`.
//! Only `choices[0].delta.content` is read; every other field is ignored so
//! new server fields never break parsing.

use serde::Deserialize;

/// One streamed completion chunk
#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct ChunkPayload {
    #[serde(default)]
    pub choices: Option<Vec<ChoicePayload>>,
}

/// Single choice inside a chunk
#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct ChoicePayload {
    /// Some servers send `"delta": null` on the final chunk
    #[serde(default)]
    pub delta: Option<DeltaPayload>,
}

/// Incremental message delta
#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct DeltaPayload {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChunkPayload {
    /// `choices[0].delta.content`, when present.
    pub fn into_fragment(self) -> Option<String> {
        self.choices
            .and_then(|choices| choices.into_iter().next())
            .and_then(|choice| choice.delta)
            .and_then(|delta| delta.content)
    }
}
