//! Completion-chunk payload parser

use crate::sse::events::{PayloadEvent, SseParseError, DONE_SENTINEL};
use crate::sse::payloads::ChunkPayload;

/// Parse one `data:` payload.
///
/// JSON that is well-formed but shaped differently than expected (missing
/// `choices`, `content` of the wrong type, a bare number) yields an empty
/// delta. Only syntactically broken or truncated JSON is an error.
pub(super) fn parse_delta_payload(payload: &str) -> Result<PayloadEvent, SseParseError> {
    if payload == DONE_SENTINEL {
        return Ok(PayloadEvent::Done);
    }

    match serde_json::from_str::<ChunkPayload>(payload) {
        Ok(chunk) => Ok(PayloadEvent::Delta(chunk.into_fragment())),
        Err(e) if e.is_data() => {
            tracing::trace!("Unexpected chunk shape, treating as empty delta: {}", e);
            Ok(PayloadEvent::Delta(None))
        }
        Err(e) => Err(SseParseError::InvalidJson {
            payload: payload.to_string(),
            source: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_delta() {
        let result = parse_delta_payload(r#"{"choices":[{"delta":{"content":"Hel"}}]}"#);
        assert_eq!(result.unwrap(), PayloadEvent::Delta(Some("Hel".to_string())));
    }

    #[test]
    fn test_parse_done_sentinel() {
        assert_eq!(parse_delta_payload("[DONE]").unwrap(), PayloadEvent::Done);
    }

    #[test]
    fn test_parse_with_extra_fields() {
        // Servers add ids, model names, usage and more; none of it matters
        let result = parse_delta_payload(
            r#"{"id":"chatcmpl-1","object":"chat.completion.chunk","model":"m","choices":[{"index":0,"delta":{"role":"assistant","content":"Hi"},"logprobs":null,"finish_reason":null}],"extra":{"a":1}}"#,
        );
        assert_eq!(result.unwrap(), PayloadEvent::Delta(Some("Hi".to_string())));
    }

    #[test]
    fn test_parse_without_content_field() {
        let result = parse_delta_payload(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#);
        assert_eq!(result.unwrap(), PayloadEvent::Delta(None));

        let result = parse_delta_payload(r#"{"choices":[]}"#);
        assert_eq!(result.unwrap(), PayloadEvent::Delta(None));
    }

    #[test]
    fn test_parse_unexpected_shape_is_not_an_error() {
        let result = parse_delta_payload(r#"{"choices":[{"delta":{"content":42}}]}"#);
        assert_eq!(result.unwrap(), PayloadEvent::Delta(None));

        let result = parse_delta_payload("42");
        assert_eq!(result.unwrap(), PayloadEvent::Delta(None));
    }

    #[test]
    fn test_parse_truncated_json() {
        let result = parse_delta_payload(r#"{"choices":[{"delta":{"content":"Hel"#);
        assert!(matches!(result, Err(SseParseError::InvalidJson { .. })));
    }

    #[test]
    fn test_parse_garbage() {
        let result = parse_delta_payload("not json");
        assert!(matches!(result, Err(SseParseError::InvalidJson { .. })));
    }

    #[test]
    fn test_sentinel_must_match_exactly() {
        // A sentinel with trailing junk is just bad JSON
        assert!(parse_delta_payload("[DONE]x").is_err());
    }
}
