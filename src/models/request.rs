use serde::{Deserialize, Serialize};

use super::message::ChatMessage;

/// Context tag used when rewriting a draft
pub const REWRITE_CONTEXT: &str = "rewrite";

/// Body of a streaming completion request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamRequest {
    /// Conversation history, oldest first
    pub messages: Vec<ChatMessage>,
    /// Behavior profile the remote side should use
    pub context: String,
}

impl StreamRequest {
    /// Create a request from a history and a context tag
    pub fn new(messages: Vec<ChatMessage>, context: impl Into<String>) -> Self {
        Self {
            messages,
            context: context.into(),
        }
    }

    /// Single-turn request asking for a rewrite of `draft`
    pub fn rewrite(draft: impl Into<String>) -> Self {
        Self::new(vec![ChatMessage::user(draft)], REWRITE_CONTEXT)
    }

    /// Serialize to the JSON wire body
    pub fn to_body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_wire_shape() {
        let request = StreamRequest::new(
            vec![ChatMessage::system("Be brief."), ChatMessage::user("Hi")],
            "chat",
        );
        let value: serde_json::Value = serde_json::from_str(&request.to_body().unwrap()).unwrap();
        assert_eq!(value["context"], "chat");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "Hi");
        assert_eq!(value.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_rewrite_request() {
        let request = StreamRequest::rewrite("pls fix my grammer");
        assert_eq!(request.context, REWRITE_CONTEXT);
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, Role::User);
        assert_eq!(request.messages[0].content, "pls fix my grammer");
    }

    #[test]
    fn test_history_order_preserved() {
        let history = vec![
            ChatMessage::user("one"),
            ChatMessage::assistant("two"),
            ChatMessage::user("three"),
        ];
        let request = StreamRequest::new(history.clone(), "assistant");
        let parsed: StreamRequest = serde_json::from_str(&request.to_body().unwrap()).unwrap();
        assert_eq!(parsed.messages, history);
    }
}
