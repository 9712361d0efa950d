//! End-to-end streaming tests against a local HTTP server using wiremock.
//!
//! These go through the real reqwest adapter, so they cover header and body
//! encoding, status handling and chunked body delivery.

use std::time::Duration;

use haven_stream::adapters::{ChannelCallbacks, ReqwestHttpClient, StreamUpdate};
use haven_stream::config::ClientConfig;
use haven_stream::error::{ErrorCategory, NetworkError, StreamError};
use haven_stream::integrations::{ChatStreamer, Integration};
use haven_stream::models::{ChatMessage, StreamRequest};
use haven_stream::session::SessionState;
use haven_stream::traits::{DoneInfo, Termination};
use tokio::sync::mpsc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STREAM_PATH: &str = "/v1/chat/stream";

/// Helper to create a test token.
fn test_token() -> String {
    "test-auth-token".to_string()
}

fn streamer(server: &MockServer, integration: Integration) -> ChatStreamer<ReqwestHttpClient> {
    let config = ClientConfig::new(format!("{}{}", server.uri(), STREAM_PATH), test_token());
    let client = config.build_http_client().unwrap();
    ChatStreamer::new(client, config, integration)
}

fn sse(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/event-stream")
}

fn drain(rx: &mut mpsc::UnboundedReceiver<StreamUpdate>) -> Vec<StreamUpdate> {
    let mut updates = Vec::new();
    while let Ok(update) = rx.try_recv() {
        updates.push(update);
    }
    updates
}

#[tokio::test]
async fn test_full_reply_over_http() {
    let mock_server = MockServer::start().await;
    let history = vec![ChatMessage::user("Say hello")];

    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .and(header("Authorization", format!("Bearer {}", test_token())))
        .and(header("Content-Type", "application/json"))
        .and(header("Accept", "text/event-stream"))
        .and(body_json(serde_json::json!({
            "messages": [{"role": "user", "content": "Say hello"}],
            "context": "chat"
        })))
        .respond_with(sse(concat!(
            ": connected\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"lo there\"}}]}\n\n",
            "data: [DONE]\n\n",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (callbacks, mut rx) = ChannelCallbacks::channel();
    let outcome = streamer(&mock_server, Integration::FullChat)
        .run(history, callbacks)
        .await
        .unwrap();

    assert_eq!(outcome.state, SessionState::Completed);
    assert_eq!(
        drain(&mut rx),
        vec![
            StreamUpdate::Delta("Hel".to_string()),
            StreamUpdate::Delta("Hello there".to_string()),
            StreamUpdate::Done(DoneInfo {
                text: "Hello there".to_string(),
                termination: Termination::Sentinel,
            }),
        ]
    );
}

#[tokio::test]
async fn test_rewrite_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .and(body_json(StreamRequest::rewrite("thx for ur help")))
        .respond_with(sse(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Thank you for your help.\"}}]}\n\ndata: [DONE]\n\n",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (callbacks, _rx) = ChannelCallbacks::channel();
    let handle = streamer(&mock_server, Integration::RewriteMessage)
        .start_rewrite("thx for ur help", callbacks)
        .unwrap();
    let outcome = handle.join().await.unwrap();

    assert_eq!(outcome.text(), "Thank you for your help.");
}

#[tokio::test]
async fn test_unauthorized_reports_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&mock_server)
        .await;

    let (callbacks, mut rx) = ChannelCallbacks::channel();
    let outcome = streamer(&mock_server, Integration::FloatingAssistant)
        .run(vec![ChatMessage::user("hi")], callbacks)
        .await
        .unwrap();

    assert_eq!(outcome.state, SessionState::Failed);
    let updates = drain(&mut rx);
    assert_eq!(updates.len(), 1);
    match &updates[0] {
        StreamUpdate::Error(info) => {
            assert!(matches!(
                info.error,
                StreamError::Transport(NetworkError::HttpStatus { status: 401, .. })
            ));
            assert_eq!(info.error.category(), ErrorCategory::Auth);
            assert!(info.partial_text.is_empty());
            assert_eq!(
                info.fallback_message,
                Integration::FloatingAssistant.fallback_message()
            );
            // The raw server text never reaches the user
            assert!(!info.error.user_message().contains("token expired"));
        }
        other => panic!("Expected error update, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_reports_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let (callbacks, _rx) = ChannelCallbacks::channel();
    let outcome = streamer(&mock_server, Integration::FullChat)
        .run(vec![ChatMessage::user("hi")], callbacks)
        .await
        .unwrap();

    assert_eq!(outcome.state, SessionState::Failed);
    assert!(outcome.text().is_empty());
}

#[tokio::test]
async fn test_close_without_sentinel_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(sse(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Cut\"}}]}\n\ndata: {\"choices\":",
        ))
        .mount(&mock_server)
        .await;

    let (callbacks, mut rx) = ChannelCallbacks::channel();
    let outcome = streamer(&mock_server, Integration::FullChat)
        .run(vec![ChatMessage::user("hi")], callbacks)
        .await
        .unwrap();

    assert_eq!(outcome.state, SessionState::Completed);
    match drain(&mut rx).last() {
        Some(StreamUpdate::Done(info)) => {
            assert!(info.is_possibly_partial());
            assert_eq!(info.text, "Cut");
        }
        other => panic!("Expected done update, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_refused() {
    // Nothing listens on the discard port
    let config = ClientConfig::new("http://127.0.0.1:9/v1/chat/stream", test_token());
    let streamer = ChatStreamer::new(
        config.build_http_client().unwrap(),
        config,
        Integration::FullChat,
    );

    let (callbacks, mut rx) = ChannelCallbacks::channel();
    let outcome = streamer
        .run(vec![ChatMessage::user("hi")], callbacks)
        .await
        .unwrap();

    assert_eq!(outcome.state, SessionState::Failed);
    match drain(&mut rx).pop() {
        Some(StreamUpdate::Error(info)) => {
            assert_eq!(info.error.category(), ErrorCategory::Network);
            assert!(info.error.is_retryable());
        }
        other => panic!("Expected error update, got {:?}", other),
    }
}

#[tokio::test]
async fn test_transport_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(sse("data: [DONE]\n\n").set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new(format!("{}{}", mock_server.uri(), STREAM_PATH), test_token())
        .with_request_timeout(Duration::from_millis(200));
    let client = config.build_http_client().unwrap();
    let streamer = ChatStreamer::new(client, config, Integration::FullChat);

    let (callbacks, mut rx) = ChannelCallbacks::channel();
    let outcome = streamer
        .run(vec![ChatMessage::user("hi")], callbacks)
        .await
        .unwrap();

    assert_eq!(outcome.state, SessionState::Failed);
    match drain(&mut rx).pop() {
        Some(StreamUpdate::Error(info)) => {
            assert!(matches!(
                info.error,
                StreamError::Transport(NetworkError::Timeout { .. })
            ));
        }
        other => panic!("Expected error update, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cancel_before_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(sse("data: [DONE]\n\n").set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let (callbacks, mut rx) = ChannelCallbacks::channel();
    let handle = streamer(&mock_server, Integration::FullChat)
        .start(vec![ChatMessage::user("hi")], callbacks)
        .unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(handle.cancel());

    let outcome = tokio::time::timeout(Duration::from_secs(2), handle.join())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome.state, SessionState::Cancelled);
    assert!(drain(&mut rx).is_empty());
}
