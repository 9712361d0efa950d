//! Error handling for streaming sessions.
//!
//! - **Error Categories**: high-level classification for logging and hints
//! - **Transport Errors**: `NetworkError`, terminal for a session
//! - **Stream Errors**: `StreamError`, the full taxonomy a session can hit
//!
//! | Kind | Variant | Ends session | Reaches `on_error` |
//! |------|---------|--------------|--------------------|
//! | Transport | `StreamError::Transport` | Yes | Yes |
//! | Decode | `StreamError::Decode` | No | No |
//! | Frame | `StreamError::Frame` | No | No |
//! | Soft termination | `StreamError::SoftTermination` | Yes (as done) | No |
//! | Cancellation | `StreamError::Cancelled` | Yes | No |

mod category;
mod network;
mod stream;

// Re-export all public types
pub use category::ErrorCategory;
pub use network::{classify_reqwest_error, NetworkError};
pub use stream::StreamError;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::traits::HttpError;

    /// A transport error keeps its category and code through the stream wrapper.
    #[test]
    fn test_transport_error_unification() {
        let net = NetworkError::from_http(
            HttpError::ServerError {
                status: 401,
                message: "expired".to_string(),
            },
            "https://api.example.com",
        );
        let stream: StreamError = net.clone().into();

        assert_eq!(stream.category(), ErrorCategory::Auth);
        assert_eq!(stream.error_code(), net.error_code());
        assert_eq!(stream.user_message(), net.user_message());
        assert!(!stream.category().recovery_hint().is_empty());
    }
}
