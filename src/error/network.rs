//! Transport errors.
//!
//! A `NetworkError` is terminal for a session: connection failures, non-2xx
//! responses and read failures once the body is streaming.

use std::fmt;

use super::category::ErrorCategory;
use crate::traits::HttpError;

/// Transport-level error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Connection to the server failed.
    ConnectionFailed { url: String, message: String },

    /// Request or connect timed out at the transport boundary.
    Timeout { message: String },

    /// TLS/SSL error.
    TlsError { message: String },

    /// HTTP status error (non-2xx response).
    HttpStatus { status: u16, message: String },

    /// The body stream failed after streaming had started.
    ConnectionLost { message: String },

    /// The request could not be built or sent (bad URL, body encoding).
    InvalidRequest { message: String },
}

impl NetworkError {
    /// Classify an error reported by an [`HttpClient`](crate::traits::HttpClient).
    pub fn from_http(err: HttpError, url: &str) -> Self {
        match err {
            HttpError::ConnectionFailed(message) => NetworkError::ConnectionFailed {
                url: url.to_string(),
                message,
            },
            HttpError::Timeout(message) => NetworkError::Timeout { message },
            HttpError::ServerError { status, message } => {
                NetworkError::HttpStatus { status, message }
            }
            HttpError::Io(message) => NetworkError::ConnectionLost { message },
            HttpError::InvalidUrl(message) => NetworkError::InvalidRequest { message },
            HttpError::Other(message) => {
                let lower = message.to_lowercase();
                if lower.contains("tls") || lower.contains("certificate") {
                    NetworkError::TlsError { message }
                } else {
                    NetworkError::ConnectionFailed {
                        url: url.to_string(),
                        message,
                    }
                }
            }
        }
    }

    /// Category used for logging and recovery hints.
    pub fn category(&self) -> ErrorCategory {
        match self {
            NetworkError::HttpStatus { status, .. } => match *status {
                401 | 403 => ErrorCategory::Auth,
                429 | 500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Protocol,
            },
            NetworkError::InvalidRequest { .. } => ErrorCategory::Configuration,
            _ => ErrorCategory::Network,
        }
    }

    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            NetworkError::TlsError { .. } | NetworkError::InvalidRequest { .. } => false,
            _ => true,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed { .. } => {
                "Unable to reach the assistant. Please check your internet connection.".to_string()
            }
            NetworkError::Timeout { .. } => {
                "The assistant took too long to respond. Please try again.".to_string()
            }
            NetworkError::TlsError { .. } => {
                "A secure connection could not be established.".to_string()
            }
            NetworkError::HttpStatus { status, .. } => match *status {
                401 => "Your session has expired. Please sign in again.".to_string(),
                403 => "You don't have access to the assistant right now.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => {
                    "The assistant is having trouble right now. Please try again later.".to_string()
                }
                _ => "The assistant could not handle this request. Please try again.".to_string(),
            },
            NetworkError::ConnectionLost { .. } => {
                "The connection dropped before the reply finished.".to_string()
            }
            NetworkError::InvalidRequest { .. } => {
                "The request could not be sent. Please try again.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed { .. } => "E_NET_CONN",
            NetworkError::Timeout { .. } => "E_NET_TIMEOUT",
            NetworkError::TlsError { .. } => "E_NET_TLS",
            NetworkError::HttpStatus { .. } => "E_NET_HTTP",
            NetworkError::ConnectionLost { .. } => "E_NET_LOST",
            NetworkError::InvalidRequest { .. } => "E_NET_REQUEST",
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::ConnectionFailed { url, message } => {
                write!(f, "Connection failed to '{}': {}", url, message)
            }
            NetworkError::Timeout { message } => write!(f, "Timed out: {}", message),
            NetworkError::TlsError { message } => write!(f, "TLS error: {}", message),
            NetworkError::HttpStatus { status, message } => {
                write!(f, "HTTP {} error: {}", status, message)
            }
            NetworkError::ConnectionLost { message } => {
                write!(f, "Connection lost mid-stream: {}", message)
            }
            NetworkError::InvalidRequest { message } => {
                write!(f, "Invalid request: {}", message)
            }
        }
    }
}

impl std::error::Error for NetworkError {}

/// Classify a reqwest error into an [`HttpError`].
pub fn classify_reqwest_error(err: &reqwest::Error) -> HttpError {
    if err.is_timeout() {
        HttpError::Timeout(err.to_string())
    } else if err.is_connect() {
        HttpError::ConnectionFailed(err.to_string())
    } else if err.is_builder() {
        HttpError::InvalidUrl(err.to_string())
    } else if err.is_body() || err.is_decode() {
        HttpError::Io(err.to_string())
    } else if let Some(status) = err.status() {
        HttpError::ServerError {
            status: status.as_u16(),
            message: err.to_string(),
        }
    } else {
        HttpError::Other(err.to_string())
    }
}
