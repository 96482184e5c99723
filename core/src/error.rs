//! Error types for the booking API client.
//!
//! # Design
//! The backend wraps every answer, failures included, in a
//! `{success, data, message}` envelope. A decoded `success:false` becomes
//! `Rejected` carrying the backend's message. `NotFound` and `Http` cover
//! error responses whose body is not an envelope. Views never match on these
//! variants beyond `message()`; they collapse everything into one display
//! string via `display_or`.

use thiserror::Error;

/// Errors returned by the client's parse methods and service calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was obtained (connection refused, DNS, timeout...).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The backend answered with `success: false`.
    #[error("rejected by backend (HTTP {status}): {}", message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, message: Option<String> },

    /// 404 without an envelope body.
    #[error("resource not found")]
    NotFound,

    /// Any other non-2xx status without an envelope body.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// `success: true` but the expected `data` field was absent or null.
    #[error("response envelope carried no data")]
    MissingData,

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// The backend-provided message, when there is one.
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref().filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    /// The backend message, or `fallback` when the backend said nothing useful.
    pub fn display_or(&self, fallback: &str) -> String {
        self.message().unwrap_or(fallback).to_string()
    }

    /// True when the backend explicitly refused with a 2xx envelope, as the
    /// login endpoint does for bad credentials.
    pub fn is_soft_rejection(&self) -> bool {
        matches!(self, ApiError::Rejected { status, .. } if (200..300).contains(status))
    }
}

/// Errors from the durable session store.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored session is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}
