//! Error types for the aniwa toolkit.
//!
//! This module provides a unified error type with explicit variants for
//! transport, credential, API, channel, and input validation errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for aniwa operations.
///
/// This error type covers all possible failure modes in the toolkit,
/// with explicit variants to allow callers to handle specific cases.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout, decode).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Credential errors (login or registration rejected by the backend).
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),

    /// API errors (structured non-success responses).
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Progress channel errors (connect failure, mid-stream drop).
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Input validation errors (invalid service URL).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// A success response did not match the declared schema.
    ///
    /// Undeclared response shapes fail closed rather than entering the
    /// session state.
    #[error("response decode failed: {message}")]
    Decode { message: String },
}

/// Credential rejection from login or registration.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The backend rejected the supplied credentials.
    #[error("credentials rejected: {message}")]
    Rejected { message: String },
}

/// A structured non-success response from the backend.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Machine-readable error code (if present).
    pub error: Option<String>,
    /// Error message from the server.
    pub message: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }

    /// Check if this response means the bearer token is no longer accepted.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401
            || self.error.as_deref() == Some("ExpiredToken")
            || self.error.as_deref() == Some("InvalidToken")
    }
}

/// Progress channel errors.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Opening the channel failed.
    #[error("channel connect failed: {message}")]
    Connect { message: String },

    /// The channel dropped mid-stream. Reported once; the channel terminates.
    #[error("channel dropped: {message}")]
    Dropped { message: String },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid service URL format.
    #[error("invalid service URL '{value}': {reason}")]
    ServiceUrl { value: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_status_and_message() {
        let err = ApiError::new(401, Some("InvalidToken".into()), Some("expired".into()));
        let text = err.to_string();
        assert!(text.contains("401"));
        assert!(text.contains("InvalidToken"));
        assert!(text.contains("expired"));
    }

    #[test]
    fn auth_error_detection() {
        assert!(ApiError::new(401, None, None).is_auth_error());
        assert!(ApiError::new(400, Some("ExpiredToken".into()), None).is_auth_error());
        assert!(!ApiError::new(500, None, None).is_auth_error());
    }
}
