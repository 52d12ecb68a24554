//! Error types for the content API

use thiserror::Error;

/// Errors that can occur when talking to the content API
#[derive(Debug, Error)]
pub enum ContentError {
    /// The learning path has been switched off by an administrator
    #[error("This learning path is currently unavailable: {message}")]
    Deactivated {
        /// Message from the server, shown to the learner
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// Response body had a shape we do not understand
    #[error("Unexpected response from content API: {0}")]
    UnexpectedResponse(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ContentError {
    /// The path is deactivated; the caller must leave the path and not retry
    pub fn is_deactivated(&self) -> bool {
        matches!(self, ContentError::Deactivated { .. })
    }

    /// Check if this error is transient and the request may be retried
    pub fn is_recoverable(&self) -> bool {
        match self {
            ContentError::RequestError(_) => true,
            ContentError::ApiError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
