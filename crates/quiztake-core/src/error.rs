//! Backend API error types.
//!
//! These error types represent failures when talking to the quiz backend.
//! Defined in `quiztake-core` so the attempt engine can downcast and classify
//! errors without string matching.

use thiserror::Error;

/// Errors that can occur when calling the quiz backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication is missing or expired (HTTP 401).
    #[error("authentication required: {0}")]
    Unauthorized(String),

    /// The server refused the request (HTTP 403), e.g. not enrolled in the
    /// class or the quiz is outside its publish window.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The resource does not exist (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other error response from the API.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),
}

impl ApiError {
    /// Returns `true` when the failure is a missing or expired login rather
    /// than a quiz-level refusal.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Timeout(_) | ApiError::Network(_) => None,
        }
    }
}
