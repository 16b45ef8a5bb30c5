//! Error types for the booking REST collaborators

use thiserror::Error;

/// Errors that can occur when calling the marketplace backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, DNS, TLS...)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The backend answered with a non-2xx status
    #[error("API error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// The response body was not the JSON we expected
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// A field the caller relies on was absent from the response
    #[error("Response is missing required field `{0}`")]
    MissingField(&'static str),
}

impl ApiError {
    /// Whether the backend was reached and rejected the request
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status >= 400 && *status < 500)
    }
}
