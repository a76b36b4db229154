use std::time::Duration;
use thiserror::Error;

/// Failure of a single call against the pin API.
///
/// Variants carry enough detail to pick a user message and decide whether a
/// retry can help; views keep them in state, hence `Clone`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("not found: {path}")]
    NotFound { path: String },
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout(_) => true,
            ApiError::Server { status, .. } => *status == 429 || *status >= 500,
            ApiError::NotFound { .. } | ApiError::Decode(_) => false,
        }
    }

    /// Short message suitable for a toast
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "Check your connection and try again",
            ApiError::Timeout(_) => "The server took too long to respond",
            ApiError::NotFound { .. } => "This pin no longer exists",
            ApiError::Server { status, .. } if *status < 500 => "The request was rejected",
            ApiError::Server { .. } => "The server ran into a problem",
            ApiError::Decode(_) => "Received an unexpected response",
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Option<Duration>) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(timeout.unwrap_or_default())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}
