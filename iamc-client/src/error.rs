//! Client error types

use reqwest::StatusCode;
use shared::ModelError;
use thiserror::Error;

/// Failure reported by the backend: non-2xx status, or a 2xx envelope with
/// `success: false` (carried with the status it arrived with).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("backend error {status}: {message}")]
pub struct RemoteError {
    pub status: StatusCode,
    pub message: String,
}

impl RemoteError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: connection refused, timeout, TLS
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered but refused or failed the request
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Client-side validation failed; no request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// A request for these ids is still in flight
    #[error("Request already in progress for {0:?}")]
    Busy(Vec<i64>),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local file error (downloads, imports)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema validation or normalization error
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// HTTP status when the backend produced one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Remote(e) => Some(e.status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Errors that were caught before any request left the client
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Busy(_)
                | Self::Model(
                    ModelError::Validation { .. }
                        | ModelError::InvalidRange { .. }
                        | ModelError::InvalidTransition { .. }
                )
        )
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
