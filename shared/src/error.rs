//! Error types for the shared crate
//!
//! Raised by schema validation, state transitions and payload normalization.
//! None of these involve the network.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A field failed input validation
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// Date range whose end precedes its start
    #[error("{field}: end date {end} is before start date {start}")]
    InvalidRange {
        field: String,
        start: String,
        end: String,
    },

    /// State machine rejected the move
    #[error("cannot move {entity} from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    /// Raw payload had an unusable shape
    #[error("malformed {kind} payload: {message}")]
    Malformed { kind: String, message: String },
}

impl ModelError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn malformed(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Field the error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } | Self::InvalidRange { field, .. } => Some(field),
            _ => None,
        }
    }
}

pub type ModelResult<T> = Result<T, ModelError>;
