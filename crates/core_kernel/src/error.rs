//! Core error types used across the system

use thiserror::Error;

/// Caller-facing classification shared by every domain error
///
/// The HTTP layer maps each kind to one status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed input
    Validation,
    /// The addressed entity does not exist
    NotFound,
    /// The actor may not perform the operation
    Forbidden,
    /// The operation clashes with current state
    Conflict,
    /// Storage or other infrastructure failure
    Internal,
}

/// Core error type for the kernel
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        CoreError::InvalidStateTransition(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        CoreError::Configuration(message.into())
    }
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::InvalidStateTransition(_) => ErrorKind::Conflict,
            CoreError::Configuration(_) => ErrorKind::Internal,
        }
    }
}
