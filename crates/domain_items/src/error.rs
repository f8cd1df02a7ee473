//! Item domain errors

use thiserror::Error;
use validator::ValidationErrors;

use core_kernel::{CoreError, ErrorKind, PortError};

/// Errors that can occur in the item domain
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Storage(PortError),
}

impl From<ValidationErrors> for ItemError {
    fn from(errors: ValidationErrors) -> Self {
        ItemError::Validation(errors.to_string())
    }
}

impl From<CoreError> for ItemError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::InvalidStateTransition(msg) => ItemError::InvalidState(msg),
            other => ItemError::Validation(other.to_string()),
        }
    }
}

impl From<PortError> for ItemError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::Validation { message, .. } => ItemError::Validation(message),
            other => ItemError::Storage(other),
        }
    }
}

impl ItemError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ItemError::NotFound { .. } => ErrorKind::NotFound,
            ItemError::Forbidden(_) => ErrorKind::Forbidden,
            ItemError::Validation(_) => ErrorKind::Validation,
            ItemError::InvalidState(_) => ErrorKind::Conflict,
            ItemError::Storage(PortError::NotFound { .. }) => ErrorKind::NotFound,
            ItemError::Storage(PortError::Conflict { .. }) => ErrorKind::Conflict,
            ItemError::Storage(_) => ErrorKind::Internal,
        }
    }

    /// Maps a port lookup failure, turning `NotFound` into the domain variant
    pub(crate) fn from_lookup(error: PortError, entity: &'static str, id: impl ToString) -> Self {
        if error.is_not_found() {
            ItemError::NotFound {
                entity,
                id: id.to_string(),
            }
        } else {
            error.into()
        }
    }
}
