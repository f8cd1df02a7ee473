//! Administration domain errors

use thiserror::Error;
use validator::ValidationErrors;

use core_kernel::{CoreError, ErrorKind, PortError};
use domain_claims::ClaimError;
use domain_items::ItemError;

/// Errors that can occur in profile and admin operations
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Item(ItemError),

    #[error(transparent)]
    Claim(ClaimError),

    #[error(transparent)]
    Storage(PortError),
}

impl AdminError {
    pub fn profile_not_found(id: impl ToString) -> Self {
        AdminError::NotFound {
            entity: "UserProfile",
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AdminError::NotFound { .. } => ErrorKind::NotFound,
            AdminError::Forbidden(_) => ErrorKind::Forbidden,
            AdminError::Validation(_) => ErrorKind::Validation,
            AdminError::Item(e) => e.kind(),
            AdminError::Claim(e) => e.kind(),
            AdminError::Storage(e) if e.is_not_found() => ErrorKind::NotFound,
            AdminError::Storage(_) => ErrorKind::Internal,
        }
    }
}

impl From<ValidationErrors> for AdminError {
    fn from(errors: ValidationErrors) -> Self {
        AdminError::Validation(errors.to_string())
    }
}

impl From<CoreError> for AdminError {
    fn from(error: CoreError) -> Self {
        AdminError::Validation(error.to_string())
    }
}

impl From<PortError> for AdminError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::Validation { message, .. } => AdminError::Validation(message),
            other => AdminError::Storage(other),
        }
    }
}

impl From<ItemError> for AdminError {
    fn from(error: ItemError) -> Self {
        AdminError::Item(error)
    }
}

impl From<ClaimError> for AdminError {
    fn from(error: ClaimError) -> Self {
        AdminError::Claim(error)
    }
}
