//! Claims domain errors

use thiserror::Error;
use validator::ValidationErrors;

use core_kernel::{CoreError, ErrorKind, PortError};

use crate::claim::ClaimStatus;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("You have already claimed this item")]
    AlreadyClaimed,

    #[error("This item is no longer available to claim")]
    NotAvailable,

    #[error("You cannot claim an item you reported")]
    SelfClaim,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Claim is already {status}; only pending claims can be changed")]
    InvalidState { status: ClaimStatus },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(PortError),
}

impl ClaimError {
    pub fn claim_not_found(id: impl ToString) -> Self {
        ClaimError::NotFound {
            entity: "Claim",
            id: id.to_string(),
        }
    }

    pub fn item_not_found(id: impl ToString) -> Self {
        ClaimError::NotFound {
            entity: "FoundItem",
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClaimError::NotFound { .. } => ErrorKind::NotFound,
            ClaimError::AlreadyClaimed => ErrorKind::Conflict,
            ClaimError::NotAvailable => ErrorKind::Conflict,
            ClaimError::SelfClaim => ErrorKind::Forbidden,
            ClaimError::Forbidden(_) => ErrorKind::Forbidden,
            ClaimError::InvalidState { .. } => ErrorKind::Conflict,
            ClaimError::Validation(_) => ErrorKind::Validation,
            ClaimError::Storage(_) => ErrorKind::Internal,
        }
    }
}

impl From<ValidationErrors> for ClaimError {
    fn from(errors: ValidationErrors) -> Self {
        ClaimError::Validation(errors.to_string())
    }
}

impl From<CoreError> for ClaimError {
    fn from(error: CoreError) -> Self {
        ClaimError::Validation(error.to_string())
    }
}

impl From<PortError> for ClaimError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::Validation { message, .. } => ClaimError::Validation(message),
            other => ClaimError::Storage(other),
        }
    }
}
