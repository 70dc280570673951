use thiserror::Error;
use uuid::Uuid;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DietTrackerError {
    #[error("Feed not found: {id}")]
    NotFound { id: Uuid },

    #[error("Missing or unknown session")]
    Unauthenticated,

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error")]
    Internal,
}

impl DietTrackerError {
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<crate::domain::error::DomainError> for DietTrackerError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            FeedNotFound { id } => Self::not_found(id),
            Unauthenticated => Self::Unauthenticated,
            InvalidEmail { email } => Self::validation(format!("Invalid email: {email}")),
            Validation { field, message } => Self::validation(format!("{field}: {message}")),
            Database { .. } => Self::Internal,
        }
    }
}
