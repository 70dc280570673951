use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Feed not found: {id}")]
    FeedNotFound { id: Uuid },

    #[error("Missing or unknown session")]
    Unauthenticated,

    #[error("Invalid email format: '{email}'")]
    InvalidEmail { email: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn feed_not_found(id: Uuid) -> Self {
        Self::FeedNotFound { id }
    }

    pub fn unauthenticated() -> Self {
        Self::Unauthenticated
    }

    pub fn invalid_email(email: impl Into<String>) -> Self {
        Self::InvalidEmail {
            email: email.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

