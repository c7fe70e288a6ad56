//! Error types for the DMS backend.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DmsError {
    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DmsError {
    /// Shorthand for a construction-time validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        DmsError::Validation {
            message: message.into(),
        }
    }
}

pub type DmsResult<T> = Result<T, DmsError>;
