//! Database-specific error types and conversions.

use dms_core::error::DmsError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Stored record could not be decoded: {0}")]
    Decode(String),
}

impl From<DbError> for DmsError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => DmsError::NotFound { entity, id },
            other => DmsError::Database(other.to_string()),
        }
    }
}
