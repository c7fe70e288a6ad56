//! Access-layer error types.

use dms_core::error::DmsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("entity is not present in the request context")]
    MissingEntity,

    #[error("no resource registered for {method} {path}")]
    UnknownRoute { method: String, path: String },

    #[error("access denied: {reason}")]
    Denied { reason: String },
}

impl From<AccessError> for DmsError {
    fn from(err: AccessError) -> Self {
        match err {
            // An unregistered route is a not-found condition, kept
            // distinct from a deny so callers can 404 instead of 403.
            AccessError::UnknownRoute { method, path } => DmsError::NotFound {
                entity: "resource".into(),
                id: format!("{method} {path}"),
            },
            AccessError::MissingEntity => DmsError::AuthorizationDenied {
                reason: err.to_string(),
            },
            AccessError::Denied { reason } => DmsError::AuthorizationDenied { reason },
        }
    }
}
