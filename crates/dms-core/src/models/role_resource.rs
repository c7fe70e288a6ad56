//! Role→resource grant — a many-to-many join carrying a scope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DmsError, DmsResult};
use crate::models::scope::AccessScope;

/// Grants a role a specific access scope over one resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleResource {
    /// Storage-assigned id; `0` until saved.
    pub id: u64,
    pub role_id: u64,
    pub resource_id: u64,
    pub scope: AccessScope,
    pub created_at: DateTime<Utc>,
}

impl RoleResource {
    pub fn new(role_id: u64, resource_id: u64, scope: AccessScope) -> DmsResult<Self> {
        if role_id == 0 {
            return Err(DmsError::validation("role is required"));
        }
        if resource_id == 0 {
            return Err(DmsError::validation("resource is required"));
        }

        Ok(Self {
            id: 0,
            role_id,
            resource_id,
            scope,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_ids_rejected() {
        assert!(RoleResource::new(0, 1, AccessScope::All).is_err());
        assert!(RoleResource::new(1, 0, AccessScope::All).is_err());
        assert!(RoleResource::new(1, 1, AccessScope::All).is_ok());
    }
}
