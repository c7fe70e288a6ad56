//! Direct entity→resource grant, bypassing roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DmsError, DmsResult};
use crate::models::scope::AccessScope;

/// A direct grant of a scope to one actor over one resource. Optionally
/// time-limited: once `expires_at` has passed, resolution logic treats
/// the grant as absent, but nothing deletes the row automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityResource {
    /// Storage-assigned id; `0` until saved.
    pub id: u64,
    pub entity_id: u64,
    pub resource_id: u64,
    pub scope: AccessScope,
    /// Actor who granted the permission.
    pub assigned_by: u64,
    /// Free-text justification recorded with the grant.
    pub reason: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl EntityResource {
    pub fn new(
        entity_id: u64,
        resource_id: u64,
        scope: AccessScope,
        assigned_by: u64,
        reason: impl Into<String>,
    ) -> DmsResult<Self> {
        if entity_id == 0 {
            return Err(DmsError::validation("entity is required"));
        }
        if resource_id == 0 {
            return Err(DmsError::validation("resource is required"));
        }
        if assigned_by == 0 {
            return Err(DmsError::validation("assigned_by is required"));
        }

        Ok(Self {
            id: 0,
            entity_id,
            resource_id,
            scope,
            assigned_by,
            reason: reason.into(),
            expires_at: None,
            created_at: Utc::now(),
        })
    }

    pub fn set_expiration(&mut self, expires_at: DateTime<Utc>) {
        self.expires_at = Some(expires_at);
    }

    /// A grant with no expiry never expires; otherwise it is expired
    /// only strictly after `expires_at`.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            None => false,
            Some(expires_at) => Utc::now() > expires_at,
        }
    }
}
