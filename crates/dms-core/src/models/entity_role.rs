//! Entity→role assignment — a pure join, no scope attached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DmsError, DmsResult};

/// Assigns a role to an actor. Scope comes transitively through the
/// role's resource grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRole {
    /// Storage-assigned id; `0` until saved.
    pub id: u64,
    pub entity_id: u64,
    pub role_id: u64,
    pub created_at: DateTime<Utc>,
}

impl EntityRole {
    pub fn new(entity_id: u64, role_id: u64) -> DmsResult<Self> {
        if entity_id == 0 {
            return Err(DmsError::validation("entity is required"));
        }
        if role_id == 0 {
            return Err(DmsError::validation("role is required"));
        }

        Ok(Self {
            id: 0,
            entity_id,
            role_id,
            created_at: Utc::now(),
        })
    }
}
