//! Role domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DmsError, DmsResult};

/// Named bundle of resource grants, assignable to many actors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Storage-assigned id; `0` until saved.
    pub id: u64,
    pub name: String,
    pub description: String,
    /// System roles are protected from deletion by callers; the type
    /// itself does not enforce the protection.
    pub is_system_role: bool,
    pub created_at: DateTime<Utc>,
}

impl Role {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> DmsResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(DmsError::validation("name is required"));
        }

        Ok(Self {
            id: 0,
            name,
            description: description.into(),
            is_system_role: false,
            created_at: Utc::now(),
        })
    }

    pub fn set_as_system_role(&mut self) {
        self.is_system_role = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_role_valid() {
        let role = Role::new("sales-manager", "Manages the sales floor").unwrap();
        assert_eq!(role.name, "sales-manager");
        assert!(!role.is_system_role);
    }

    #[test]
    fn empty_name_rejected() {
        assert!(Role::new("", "whatever").is_err());
    }

    #[test]
    fn system_role_flag() {
        let mut role = Role::new("admin", "").unwrap();
        role.set_as_system_role();
        assert!(role.is_system_role);
    }
}
