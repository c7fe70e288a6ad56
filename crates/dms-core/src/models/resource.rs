//! Resource domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DmsError, DmsResult};

/// One protected operation in the system — conceptually a method plus
/// route pattern, grouped into a module for administration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Storage-assigned id; `0` until saved.
    pub id: u64,
    /// Unique, immutable identifier for the operation.
    pub code: String,
    pub name: String,
    pub url_pattern: String,
    pub method: String,
    pub module: String,
    /// Name of the field on a target record that identifies its owner,
    /// consulted for `own`-scope checks.
    pub ownership_field: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Resource {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        url_pattern: impl Into<String>,
        method: impl Into<String>,
        module: impl Into<String>,
    ) -> DmsResult<Self> {
        let code = code.into();
        let url_pattern = url_pattern.into();
        let method = method.into();

        if code.is_empty() {
            return Err(DmsError::validation("code is required"));
        }
        if url_pattern.is_empty() {
            return Err(DmsError::validation("url pattern is required"));
        }
        if method.is_empty() {
            return Err(DmsError::validation("method is required"));
        }

        Ok(Self {
            id: 0,
            code,
            name: name.into(),
            url_pattern,
            method,
            module: module.into(),
            ownership_field: None,
            created_at: Utc::now(),
        })
    }

    pub fn set_ownership_field(&mut self, field: impl Into<String>) {
        self.ownership_field = Some(field.into());
    }

    /// Whether `own`-scope checks apply to this resource.
    pub fn requires_ownership(&self) -> bool {
        self.ownership_field.as_deref().is_some_and(|f| !f.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_resource_valid() {
        let resource =
            Resource::new("vehicle.list", "List vehicles", "/vehicles", "GET", "inventory")
                .unwrap();
        assert_eq!(resource.id, 0);
        assert_eq!(resource.code, "vehicle.list");
        assert!(!resource.requires_ownership());
    }

    #[test]
    fn new_resource_rejects_empty_fields() {
        assert!(Resource::new("", "n", "/x", "GET", "m").is_err());
        assert!(Resource::new("c", "n", "", "GET", "m").is_err());
        assert!(Resource::new("c", "n", "/x", "", "m").is_err());
    }

    #[test]
    fn ownership_field_toggles_requirement() {
        let mut resource =
            Resource::new("lead.update", "Update lead", "/leads/:id", "PUT", "sales").unwrap();
        resource.set_ownership_field("assigned_to");
        assert!(resource.requires_ownership());
    }
}
