//! SurrealDB implementation of [`ResourceRepository`].

use chrono::{DateTime, Utc};
use dms_core::error::DmsResult;
use dms_core::models::entity_resource::EntityResource;
use dms_core::models::resource::Resource;
use dms_core::models::role_resource::RoleResource;
use dms_core::models::scope::AccessScope;
use dms_core::repository::ResourceRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;
use crate::repository::next_id;

#[derive(Debug, SurrealValue)]
struct ResourceRow {
    code: String,
    name: String,
    url_pattern: String,
    method: String,
    module: String,
    ownership_field: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct ResourceRowWithId {
    record_id: u64,
    code: String,
    name: String,
    url_pattern: String,
    method: String,
    module: String,
    ownership_field: Option<String>,
    created_at: DateTime<Utc>,
}

impl ResourceRowWithId {
    fn into_resource(self) -> Resource {
        Resource {
            id: self.record_id,
            code: self.code,
            name: self.name,
            url_pattern: self.url_pattern,
            method: self.method,
            module: self.module,
            ownership_field: self.ownership_field,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct RoleResourceRow {
    record_id: u64,
    role_id: u64,
    resource_id: u64,
    scope: String,
    created_at: DateTime<Utc>,
}

impl RoleResourceRow {
    fn try_into_grant(self) -> Result<RoleResource, DbError> {
        let scope: AccessScope = self
            .scope
            .parse()
            .map_err(|_| DbError::Decode(format!("invalid scope '{}'", self.scope)))?;
        Ok(RoleResource {
            id: self.record_id,
            role_id: self.role_id,
            resource_id: self.resource_id,
            scope,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct EntityResourceRow {
    record_id: u64,
    entity_id: u64,
    resource_id: u64,
    scope: String,
    assigned_by: u64,
    reason: String,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl EntityResourceRow {
    fn try_into_grant(self) -> Result<EntityResource, DbError> {
        let scope: AccessScope = self
            .scope
            .parse()
            .map_err(|_| DbError::Decode(format!("invalid scope '{}'", self.scope)))?;
        Ok(EntityResource {
            id: self.record_id,
            entity_id: self.entity_id,
            resource_id: self.resource_id,
            scope,
            assigned_by: self.assigned_by,
            reason: self.reason,
            expires_at: self.expires_at,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Resource repository.
#[derive(Clone)]
pub struct SurrealResourceRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealResourceRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ResourceRepository for SurrealResourceRepository<C> {
    async fn save(&self, resource: Resource) -> DmsResult<Resource> {
        let id = next_id(&self.db, "resource").await?;

        let result = self
            .db
            .query(
                "CREATE type::record('resource', $id) SET \
                 code = $code, name = $name, url_pattern = $url_pattern, \
                 method = $method, module = $module, \
                 ownership_field = $ownership_field",
            )
            .bind(("id", id))
            .bind(("code", resource.code))
            .bind(("name", resource.name))
            .bind(("url_pattern", resource.url_pattern))
            .bind(("method", resource.method))
            .bind(("module", resource.module))
            .bind(("ownership_field", resource.ownership_field))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ResourceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "resource".into(),
            id: id.to_string(),
        })?;

        Ok(Resource {
            id,
            code: row.code,
            name: row.name,
            url_pattern: row.url_pattern,
            method: row.method,
            module: row.module,
            ownership_field: row.ownership_field,
            created_at: row.created_at,
        })
    }

    async fn update(&self, resource: Resource) -> DmsResult<Resource> {
        let id = resource.id;

        let result = self
            .db
            .query(
                "UPDATE type::record('resource', $id) SET \
                 code = $code, name = $name, url_pattern = $url_pattern, \
                 method = $method, module = $module, \
                 ownership_field = $ownership_field",
            )
            .bind(("id", id))
            .bind(("code", resource.code))
            .bind(("name", resource.name))
            .bind(("url_pattern", resource.url_pattern))
            .bind(("method", resource.method))
            .bind(("module", resource.module))
            .bind(("ownership_field", resource.ownership_field))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ResourceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "resource".into(),
            id: id.to_string(),
        })?;

        Ok(Resource {
            id,
            code: row.code,
            name: row.name,
            url_pattern: row.url_pattern,
            method: row.method,
            module: row.module,
            ownership_field: row.ownership_field,
            created_at: row.created_at,
        })
    }

    async fn get_by_id(&self, id: u64) -> DmsResult<Resource> {
        let mut result = self
            .db
            .query("SELECT record::id(id) AS record_id, * FROM type::record('resource', $id)")
            .bind(("id", id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ResourceRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "resource".into(),
            id: id.to_string(),
        })?;

        Ok(row.into_resource())
    }

    async fn get_by_code(&self, code: &str) -> DmsResult<Resource> {
        let mut result = self
            .db
            .query("SELECT record::id(id) AS record_id, * FROM resource WHERE code = $code")
            .bind(("code", code.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ResourceRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "resource".into(),
            id: code.to_string(),
        })?;

        Ok(row.into_resource())
    }

    async fn get_by_route(&self, method: &str, url_pattern: &str) -> DmsResult<Resource> {
        let mut result = self
            .db
            .query(
                "SELECT record::id(id) AS record_id, * FROM resource \
                 WHERE method = $method AND url_pattern = $url_pattern",
            )
            .bind(("method", method.to_string()))
            .bind(("url_pattern", url_pattern.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ResourceRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "resource".into(),
            id: format!("{method} {url_pattern}"),
        })?;

        Ok(row.into_resource())
    }

    async fn list(&self) -> DmsResult<Vec<Resource>> {
        let mut result = self
            .db
            .query("SELECT record::id(id) AS record_id, * FROM resource ORDER BY created_at ASC")
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ResourceRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .map(ResourceRowWithId::into_resource)
            .collect())
    }

    async fn delete(&self, id: u64) -> DmsResult<()> {
        // Remove grant rows first, then the resource record.
        self.db
            .query(
                "DELETE role_resource WHERE resource_id = $id; \
                 DELETE entity_resource WHERE resource_id = $id; \
                 DELETE type::record('resource', $id);",
            )
            .bind(("id", id))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn assign_to_role(&self, grant: RoleResource) -> DmsResult<()> {
        let id = next_id(&self.db, "role_resource").await?;

        // Re-assigning the same pair replaces the previous grant's scope.
        self.db
            .query(
                "DELETE role_resource WHERE \
                 role_id = $role_id AND resource_id = $resource_id; \
                 CREATE type::record('role_resource', $id) SET \
                 role_id = $role_id, resource_id = $resource_id, \
                 scope = $scope;",
            )
            .bind(("id", id))
            .bind(("role_id", grant.role_id))
            .bind(("resource_id", grant.resource_id))
            .bind(("scope", grant.scope.as_str().to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn remove_from_role(&self, role_id: u64, resource_id: u64) -> DmsResult<()> {
        self.db
            .query(
                "DELETE role_resource WHERE \
                 role_id = $role_id AND resource_id = $resource_id",
            )
            .bind(("role_id", role_id))
            .bind(("resource_id", resource_id))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn get_role_grants(&self, role_id: u64) -> DmsResult<Vec<RoleResource>> {
        let mut result = self
            .db
            .query(
                "SELECT record::id(id) AS record_id, * FROM role_resource \
                 WHERE role_id = $role_id",
            )
            .bind(("role_id", role_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleResourceRow> = result.take(0).map_err(DbError::from)?;
        let grants = rows
            .into_iter()
            .map(|row| row.try_into_grant())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(grants)
    }

    async fn assign_to_entity(&self, grant: EntityResource) -> DmsResult<()> {
        let id = next_id(&self.db, "entity_resource").await?;

        // Re-assigning the same pair replaces the previous grant.
        self.db
            .query(
                "DELETE entity_resource WHERE \
                 entity_id = $entity_id AND resource_id = $resource_id; \
                 CREATE type::record('entity_resource', $id) SET \
                 entity_id = $entity_id, resource_id = $resource_id, \
                 scope = $scope, assigned_by = $assigned_by, \
                 reason = $reason, expires_at = $expires_at;",
            )
            .bind(("id", id))
            .bind(("entity_id", grant.entity_id))
            .bind(("resource_id", grant.resource_id))
            .bind(("scope", grant.scope.as_str().to_string()))
            .bind(("assigned_by", grant.assigned_by))
            .bind(("reason", grant.reason))
            .bind(("expires_at", grant.expires_at))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn remove_from_entity(&self, entity_id: u64, resource_id: u64) -> DmsResult<()> {
        self.db
            .query(
                "DELETE entity_resource WHERE \
                 entity_id = $entity_id AND resource_id = $resource_id",
            )
            .bind(("entity_id", entity_id))
            .bind(("resource_id", resource_id))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn get_entity_grants(&self, entity_id: u64) -> DmsResult<Vec<EntityResource>> {
        let mut result = self
            .db
            .query(
                "SELECT record::id(id) AS record_id, * FROM entity_resource \
                 WHERE entity_id = $entity_id",
            )
            .bind(("entity_id", entity_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EntityResourceRow> = result.take(0).map_err(DbError::from)?;
        let grants = rows
            .into_iter()
            .map(|row| row.try_into_grant())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(grants)
    }
}
