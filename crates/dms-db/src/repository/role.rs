//! SurrealDB implementation of [`RoleRepository`].

use chrono::{DateTime, Utc};
use dms_core::error::DmsResult;
use dms_core::models::entity_role::EntityRole;
use dms_core::models::role::Role;
use dms_core::repository::RoleRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;
use crate::repository::next_id;

#[derive(Debug, SurrealValue)]
struct RoleRow {
    name: String,
    description: String,
    is_system_role: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct RoleRowWithId {
    record_id: u64,
    name: String,
    description: String,
    is_system_role: bool,
    created_at: DateTime<Utc>,
}

impl RoleRowWithId {
    fn into_role(self) -> Role {
        Role {
            id: self.record_id,
            name: self.name,
            description: self.description,
            is_system_role: self.is_system_role,
            created_at: self.created_at,
        }
    }
}

/// SurrealDB implementation of the Role repository.
#[derive(Clone)]
pub struct SurrealRoleRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRoleRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RoleRepository for SurrealRoleRepository<C> {
    async fn save(&self, role: Role) -> DmsResult<Role> {
        let id = next_id(&self.db, "role").await?;

        let result = self
            .db
            .query(
                "CREATE type::record('role', $id) SET \
                 name = $name, description = $description, \
                 is_system_role = $is_system_role",
            )
            .bind(("id", id))
            .bind(("name", role.name))
            .bind(("description", role.description))
            .bind(("is_system_role", role.is_system_role))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: id.to_string(),
        })?;

        Ok(Role {
            id,
            name: row.name,
            description: row.description,
            is_system_role: row.is_system_role,
            created_at: row.created_at,
        })
    }

    async fn update(&self, role: Role) -> DmsResult<Role> {
        let id = role.id;

        let result = self
            .db
            .query(
                "UPDATE type::record('role', $id) SET \
                 name = $name, description = $description, \
                 is_system_role = $is_system_role",
            )
            .bind(("id", id))
            .bind(("name", role.name))
            .bind(("description", role.description))
            .bind(("is_system_role", role.is_system_role))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: id.to_string(),
        })?;

        Ok(Role {
            id,
            name: row.name,
            description: row.description,
            is_system_role: row.is_system_role,
            created_at: row.created_at,
        })
    }

    async fn get_by_id(&self, id: u64) -> DmsResult<Role> {
        let mut result = self
            .db
            .query("SELECT record::id(id) AS record_id, * FROM type::record('role', $id)")
            .bind(("id", id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: id.to_string(),
        })?;

        Ok(row.into_role())
    }

    async fn get_by_name(&self, name: &str) -> DmsResult<Role> {
        let mut result = self
            .db
            .query("SELECT record::id(id) AS record_id, * FROM role WHERE name = $name")
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: name.to_string(),
        })?;

        Ok(row.into_role())
    }

    async fn list(&self) -> DmsResult<Vec<Role>> {
        let mut result = self
            .db
            .query("SELECT record::id(id) AS record_id, * FROM role ORDER BY created_at ASC")
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().map(RoleRowWithId::into_role).collect())
    }

    async fn delete(&self, id: u64) -> DmsResult<()> {
        // Remove assignment rows first, then the role record.
        self.db
            .query(
                "DELETE entity_role WHERE role_id = $id; \
                 DELETE role_resource WHERE role_id = $id; \
                 DELETE type::record('role', $id);",
            )
            .bind(("id", id))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn assign_to_entity(&self, assignment: EntityRole) -> DmsResult<()> {
        let id = next_id(&self.db, "entity_role").await?;

        self.db
            .query(
                "CREATE type::record('entity_role', $id) SET \
                 entity_id = $entity_id, role_id = $role_id",
            )
            .bind(("id", id))
            .bind(("entity_id", assignment.entity_id))
            .bind(("role_id", assignment.role_id))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn remove_from_entity(&self, entity_id: u64, role_id: u64) -> DmsResult<()> {
        self.db
            .query(
                "DELETE entity_role WHERE \
                 entity_id = $entity_id AND role_id = $role_id",
            )
            .bind(("entity_id", entity_id))
            .bind(("role_id", role_id))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn get_entity_roles(&self, entity_id: u64) -> DmsResult<Vec<Role>> {
        let mut result = self
            .db
            .query(
                "SELECT record::id(id) AS record_id, * FROM role \
                 WHERE id IN (\
                     SELECT VALUE type::record('role', role_id) FROM entity_role \
                     WHERE entity_id = $entity_id\
                 )",
            )
            .bind(("entity_id", entity_id))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().map(RoleRowWithId::into_role).collect())
    }

    async fn get_role_entities(&self, role_id: u64) -> DmsResult<Vec<u64>> {
        let mut result = self
            .db
            .query("SELECT VALUE entity_id FROM entity_role WHERE role_id = $role_id")
            .bind(("role_id", role_id))
            .await
            .map_err(DbError::from)?;

        let entity_ids: Vec<u64> = result.take(0).map_err(DbError::from)?;
        Ok(entity_ids)
    }
}
