//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations own id
//! allocation: `save` returns the stored record with its assigned id.
//! Any failure propagates as an error — a permission question must be
//! answered definitively or fail loudly.

use crate::error::DmsResult;
use crate::models::{
    entity_resource::EntityResource, entity_role::EntityRole, resource::Resource, role::Role,
    role_resource::RoleResource,
};

/// Persistence port for roles and entity↔role assignments.
pub trait RoleRepository: Send + Sync {
    fn save(&self, role: Role) -> impl Future<Output = DmsResult<Role>> + Send;
    fn update(&self, role: Role) -> impl Future<Output = DmsResult<Role>> + Send;
    fn get_by_id(&self, id: u64) -> impl Future<Output = DmsResult<Role>> + Send;
    fn get_by_name(&self, name: &str) -> impl Future<Output = DmsResult<Role>> + Send;
    fn list(&self) -> impl Future<Output = DmsResult<Vec<Role>>> + Send;
    /// Delete a role along with its entity assignments and resource grants.
    fn delete(&self, id: u64) -> impl Future<Output = DmsResult<()>> + Send;

    fn assign_to_entity(
        &self,
        assignment: EntityRole,
    ) -> impl Future<Output = DmsResult<()>> + Send;
    fn remove_from_entity(
        &self,
        entity_id: u64,
        role_id: u64,
    ) -> impl Future<Output = DmsResult<()>> + Send;
    /// All roles assigned to an entity.
    fn get_entity_roles(&self, entity_id: u64)
    -> impl Future<Output = DmsResult<Vec<Role>>> + Send;
    /// Ids of all entities holding a role.
    fn get_role_entities(&self, role_id: u64)
    -> impl Future<Output = DmsResult<Vec<u64>>> + Send;
}

/// Persistence port for resources, role grants, and direct entity grants.
pub trait ResourceRepository: Send + Sync {
    fn save(&self, resource: Resource) -> impl Future<Output = DmsResult<Resource>> + Send;
    fn update(&self, resource: Resource) -> impl Future<Output = DmsResult<Resource>> + Send;
    fn get_by_id(&self, id: u64) -> impl Future<Output = DmsResult<Resource>> + Send;
    fn get_by_code(&self, code: &str) -> impl Future<Output = DmsResult<Resource>> + Send;
    /// Exact method + URL-pattern lookup, used to resolve an incoming
    /// request to its protected resource.
    fn get_by_route(
        &self,
        method: &str,
        url_pattern: &str,
    ) -> impl Future<Output = DmsResult<Resource>> + Send;
    fn list(&self) -> impl Future<Output = DmsResult<Vec<Resource>>> + Send;
    /// Delete a resource along with its role and entity grants.
    fn delete(&self, id: u64) -> impl Future<Output = DmsResult<()>> + Send;

    /// Grant a role a scope over a resource. Re-assigning the same pair
    /// replaces the previous grant's scope.
    fn assign_to_role(&self, grant: RoleResource) -> impl Future<Output = DmsResult<()>> + Send;
    fn remove_from_role(
        &self,
        role_id: u64,
        resource_id: u64,
    ) -> impl Future<Output = DmsResult<()>> + Send;
    /// All resource grants held by a role.
    fn get_role_grants(
        &self,
        role_id: u64,
    ) -> impl Future<Output = DmsResult<Vec<RoleResource>>> + Send;

    /// Grant an entity a scope over a resource directly. Re-assigning
    /// the same pair replaces the previous grant.
    fn assign_to_entity(
        &self,
        grant: EntityResource,
    ) -> impl Future<Output = DmsResult<()>> + Send;
    fn remove_from_entity(
        &self,
        entity_id: u64,
        resource_id: u64,
    ) -> impl Future<Output = DmsResult<()>> + Send;
    /// All direct grants held by an entity, expired ones included —
    /// expiry is evaluated by the resolution logic, not the store.
    fn get_entity_grants(
        &self,
        entity_id: u64,
    ) -> impl Future<Output = DmsResult<Vec<EntityResource>>> + Send;
}
