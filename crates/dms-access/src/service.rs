//! Permission service — bridges the stateless checker to persisted
//! relation data and exposes the actor-facing operations.

use chrono::{DateTime, Utc};
use dms_core::error::DmsResult;
use dms_core::models::entity_resource::EntityResource;
use dms_core::models::entity_role::EntityRole;
use dms_core::models::resource::Resource;
use dms_core::models::role::Role;
use dms_core::models::role_resource::RoleResource;
use dms_core::models::scope::AccessScope;
use dms_core::repository::{ResourceRepository, RoleRepository};
use tracing::debug;

use crate::checker::PermissionChecker;

/// Input for assigning a role to an entity.
#[derive(Debug, Clone)]
pub struct AssignRoleInput {
    pub entity_id: u64,
    pub role_id: u64,
}

/// Input for granting an entity direct access to a resource.
///
/// `assigned_by` is the authenticated actor performing the grant, not
/// the grantee — callers must supply it explicitly.
#[derive(Debug, Clone)]
pub struct AssignResourceInput {
    pub entity_id: u64,
    pub resource_id: u64,
    pub scope: AccessScope,
    pub assigned_by: u64,
    pub reason: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Input for a permission check. When `owner_id` is present the check
/// is ownership-aware.
#[derive(Debug, Clone)]
pub struct CheckPermissionInput {
    pub entity_id: u64,
    pub resource_id: u64,
    pub owner_id: Option<u64>,
}

/// Permission orchestration service.
///
/// Generic over repository implementations so that the access layer has
/// no dependency on the database crate. Every repository failure
/// propagates unchanged: a permission question is either answered
/// definitively or fails loudly, never defaulting to an allow.
pub struct PermissionService<R: RoleRepository, S: ResourceRepository> {
    role_repo: R,
    resource_repo: S,
}

impl<R: RoleRepository, S: ResourceRepository> PermissionService<R, S> {
    pub fn new(role_repo: R, resource_repo: S) -> Self {
        Self {
            role_repo,
            resource_repo,
        }
    }

    // Roles

    pub async fn create_role(&self, name: &str, description: &str) -> DmsResult<Role> {
        let role = Role::new(name, description)?;
        self.role_repo.save(role).await
    }

    pub async fn get_roles(&self) -> DmsResult<Vec<Role>> {
        self.role_repo.list().await
    }

    pub async fn assign_role(&self, input: AssignRoleInput) -> DmsResult<()> {
        let assignment = EntityRole::new(input.entity_id, input.role_id)?;
        self.role_repo.assign_to_entity(assignment).await
    }

    pub async fn remove_role(&self, entity_id: u64, role_id: u64) -> DmsResult<()> {
        self.role_repo.remove_from_entity(entity_id, role_id).await
    }

    pub async fn get_entity_roles(&self, entity_id: u64) -> DmsResult<Vec<Role>> {
        self.role_repo.get_entity_roles(entity_id).await
    }

    // Resources

    pub async fn create_resource(
        &self,
        code: &str,
        name: &str,
        url_pattern: &str,
        method: &str,
        module: &str,
    ) -> DmsResult<Resource> {
        let resource = Resource::new(code, name, url_pattern, method, module)?;
        self.resource_repo.save(resource).await
    }

    pub async fn get_resources(&self) -> DmsResult<Vec<Resource>> {
        self.resource_repo.list().await
    }

    pub async fn assign_resource_to_role(
        &self,
        role_id: u64,
        resource_id: u64,
        scope: AccessScope,
    ) -> DmsResult<()> {
        let grant = RoleResource::new(role_id, resource_id, scope)?;
        self.resource_repo.assign_to_role(grant).await
    }

    pub async fn assign_resource_to_entity(&self, input: AssignResourceInput) -> DmsResult<()> {
        let mut grant = EntityResource::new(
            input.entity_id,
            input.resource_id,
            input.scope,
            input.assigned_by,
            input.reason,
        )?;
        if let Some(expires_at) = input.expires_at {
            grant.set_expiration(expires_at);
        }
        self.resource_repo.assign_to_entity(grant).await
    }

    // Checks

    pub async fn can_access(&self, input: CheckPermissionInput) -> DmsResult<bool> {
        let checker = self.load_checker(input.entity_id).await?;

        let allowed = match input.owner_id {
            Some(owner_id) => checker.can_access_own(input.entity_id, input.resource_id, owner_id),
            None => checker.can_access(input.entity_id, input.resource_id),
        };

        debug!(
            entity_id = input.entity_id,
            resource_id = input.resource_id,
            allowed,
            "permission check"
        );

        Ok(allowed)
    }

    pub async fn get_scope(&self, entity_id: u64, resource_id: u64) -> DmsResult<AccessScope> {
        let checker = self.load_checker(entity_id).await?;
        Ok(checker.scope(entity_id, resource_id))
    }

    /// Load the entity-scoped relation slice and assemble a checker:
    /// the entity's roles, its direct grants, and each role's resource
    /// grants.
    pub(crate) async fn load_checker(&self, entity_id: u64) -> DmsResult<PermissionChecker> {
        let roles = self.role_repo.get_entity_roles(entity_id).await?;
        let entity_resources = self.resource_repo.get_entity_grants(entity_id).await?;

        let mut role_resources = Vec::new();
        for role in &roles {
            let grants = self.resource_repo.get_role_grants(role.id).await?;
            role_resources.extend(grants);
        }

        let entity_roles = roles
            .iter()
            .map(|role| EntityRole::new(entity_id, role.id))
            .collect::<DmsResult<Vec<_>>>()?;

        Ok(PermissionChecker::new(
            entity_roles,
            role_resources,
            entity_resources,
        ))
    }

    pub(crate) fn resource_repo(&self) -> &S {
        &self.resource_repo
    }
}
