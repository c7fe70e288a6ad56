//! Access-control boundary consumed by the HTTP middleware.
//!
//! Per request the middleware resolves the authenticated actor id, maps
//! the request to a [`Resource`] through [`AccessGate::resolve_resource`]
//! (exact method + path-pattern match against the resource store), and
//! gates on the evaluated scope. An unresolvable route is an error, not
//! an allow — no error path may default to access.

use dms_core::error::{DmsError, DmsResult};
use dms_core::models::resource::Resource;
use dms_core::models::scope::AccessScope;
use dms_core::repository::{ResourceRepository, RoleRepository};
use tracing::debug;

use crate::error::AccessError;
use crate::service::{CheckPermissionInput, PermissionService};

/// Outcome of an authorization check against a resolved resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access granted at the given scope.
    Granted { scope: AccessScope },
    /// Access denied; carries the scope that was resolved.
    Denied { scope: AccessScope },
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted { .. })
    }

    /// Collapse the decision into a result, erroring on deny. For
    /// callers that want to bail out rather than branch.
    pub fn require(self) -> DmsResult<AccessScope> {
        match self {
            AccessDecision::Granted { scope } => Ok(scope),
            AccessDecision::Denied { scope } => Err(AccessError::Denied {
                reason: format!("effective scope is {scope}"),
            }
            .into()),
        }
    }
}

/// The permission query surface exposed to the middleware layer.
pub trait AccessGate: Send + Sync {
    fn can_access(
        &self,
        input: CheckPermissionInput,
    ) -> impl Future<Output = DmsResult<bool>> + Send;

    fn get_scope(
        &self,
        entity_id: u64,
        resource_id: u64,
    ) -> impl Future<Output = DmsResult<AccessScope>> + Send;

    /// Resolve a request's method and path to its protected resource.
    fn resolve_resource(
        &self,
        method: &str,
        path: &str,
    ) -> impl Future<Output = DmsResult<Resource>> + Send;
}

impl<R: RoleRepository, S: ResourceRepository> AccessGate for PermissionService<R, S> {
    async fn can_access(&self, input: CheckPermissionInput) -> DmsResult<bool> {
        PermissionService::can_access(self, input).await
    }

    async fn get_scope(&self, entity_id: u64, resource_id: u64) -> DmsResult<AccessScope> {
        PermissionService::get_scope(self, entity_id, resource_id).await
    }

    async fn resolve_resource(&self, method: &str, path: &str) -> DmsResult<Resource> {
        self.resource_repo().get_by_route(method, path).await
    }
}

impl<R: RoleRepository, S: ResourceRepository> PermissionService<R, S> {
    /// Full per-request authorization: resolve the route to a resource,
    /// evaluate the actor's scope, and decide. `owner_id` enables the
    /// ownership-aware path for resources that carry an ownership field.
    pub async fn authorize_request(
        &self,
        entity_id: u64,
        method: &str,
        path: &str,
        owner_id: Option<u64>,
    ) -> DmsResult<AccessDecision> {
        if entity_id == 0 {
            return Err(AccessError::MissingEntity.into());
        }

        let resource = match self.resource_repo().get_by_route(method, path).await {
            Ok(resource) => resource,
            Err(DmsError::NotFound { .. }) => {
                return Err(AccessError::UnknownRoute {
                    method: method.to_string(),
                    path: path.to_string(),
                }
                .into());
            }
            Err(err) => return Err(err),
        };
        let checker = self.load_checker(entity_id).await?;

        let scope = checker.scope(entity_id, resource.id);
        let granted = match owner_id {
            Some(owner_id) => checker.can_access_own(entity_id, resource.id, owner_id),
            None => scope != AccessScope::None,
        };

        debug!(
            entity_id,
            resource = %resource.code,
            %scope,
            granted,
            "request authorization"
        );

        if granted {
            Ok(AccessDecision::Granted { scope })
        } else {
            Ok(AccessDecision::Denied { scope })
        }
    }
}
