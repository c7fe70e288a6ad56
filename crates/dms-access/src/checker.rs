//! Stateless scope resolution over loaded relation snapshots.

use dms_core::models::entity_resource::EntityResource;
use dms_core::models::entity_role::EntityRole;
use dms_core::models::role_resource::RoleResource;
use dms_core::models::scope::AccessScope;

/// Resolves what access an entity has over a resource, given three
/// already-loaded relation snapshots: the entity's role assignments,
/// role→resource grants, and direct entity→resource grants.
///
/// The checker is a pure function of its snapshot — no interior state,
/// no I/O — so it is cheap to reconstruct per request and safe to use
/// concurrently. Callers are expected to pre-filter the snapshots to
/// the rows relevant to the entity under evaluation.
#[derive(Debug, Clone)]
pub struct PermissionChecker {
    entity_roles: Vec<EntityRole>,
    role_resources: Vec<RoleResource>,
    entity_resources: Vec<EntityResource>,
}

impl PermissionChecker {
    pub fn new(
        entity_roles: Vec<EntityRole>,
        role_resources: Vec<RoleResource>,
        entity_resources: Vec<EntityResource>,
    ) -> Self {
        Self {
            entity_roles,
            role_resources,
            entity_resources,
        }
    }

    /// Resolve the effective scope for `(entity_id, resource_id)`.
    ///
    /// A non-expired direct grant short-circuits role resolution
    /// entirely, regardless of relative permissiveness: a direct `own`
    /// overrides a role `all`. Expired direct grants are skipped, and
    /// resolution falls through to the most permissive matching role
    /// grant. Never fails; no matches means [`AccessScope::None`].
    pub fn scope(&self, entity_id: u64, resource_id: u64) -> AccessScope {
        for grant in &self.entity_resources {
            if grant.entity_id == entity_id
                && grant.resource_id == resource_id
                && !grant.is_expired()
            {
                return grant.scope;
            }
        }

        let role_ids: Vec<u64> = self
            .entity_roles
            .iter()
            .filter(|assignment| assignment.entity_id == entity_id)
            .map(|assignment| assignment.role_id)
            .collect();

        self.role_resources
            .iter()
            .filter(|grant| grant.resource_id == resource_id && role_ids.contains(&grant.role_id))
            .map(|grant| grant.scope)
            .max()
            .unwrap_or(AccessScope::None)
    }

    /// Whether the entity has any access at all to the resource.
    pub fn can_access(&self, entity_id: u64, resource_id: u64) -> bool {
        self.scope(entity_id, resource_id) != AccessScope::None
    }

    /// Ownership-aware check: `all` grants access to any record, `own`
    /// only to records the entity itself owns. `team` carries no
    /// membership resolution and denies here.
    pub fn can_access_own(&self, entity_id: u64, resource_id: u64, owner_id: u64) -> bool {
        match self.scope(entity_id, resource_id) {
            AccessScope::All => true,
            AccessScope::Own => entity_id == owner_id,
            AccessScope::Team | AccessScope::None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn assignment(entity_id: u64, role_id: u64) -> EntityRole {
        EntityRole::new(entity_id, role_id).unwrap()
    }

    fn role_grant(role_id: u64, resource_id: u64, scope: AccessScope) -> RoleResource {
        RoleResource::new(role_id, resource_id, scope).unwrap()
    }

    fn direct_grant(entity_id: u64, resource_id: u64, scope: AccessScope) -> EntityResource {
        EntityResource::new(entity_id, resource_id, scope, 99, "test grant").unwrap()
    }

    #[test]
    fn no_grants_means_none() {
        let checker = PermissionChecker::new(vec![], vec![], vec![]);
        assert_eq!(checker.scope(1, 1), AccessScope::None);
        assert!(!checker.can_access(1, 1));
    }

    #[test]
    fn direct_grant_returned() {
        let checker =
            PermissionChecker::new(vec![], vec![], vec![direct_grant(1, 2, AccessScope::Team)]);
        assert_eq!(checker.scope(1, 2), AccessScope::Team);
    }

    #[test]
    fn direct_grant_overrides_more_permissive_role_grant() {
        let mut grant = direct_grant(5, 10, AccessScope::Own);
        grant.set_expiration(Utc::now() + Duration::hours(1));

        let checker = PermissionChecker::new(
            vec![assignment(5, 1)],
            vec![role_grant(1, 10, AccessScope::All)],
            vec![grant],
        );

        assert_eq!(checker.scope(5, 10), AccessScope::Own);
    }

    #[test]
    fn expired_direct_grant_falls_through_to_roles() {
        let mut grant = direct_grant(5, 10, AccessScope::Own);
        grant.set_expiration(Utc::now() - Duration::hours(1));

        let checker = PermissionChecker::new(
            vec![assignment(5, 1)],
            vec![role_grant(1, 10, AccessScope::All)],
            vec![grant],
        );

        assert_eq!(checker.scope(5, 10), AccessScope::All);
    }

    #[test]
    fn expired_direct_grant_alone_means_none() {
        let mut grant = direct_grant(5, 10, AccessScope::All);
        grant.set_expiration(Utc::now() - Duration::minutes(1));

        let checker = PermissionChecker::new(vec![], vec![], vec![grant]);
        assert_eq!(checker.scope(5, 10), AccessScope::None);
    }

    #[test]
    fn expired_grant_does_not_shadow_later_valid_one() {
        let mut expired = direct_grant(5, 10, AccessScope::All);
        expired.set_expiration(Utc::now() - Duration::hours(1));
        let valid = direct_grant(5, 10, AccessScope::Own);

        let checker = PermissionChecker::new(vec![], vec![], vec![expired, valid]);
        assert_eq!(checker.scope(5, 10), AccessScope::Own);
    }

    #[test]
    fn most_permissive_role_grant_wins() {
        let checker = PermissionChecker::new(
            vec![assignment(1, 1), assignment(1, 2)],
            vec![
                role_grant(1, 7, AccessScope::Own),
                role_grant(2, 7, AccessScope::All),
            ],
            vec![],
        );

        assert_eq!(checker.scope(1, 7), AccessScope::All);
    }

    #[test]
    fn other_entities_roles_ignored() {
        let checker = PermissionChecker::new(
            vec![assignment(2, 1)],
            vec![role_grant(1, 7, AccessScope::All)],
            vec![],
        );

        assert_eq!(checker.scope(1, 7), AccessScope::None);
    }

    #[test]
    fn other_resources_grants_ignored() {
        let checker = PermissionChecker::new(
            vec![assignment(1, 1)],
            vec![role_grant(1, 8, AccessScope::All)],
            vec![],
        );

        assert_eq!(checker.scope(1, 7), AccessScope::None);
    }

    #[test]
    fn team_scope_via_role() {
        // Entity 42 holds role 7 granting team on resource 3.
        let checker = PermissionChecker::new(
            vec![assignment(42, 7)],
            vec![role_grant(7, 3, AccessScope::Team)],
            vec![],
        );

        assert_eq!(checker.scope(42, 3), AccessScope::Team);
        assert!(checker.can_access(42, 3));
        // Team membership is unresolved, so ownership checks deny.
        assert!(!checker.can_access_own(42, 3, 99));
    }

    #[test]
    fn can_access_own_matrix() {
        let all = PermissionChecker::new(vec![], vec![], vec![direct_grant(1, 2, AccessScope::All)]);
        assert!(all.can_access_own(1, 2, 999));

        let own = PermissionChecker::new(vec![], vec![], vec![direct_grant(1, 2, AccessScope::Own)]);
        assert!(own.can_access_own(1, 2, 1));
        assert!(!own.can_access_own(1, 2, 3));

        let none = PermissionChecker::new(vec![], vec![], vec![]);
        assert!(!none.can_access_own(1, 2, 1));
    }

    #[test]
    fn resolution_is_idempotent() {
        let checker = PermissionChecker::new(
            vec![assignment(1, 1)],
            vec![role_grant(1, 7, AccessScope::Team)],
            vec![],
        );

        assert_eq!(checker.scope(1, 7), checker.scope(1, 7));
    }
}
