//! Integration tests for the Role repository using in-memory SurrealDB.

use dms_core::models::entity_role::EntityRole;
use dms_core::models::role::Role;
use dms_core::repository::RoleRepository;
use dms_db::repository::SurrealRoleRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> SurrealRoleRepository<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    dms_db::run_migrations(&db).await.unwrap();

    SurrealRoleRepository::new(db)
}

#[tokio::test]
async fn save_assigns_sequential_ids() {
    let repo = setup().await;

    let first = repo
        .save(Role::new("admin", "Administrator").unwrap())
        .await
        .unwrap();
    let second = repo
        .save(Role::new("advisor", "Service advisor").unwrap())
        .await
        .unwrap();

    assert!(first.id > 0);
    assert_eq!(second.id, first.id + 1);
}

#[tokio::test]
async fn save_and_get_by_id() {
    let repo = setup().await;

    let mut role = Role::new("admin", "Administrator").unwrap();
    role.set_as_system_role();
    let saved = repo.save(role).await.unwrap();

    let fetched = repo.get_by_id(saved.id).await.unwrap();
    assert_eq!(fetched.id, saved.id);
    assert_eq!(fetched.name, "admin");
    assert!(fetched.is_system_role);
}

#[tokio::test]
async fn get_by_name() {
    let repo = setup().await;

    repo.save(Role::new("sales-manager", "").unwrap())
        .await
        .unwrap();

    let fetched = repo.get_by_name("sales-manager").await.unwrap();
    assert_eq!(fetched.name, "sales-manager");

    let missing = repo.get_by_name("nobody").await;
    assert!(missing.is_err());
}

#[tokio::test]
async fn update_role() {
    let repo = setup().await;

    let mut saved = repo
        .save(Role::new("editor", "Can edit").unwrap())
        .await
        .unwrap();
    saved.description = "Can edit everything".into();

    let updated = repo.update(saved.clone()).await.unwrap();
    assert_eq!(updated.id, saved.id);
    assert_eq!(updated.description, "Can edit everything");
}

#[tokio::test]
async fn list_roles() {
    let repo = setup().await;

    for name in ["admin", "advisor", "viewer"] {
        repo.save(Role::new(name, "").unwrap()).await.unwrap();
    }

    let roles = repo.list().await.unwrap();
    assert_eq!(roles.len(), 3);
}

#[tokio::test]
async fn duplicate_role_name_rejected() {
    let repo = setup().await;

    repo.save(Role::new("unique-role", "first").unwrap())
        .await
        .unwrap();

    let result = repo.save(Role::new("unique-role", "second").unwrap()).await;
    assert!(result.is_err(), "duplicate role name should be rejected");
}

#[tokio::test]
async fn delete_role_cascades_assignments() {
    let repo = setup().await;

    let role = repo.save(Role::new("to-delete", "").unwrap()).await.unwrap();
    repo.assign_to_entity(EntityRole::new(42, role.id).unwrap())
        .await
        .unwrap();

    repo.delete(role.id).await.unwrap();

    assert!(repo.get_by_id(role.id).await.is_err());
    let roles = repo.get_entity_roles(42).await.unwrap();
    assert!(roles.is_empty(), "assignments should be removed with the role");
}

#[tokio::test]
async fn assign_and_get_entity_roles() {
    let repo = setup().await;

    let role = repo.save(Role::new("advisor", "").unwrap()).await.unwrap();
    repo.assign_to_entity(EntityRole::new(42, role.id).unwrap())
        .await
        .unwrap();

    let roles = repo.get_entity_roles(42).await.unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].name, "advisor");

    // Other entities see nothing.
    let roles = repo.get_entity_roles(43).await.unwrap();
    assert!(roles.is_empty());

    repo.remove_from_entity(42, role.id).await.unwrap();
    let roles = repo.get_entity_roles(42).await.unwrap();
    assert!(roles.is_empty());
}

#[tokio::test]
async fn duplicate_assignment_rejected() {
    let repo = setup().await;

    let role = repo.save(Role::new("advisor", "").unwrap()).await.unwrap();
    repo.assign_to_entity(EntityRole::new(42, role.id).unwrap())
        .await
        .unwrap();

    let result = repo
        .assign_to_entity(EntityRole::new(42, role.id).unwrap())
        .await;
    assert!(result.is_err(), "duplicate assignment should be rejected");
}

#[tokio::test]
async fn get_role_entities() {
    let repo = setup().await;

    let role = repo.save(Role::new("advisor", "").unwrap()).await.unwrap();
    for entity_id in [7, 8, 9] {
        repo.assign_to_entity(EntityRole::new(entity_id, role.id).unwrap())
            .await
            .unwrap();
    }

    let mut entity_ids = repo.get_role_entities(role.id).await.unwrap();
    entity_ids.sort_unstable();
    assert_eq!(entity_ids, vec![7, 8, 9]);
}
