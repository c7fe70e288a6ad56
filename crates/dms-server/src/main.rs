//! DMS Server — application entry point.

use dms_access::PermissionService;
use dms_db::repository::{SurrealResourceRepository, SurrealRoleRepository};
use dms_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), dms_db::DbError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("dms=info".parse().unwrap()))
        .json()
        .init();

    tracing::info!("Starting DMS server...");

    let config = DbConfig::from_env();
    let manager = DbManager::connect(&config).await?;
    dms_db::run_migrations(manager.client()).await?;

    let _permissions = PermissionService::new(
        SurrealRoleRepository::new(manager.client().clone()),
        SurrealResourceRepository::new(manager.client().clone()),
    );

    // TODO: mount the HTTP router and permission middleware on top of
    // the service once the transport layer lands.

    tracing::info!("DMS server stopped.");
    Ok(())
}
