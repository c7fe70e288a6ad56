//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity. The
//! permission relations are plain tables with numeric foreign-key
//! columns — flat tuples, no graph edges — so they can be loaded as
//! independent slices by the checker. Scope columns are strings with
//! ASSERT constraints.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Id sequences (one record per table, allocated on save)
-- =======================================================================
DEFINE TABLE _seq SCHEMAFULL;
DEFINE FIELD next ON TABLE _seq TYPE int DEFAULT 0;

-- =======================================================================
-- Roles
-- =======================================================================
DEFINE TABLE role SCHEMAFULL;
DEFINE FIELD name ON TABLE role TYPE string;
DEFINE FIELD description ON TABLE role TYPE string;
DEFINE FIELD is_system_role ON TABLE role TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_role_name ON TABLE role COLUMNS name UNIQUE;

-- =======================================================================
-- Resources (protected operations: method + route pattern)
-- =======================================================================
DEFINE TABLE resource SCHEMAFULL;
DEFINE FIELD code ON TABLE resource TYPE string;
DEFINE FIELD name ON TABLE resource TYPE string;
DEFINE FIELD url_pattern ON TABLE resource TYPE string;
DEFINE FIELD method ON TABLE resource TYPE string;
DEFINE FIELD module ON TABLE resource TYPE string;
DEFINE FIELD ownership_field ON TABLE resource TYPE option<string>;
DEFINE FIELD created_at ON TABLE resource TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_resource_code ON TABLE resource COLUMNS code UNIQUE;
DEFINE INDEX idx_resource_route ON TABLE resource \
    COLUMNS method, url_pattern UNIQUE;

-- =======================================================================
-- Role -> Resource grants (scope-carrying join)
-- =======================================================================
DEFINE TABLE role_resource SCHEMAFULL;
DEFINE FIELD role_id ON TABLE role_resource TYPE int;
DEFINE FIELD resource_id ON TABLE role_resource TYPE int;
DEFINE FIELD scope ON TABLE role_resource TYPE string \
    ASSERT $value IN ['none', 'own', 'team', 'all'];
DEFINE FIELD created_at ON TABLE role_resource TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_role_resource ON TABLE role_resource \
    COLUMNS role_id, resource_id UNIQUE;

-- =======================================================================
-- Entity -> Resource direct grants (optionally time-limited)
-- =======================================================================
DEFINE TABLE entity_resource SCHEMAFULL;
DEFINE FIELD entity_id ON TABLE entity_resource TYPE int;
DEFINE FIELD resource_id ON TABLE entity_resource TYPE int;
DEFINE FIELD scope ON TABLE entity_resource TYPE string \
    ASSERT $value IN ['none', 'own', 'team', 'all'];
DEFINE FIELD assigned_by ON TABLE entity_resource TYPE int;
DEFINE FIELD reason ON TABLE entity_resource TYPE string;
DEFINE FIELD expires_at ON TABLE entity_resource TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE entity_resource TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_entity_resource ON TABLE entity_resource \
    COLUMNS entity_id, resource_id UNIQUE;

-- =======================================================================
-- Entity -> Role assignments (pure join)
-- =======================================================================
DEFINE TABLE entity_role SCHEMAFULL;
DEFINE FIELD entity_id ON TABLE entity_role TYPE int;
DEFINE FIELD role_id ON TABLE entity_role TYPE int;
DEFINE FIELD created_at ON TABLE entity_role TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_entity_role ON TABLE entity_role \
    COLUMNS entity_id, role_id UNIQUE;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum. The
/// version check makes re-running safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }

    #[test]
    fn schema_covers_all_relation_tables() {
        for table in [
            "role",
            "resource",
            "role_resource",
            "entity_resource",
            "entity_role",
        ] {
            assert!(
                SCHEMA_V1.contains(&format!("DEFINE TABLE {table} SCHEMAFULL")),
                "missing table definition: {table}"
            );
        }
    }
}
