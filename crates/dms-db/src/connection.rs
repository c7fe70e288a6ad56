//! SurrealDB connection management.

use std::env;

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

/// Connection settings for the backing SurrealDB instance.
///
/// Settings come from `DMS_DB_*` environment variables via
/// [`DbConfig::from_env`], falling back to local-development defaults.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket address, host and port only (e.g. `127.0.0.1:8000`).
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "dms".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl DbConfig {
    /// Build a config from `DMS_DB_URL`, `DMS_DB_NAMESPACE`,
    /// `DMS_DB_DATABASE`, `DMS_DB_USERNAME` and `DMS_DB_PASSWORD`.
    /// Unset variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            url: lookup("DMS_DB_URL").unwrap_or(defaults.url),
            namespace: lookup("DMS_DB_NAMESPACE").unwrap_or(defaults.namespace),
            database: lookup("DMS_DB_DATABASE").unwrap_or(defaults.database),
            username: lookup("DMS_DB_USERNAME").unwrap_or(defaults.username),
            password: lookup("DMS_DB_PASSWORD").unwrap_or(defaults.password),
        }
    }
}

/// Owns the WebSocket client the repositories are built over.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Connect, authenticate as root, and select the configured
    /// namespace and database.
    pub async fn connect(config: &DbConfig) -> Result<Self, surrealdb::Error> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to SurrealDB"
        );

        let db = Surreal::new::<Ws>(&config.url).await?;

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        Ok(Self { db })
    }

    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_local_instance() {
        let config = DbConfig::default();
        assert_eq!(config.url, "127.0.0.1:8000");
        assert_eq!(config.namespace, "dms");
        assert_eq!(config.database, "main");
    }

    #[test]
    fn lookup_overrides_defaults_per_key() {
        let config = DbConfig::from_lookup(|key| match key {
            "DMS_DB_URL" => Some("db.dealership.internal:8000".into()),
            "DMS_DB_DATABASE" => Some("staging".into()),
            _ => None,
        });

        assert_eq!(config.url, "db.dealership.internal:8000");
        assert_eq!(config.database, "staging");
        // Unset variables keep their defaults.
        assert_eq!(config.namespace, "dms");
        assert_eq!(config.username, "root");
    }
}
