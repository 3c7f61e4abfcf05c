//! Database configuration
//!
//! Mirrors the backend's database config file:
//!
//! ```json
//! {
//!   "client": "sqlite",
//!   "connection": { "filename": ".tmp/data.db" },
//!   "settings": { "strictRelations": true }
//! }
//! ```
//!
//! The same structure can be built from `DATABASE_*` environment variables
//! with [`DatabaseConfig::from_env`].

use crate::db::DatabaseError;
use crate::dialects::Dialect;
use crate::models::RelationRow;
use crate::relations::RelationsOrderer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root database configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Engine identifier or driver alias (`sqlite`, `better-sqlite3`, `mysql2`, `pg`, ...)
    pub client: String,

    #[serde(default)]
    pub connection: ConnectionSettings,

    #[serde(default)]
    pub settings: DatabaseSettings,
}

/// Driver connection settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSettings {
    /// SQLite database file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// PostgreSQL schema (`public` when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Driver-level options, filled in by `Dialect::configure`
    #[serde(default)]
    pub driver_options: DriverOptions,
}

/// Driver-level options set up once before connecting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverOptions {
    #[serde(default)]
    pub support_big_numbers: bool,

    #[serde(default)]
    pub big_number_strings: bool,

    /// Native type (name or type oid) to the value shape it is read back as
    #[serde(default)]
    pub type_casts: BTreeMap<String, String>,
}

/// Behavior settings of the database core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSettings {
    /// Reject connect instructions anchored on unknown relations
    #[serde(default = "default_strict_relations")]
    pub strict_relations: bool,
}

fn default_strict_relations() -> bool {
    true
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            strict_relations: default_strict_relations(),
        }
    }
}

impl DatabaseConfig {
    /// Configuration for `client` with default settings
    pub fn new(client: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            ..Self::default()
        }
    }

    /// Parse configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, DatabaseError> {
        serde_json::from_str(json)
            .map_err(|e| DatabaseError::configuration(format!("Invalid database config: {}", e)))
    }

    /// Build configuration from the process environment
    pub fn from_env() -> Result<Self, DatabaseError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Build configuration from `DATABASE_*` variables served by `lookup`
    ///
    /// Empty values count as unset.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, DatabaseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = var("DATABASE_PORT")
            .map(|port| {
                port.trim().parse::<u16>().map_err(|_| {
                    DatabaseError::configuration(format!("DATABASE_PORT is not a valid port: {}", port))
                })
            })
            .transpose()?;

        let strict_relations = match var("DATABASE_STRICT_RELATIONS") {
            None => default_strict_relations(),
            Some(flag) => match flag.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(DatabaseError::configuration(format!(
                        "DATABASE_STRICT_RELATIONS must be a boolean, got {}",
                        flag
                    )))
                }
            },
        };

        Ok(Self {
            client: var("DATABASE_CLIENT").unwrap_or_default(),
            connection: ConnectionSettings {
                filename: var("DATABASE_FILENAME"),
                host: var("DATABASE_HOST"),
                port,
                database: var("DATABASE_NAME"),
                user: var("DATABASE_USERNAME"),
                password: var("DATABASE_PASSWORD"),
                schema: var("DATABASE_SCHEMA"),
                driver_options: DriverOptions::default(),
            },
            settings: DatabaseSettings { strict_relations },
        })
    }

    /// Resolve the dialect named by `client`
    pub fn dialect(&self) -> Result<Dialect, DatabaseError> {
        Dialect::from_client(&self.client)
    }

    /// Orderer over `rows` using the configured strictness
    pub fn orderer(&self, rows: impl IntoIterator<Item = RelationRow>) -> RelationsOrderer {
        RelationsOrderer::with_strict(rows, self.settings.strict_relations)
    }
}
