//! SQL dialects
//!
//! One [`Dialect`] per supported engine. A dialect answers capability
//! questions, maps generic column types onto the engine's, performs the
//! one-time driver and session setup, and normalizes native constraint errors
//! into [`DialectError`](crate::db::DialectError).
//!
//! | flag                      | sqlite | mysql      | postgres | cockroach |
//! |---------------------------|--------|------------|----------|-----------|
//! | uses_foreign_keys         | no     | yes        | yes      | yes       |
//! | use_returning             | yes    | no         | yes      | yes       |
//! | can_alter_constraints     | no     | yes        | yes      | yes       |
//! | supports_unsigned         | no     | yes        | no       | no        |
//! | can_add_increments        | no     | yes        | yes      | yes       |
//! | is_single_connection      | yes    | no         | no       | no        |
//! | supports_window_functions | yes    | by version | yes      | yes       |
//!
//! # Usage
//!
//! ```
//! use cmsdb_core::dialects::{Dialect, DialectKind};
//!
//! let dialect = Dialect::from_client("better-sqlite3").unwrap();
//! assert_eq!(dialect.kind(), DialectKind::Sqlite);
//! assert_eq!(dialect.get_sql_type("timestamp"), "datetime");
//! assert!(!dialect.uses_foreign_keys());
//! ```

mod mysql;
mod postgres;
mod sqlite;

pub use mysql::{DatabaseInfo, DatabaseVendor};

use crate::config::{ConnectionSettings, DatabaseConfig};
use crate::db::{Connection, DatabaseError, DriverError};
use crate::schema::SchemaInspector;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Supported database engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectKind {
    Sqlite,
    Mysql,
    Postgres,
    Cockroach,
}

impl DialectKind {
    pub const ALL: [DialectKind; 4] = [
        DialectKind::Sqlite,
        DialectKind::Mysql,
        DialectKind::Postgres,
        DialectKind::Cockroach,
    ];

    /// Resolve an engine identifier or driver alias
    pub fn from_client(client: &str) -> Result<Self, DatabaseError> {
        let client = client.trim();
        if client.is_empty() {
            return Err(DatabaseError::InvalidConnector(
                "no database client configured".to_string(),
            ));
        }

        match client.to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" | "better-sqlite3" | "libsql" => Ok(DialectKind::Sqlite),
            "mysql" | "mysql2" | "mariadb" => Ok(DialectKind::Mysql),
            "postgres" | "pg" | "postgresql" => Ok(DialectKind::Postgres),
            "cockroach" | "cockroachdb" | "crdb" => Ok(DialectKind::Cockroach),
            _ => Err(DatabaseError::UnknownConnector {
                client: client.to_string(),
            }),
        }
    }

    /// Canonical engine name
    pub fn name(&self) -> &'static str {
        match self {
            DialectKind::Sqlite => "sqlite",
            DialectKind::Mysql => "mysql",
            DialectKind::Postgres => "postgres",
            DialectKind::Cockroach => "cockroach",
        }
    }

    fn capabilities(&self) -> Capabilities {
        match self {
            DialectKind::Sqlite => Capabilities {
                uses_foreign_keys: false,
                use_returning: true,
                can_alter_constraints: false,
                supports_unsigned: false,
                can_add_increments: false,
                is_single_connection: true,
            },
            DialectKind::Mysql => Capabilities {
                uses_foreign_keys: true,
                use_returning: false,
                can_alter_constraints: true,
                supports_unsigned: true,
                can_add_increments: true,
                is_single_connection: false,
            },
            DialectKind::Postgres | DialectKind::Cockroach => Capabilities {
                uses_foreign_keys: true,
                use_returning: true,
                can_alter_constraints: true,
                supports_unsigned: false,
                can_add_increments: true,
                is_single_connection: false,
            },
        }
    }
}

impl FromStr for DialectKind {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_client(s)
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static capability flags of an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub uses_foreign_keys: bool,
    pub use_returning: bool,
    pub can_alter_constraints: bool,
    pub supports_unsigned: bool,
    pub can_add_increments: bool,
    pub is_single_connection: bool,
}

/// Dialect of one configured database
#[derive(Debug, Clone, PartialEq)]
pub struct Dialect {
    kind: DialectKind,
    capabilities: Capabilities,
    database_info: Option<DatabaseInfo>,
}

impl Dialect {
    pub fn new(kind: DialectKind) -> Self {
        Self {
            kind,
            capabilities: kind.capabilities(),
            database_info: None,
        }
    }

    /// Dialect for an engine identifier or driver alias
    pub fn from_client(client: &str) -> Result<Self, DatabaseError> {
        DialectKind::from_client(client).map(Self::new)
    }

    pub fn kind(&self) -> DialectKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Server vendor and version, known after [`initialize`](Self::initialize) on MySQL
    pub fn database_info(&self) -> Option<&DatabaseInfo> {
        self.database_info.as_ref()
    }

    /// Map a generic column type onto the type this engine creates
    pub fn get_sql_type<'a>(&self, generic: &'a str) -> &'a str {
        match (self.kind, generic) {
            (DialectKind::Sqlite, "enum") => "text",
            (DialectKind::Sqlite, "double" | "decimal") => "float",
            (DialectKind::Sqlite | DialectKind::Postgres | DialectKind::Cockroach, "timestamp") => {
                "datetime"
            }
            (DialectKind::Cockroach, "integer") => "bigInteger",
            (_, other) => other,
        }
    }

    pub fn uses_foreign_keys(&self) -> bool {
        self.capabilities.uses_foreign_keys
    }

    pub fn use_returning(&self) -> bool {
        self.capabilities.use_returning
    }

    pub fn can_alter_constraints(&self) -> bool {
        self.capabilities.can_alter_constraints
    }

    pub fn supports_unsigned(&self) -> bool {
        self.capabilities.supports_unsigned
    }

    pub fn can_add_increments(&self) -> bool {
        self.capabilities.can_add_increments
    }

    pub fn is_single_connection(&self) -> bool {
        self.capabilities.is_single_connection
    }

    /// Window functions (`ROW_NUMBER() OVER`)
    ///
    /// MySQL needs 8.0 and MariaDB 10.2; with no detected version MySQL
    /// reports `false`.
    pub fn supports_window_functions(&self) -> bool {
        match self.kind {
            DialectKind::Mysql => self
                .database_info
                .as_ref()
                .is_some_and(DatabaseInfo::supports_window_functions),
            DialectKind::Sqlite | DialectKind::Postgres | DialectKind::Cockroach => true,
        }
    }

    /// Whether a query filter operator can be expressed on this engine
    pub fn supports_operator(&self, operator: &str) -> bool {
        match self.kind {
            DialectKind::Sqlite => operator != "$jsonSupersetOf",
            DialectKind::Mysql | DialectKind::Postgres | DialectKind::Cockroach => true,
        }
    }

    /// One-time driver-level setup, before the first connection is opened
    pub fn configure(&self, config: &mut DatabaseConfig) -> Result<(), DatabaseError> {
        let settings = &mut config.connection;
        match self.kind {
            DialectKind::Sqlite => sqlite::configure(settings)?,
            DialectKind::Mysql => mysql::configure(settings),
            DialectKind::Postgres | DialectKind::Cockroach => postgres::configure(settings),
        }
        info!("Configured {} dialect", self.kind);
        Ok(())
    }

    /// Per-connection session setup
    pub async fn initialize(&mut self, conn: &dyn Connection) -> Result<(), DatabaseError> {
        match self.kind {
            DialectKind::Sqlite => sqlite::initialize(conn)
                .await
                .map_err(|e| self.transform_errors(e))?,
            DialectKind::Mysql => {
                let database_info = mysql::initialize(conn)
                    .await
                    .map_err(|e| self.transform_errors(e))?;
                info!(
                    "Detected {} {}",
                    database_info.vendor, database_info.version
                );
                self.database_info = Some(database_info);
            }
            DialectKind::Postgres | DialectKind::Cockroach => {}
        }
        debug!("Initialized {} dialect", self.kind);
        Ok(())
    }

    /// Relax constraint checks while the schema is being rewritten
    pub async fn start_schema_update(&self, conn: &dyn Connection) -> Result<(), DatabaseError> {
        let result = match self.kind {
            DialectKind::Sqlite => sqlite::start_schema_update(conn).await,
            DialectKind::Mysql => mysql::start_schema_update(conn).await,
            DialectKind::Postgres | DialectKind::Cockroach => Ok(()),
        };
        result.map_err(|e| self.transform_errors(e))
    }

    /// Restore constraint checks after a schema update
    pub async fn end_schema_update(&self, conn: &dyn Connection) -> Result<(), DatabaseError> {
        let result = match self.kind {
            DialectKind::Sqlite => sqlite::end_schema_update(conn).await,
            DialectKind::Mysql => mysql::end_schema_update(conn).await,
            DialectKind::Postgres | DialectKind::Cockroach => Ok(()),
        };
        result.map_err(|e| self.transform_errors(e))
    }

    /// Normalize a native driver error
    ///
    /// Recognized constraint violations become [`DatabaseError::Dialect`];
    /// anything else is returned unchanged as [`DatabaseError::Driver`].
    pub fn transform_errors(&self, error: DriverError) -> DatabaseError {
        let translated = match self.kind {
            DialectKind::Sqlite => sqlite::transform_error(&error),
            DialectKind::Mysql => mysql::transform_error(&error),
            DialectKind::Postgres | DialectKind::Cockroach => postgres::transform_error(&error),
        };

        match translated {
            Some(dialect_error) => DatabaseError::Dialect(dialect_error),
            None => DatabaseError::Driver(error),
        }
    }

    /// Schema inspector for this engine
    pub fn schema_inspector(&self, settings: &ConnectionSettings) -> SchemaInspector {
        match self.kind {
            DialectKind::Sqlite => SchemaInspector::Sqlite,
            DialectKind::Mysql => SchemaInspector::Mysql,
            DialectKind::Postgres | DialectKind::Cockroach => SchemaInspector::Postgres {
                schema: settings
                    .schema
                    .clone()
                    .unwrap_or_else(|| postgres::DEFAULT_SCHEMA.to_string()),
            },
        }
    }
}

/// First name wrapped in `quote` in a driver message
///
/// MySQL uses single quotes (`Column 'title' cannot be null`), PostgreSQL
/// double quotes (`null value in column "title"`).
fn quoted_name(message: &str, quote: char) -> Option<String> {
    let start = message.find(quote)? + quote.len_utf8();
    let len = message[start..].find(quote)?;
    Some(message[start..start + len].to_string())
}
