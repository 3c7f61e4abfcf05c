use super::quoted_name;
use crate::config::ConnectionSettings;
use crate::db::{row_str, Connection, DialectError, DriverError};
use std::fmt;
use tracing::warn;

const ER_DUP_ENTRY: i32 = 1062;
const ER_BAD_NULL_ERROR: i32 = 1048;
const ER_NO_DEFAULT_FOR_FIELD: i32 = 1364;
const ER_ROW_IS_REFERENCED_2: i32 = 1451;
const ER_NO_REFERENCED_ROW_2: i32 = 1452;

/// Server family behind a `mysql` client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseVendor {
    Mysql,
    Mariadb,
}

impl fmt::Display for DatabaseVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseVendor::Mysql => f.write_str("MySQL"),
            DatabaseVendor::Mariadb => f.write_str("MariaDB"),
        }
    }
}

/// Server vendor and version as reported by `SELECT version()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseInfo {
    pub vendor: DatabaseVendor,
    /// Numeric version prefix, e.g. `8.0.36` or `10.11.6`
    pub version: String,
}

impl DatabaseInfo {
    /// Parse a raw `version()` string (`10.11.6-MariaDB-1:10.11.6+maria~ubu2204`)
    pub fn parse(raw: &str) -> Self {
        let vendor = if raw.to_ascii_lowercase().contains("mariadb") {
            DatabaseVendor::Mariadb
        } else {
            DatabaseVendor::Mysql
        };

        let version = raw
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect::<String>()
            .trim_end_matches('.')
            .to_string();

        Self { vendor, version }
    }

    fn major_minor(&self) -> (u32, u32) {
        let mut parts = self.version.split('.').map(|part| part.parse::<u32>().unwrap_or(0));
        (parts.next().unwrap_or(0), parts.next().unwrap_or(0))
    }

    /// MySQL 8.0+ or MariaDB 10.2+
    pub fn supports_window_functions(&self) -> bool {
        let minimum = match self.vendor {
            DatabaseVendor::Mysql => (8, 0),
            DatabaseVendor::Mariadb => (10, 2),
        };
        self.major_minor() >= minimum
    }
}

/// Big numbers as strings, DECIMAL as float, TINYINT(1) as boolean, DATE as text
pub(super) fn configure(settings: &mut ConnectionSettings) {
    let options = &mut settings.driver_options;
    options.support_big_numbers = true;
    options.big_number_strings = true;

    for (native, target) in [
        ("DECIMAL", "float"),
        ("NEWDECIMAL", "float"),
        ("TINYINT(1)", "boolean"),
        ("DATE", "text"),
    ] {
        options.type_casts.insert(native.to_string(), target.to_string());
    }
}

async fn disable_require_primary_key(conn: &dyn Connection) {
    // Only exists on MySQL 8.0.13+; other servers reject it
    if let Err(e) = conn.raw("SET SESSION sql_require_primary_key = 0", &[]).await {
        warn!("Could not disable sql_require_primary_key: {}", e);
    }
}

/// Session setup and server detection
pub(super) async fn initialize(conn: &dyn Connection) -> Result<DatabaseInfo, DriverError> {
    disable_require_primary_key(conn).await;

    let rows = conn.raw("SELECT version() AS version", &[]).await?;
    let raw = rows
        .first()
        .and_then(|row| row_str(row, "version"))
        .unwrap_or_default();

    let info = DatabaseInfo::parse(&raw);
    if info.version.is_empty() {
        warn!("Could not detect the server version from '{}'", raw);
    }
    Ok(info)
}

pub(super) async fn start_schema_update(conn: &dyn Connection) -> Result<(), DriverError> {
    disable_require_primary_key(conn).await;
    conn.raw("SET FOREIGN_KEY_CHECKS = 0", &[]).await?;
    Ok(())
}

pub(super) async fn end_schema_update(conn: &dyn Connection) -> Result<(), DriverError> {
    conn.raw("SET FOREIGN_KEY_CHECKS = 1", &[]).await?;
    Ok(())
}

pub(super) fn transform_error(error: &DriverError) -> Option<DialectError> {
    let column = || error.column.clone().or_else(|| quoted_name(&error.message, '\''));

    let errno = error.errno.or_else(|| match error.code.as_deref()? {
        "ER_DUP_ENTRY" => Some(ER_DUP_ENTRY),
        "ER_BAD_NULL_ERROR" => Some(ER_BAD_NULL_ERROR),
        "ER_NO_DEFAULT_FOR_FIELD" => Some(ER_NO_DEFAULT_FOR_FIELD),
        "ER_ROW_IS_REFERENCED_2" => Some(ER_ROW_IS_REFERENCED_2),
        "ER_NO_REFERENCED_ROW_2" => Some(ER_NO_REFERENCED_ROW_2),
        _ => None,
    })?;

    match errno {
        ER_BAD_NULL_ERROR | ER_NO_DEFAULT_FOR_FIELD => Some(DialectError::not_null(column())),
        // `Duplicate entry 'x' for key 'y'`: the quoted value is not a column
        ER_DUP_ENTRY => Some(DialectError::unique(error.column.clone(), &error.message)),
        ER_ROW_IS_REFERENCED_2 | ER_NO_REFERENCED_ROW_2 => {
            Some(DialectError::foreign_key(&error.message))
        }
        _ => None,
    }
}
