use crate::config::ConnectionSettings;
use crate::db::{Connection, DatabaseError, DialectError, DriverError};
use std::path::{Path, PathBuf};
use tracing::info;

const SQLITE_CONSTRAINT: i32 = 19;
const SQLITE_CONSTRAINT_FOREIGNKEY: i32 = 787;
const SQLITE_CONSTRAINT_NOTNULL: i32 = 1299;
const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

const IN_MEMORY: &str = ":memory:";

/// Resolve the database file to an absolute path and create its directory
pub(super) fn configure(settings: &mut ConnectionSettings) -> Result<(), DatabaseError> {
    let filename = settings
        .filename
        .as_deref()
        .ok_or_else(|| DatabaseError::configuration("SQLite requires connection.filename"))?;

    if filename == IN_MEMORY {
        return Ok(());
    }

    let path = Path::new(filename);
    let path: PathBuf = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
            info!("Created database directory {}", parent.display());
        }
    }

    settings.filename = Some(path.to_string_lossy().into_owned());
    Ok(())
}

pub(super) async fn initialize(conn: &dyn Connection) -> Result<(), DriverError> {
    conn.raw("PRAGMA foreign_keys = ON", &[]).await?;
    Ok(())
}

pub(super) async fn start_schema_update(conn: &dyn Connection) -> Result<(), DriverError> {
    conn.raw("PRAGMA foreign_keys = OFF", &[]).await?;
    Ok(())
}

pub(super) async fn end_schema_update(conn: &dyn Connection) -> Result<(), DriverError> {
    conn.raw("PRAGMA foreign_keys = ON", &[]).await?;
    Ok(())
}

/// Column named by `NOT NULL constraint failed: table.column`
fn failed_column(error: &DriverError) -> Option<String> {
    if let Some(column) = &error.column {
        return Some(column.clone());
    }
    let (_, target) = error.message.split_once("constraint failed: ")?;
    let first = target.split(',').next()?.trim();
    let column = first.rsplit('.').next()?;
    (!column.is_empty()).then(|| column.to_string())
}

pub(super) fn transform_error(error: &DriverError) -> Option<DialectError> {
    let code = error.code.as_deref().unwrap_or_default();
    let message = error.message.as_str();

    match error.errno {
        Some(SQLITE_CONSTRAINT_NOTNULL) => return Some(DialectError::not_null(failed_column(error))),
        Some(SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY) => {
            return Some(DialectError::unique(failed_column(error), message))
        }
        Some(SQLITE_CONSTRAINT_FOREIGNKEY) => return Some(DialectError::foreign_key(message)),
        _ => {}
    }

    match code {
        "SQLITE_CONSTRAINT_NOTNULL" => return Some(DialectError::not_null(failed_column(error))),
        "SQLITE_CONSTRAINT_UNIQUE" | "SQLITE_CONSTRAINT_PRIMARYKEY" => {
            return Some(DialectError::unique(failed_column(error), message))
        }
        "SQLITE_CONSTRAINT_FOREIGNKEY" => return Some(DialectError::foreign_key(message)),
        _ => {}
    }

    let is_constraint = error
        .errno
        .is_some_and(|errno| errno & 0xff == SQLITE_CONSTRAINT)
        || code == "SQLITE_CONSTRAINT";
    if !is_constraint {
        return None;
    }

    // Primary code only: tell the constraints apart by message
    if message.contains("UNIQUE constraint failed") {
        Some(DialectError::unique(failed_column(error), message))
    } else if message.contains("FOREIGN KEY constraint failed") {
        Some(DialectError::foreign_key(message))
    } else {
        Some(DialectError::not_null(failed_column(error)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DialectErrorKind;

    #[test]
    fn test_not_null_extended_code() {
        let err = DriverError::new("NOT NULL constraint failed: articles.title")
            .with_errno(SQLITE_CONSTRAINT_NOTNULL);
        let translated = transform_error(&err).unwrap();
        assert_eq!(translated.kind, DialectErrorKind::NotNullConstraint);
        assert_eq!(translated.column.as_deref(), Some("title"));
        assert_eq!(translated.message, "Not null constraint violation on column title.");
    }

    #[test]
    fn test_primary_code_defaults_to_not_null() {
        let err = DriverError::new("constraint failed").with_errno(SQLITE_CONSTRAINT);
        let translated = transform_error(&err).unwrap();
        assert_eq!(translated.kind, DialectErrorKind::NotNullConstraint);
        assert_eq!(translated.column, None);
    }

    #[test]
    fn test_unique_and_foreign_key() {
        let unique = DriverError::new("UNIQUE constraint failed: articles.slug")
            .with_errno(SQLITE_CONSTRAINT_UNIQUE);
        assert_eq!(transform_error(&unique).unwrap().kind, DialectErrorKind::UniqueConstraint);

        let fk = DriverError::new("FOREIGN KEY constraint failed").with_code("SQLITE_CONSTRAINT_FOREIGNKEY");
        assert_eq!(transform_error(&fk).unwrap().kind, DialectErrorKind::ForeignKeyConstraint);
    }

    #[test]
    fn test_unrelated_error_is_not_translated() {
        let err = DriverError::new("no such table: missing").with_errno(1);
        assert!(transform_error(&err).is_none());
    }

    #[test]
    fn test_configure_requires_filename() {
        let mut settings = ConnectionSettings::default();
        assert!(matches!(configure(&mut settings), Err(DatabaseError::Configuration(_))));
    }

    #[test]
    fn test_configure_keeps_memory_database() {
        let mut settings = ConnectionSettings {
            filename: Some(IN_MEMORY.to_string()),
            ..ConnectionSettings::default()
        };
        configure(&mut settings).unwrap();
        assert_eq!(settings.filename.as_deref(), Some(IN_MEMORY));
    }
}
