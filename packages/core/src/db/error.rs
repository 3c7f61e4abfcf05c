//! Database Error Types
//!
//! This module defines the single error type returned by the database core:
//! relation ordering failures, field codec failures, connector resolution
//! failures and native driver errors (translated or passed through).

use std::fmt;
use thiserror::Error;

/// Native error as reported by a database driver
///
/// Drivers disagree on how they identify failures: PostgreSQL and CockroachDB
/// use SQLSTATE strings (`code`), SQLite and MySQL use numeric error numbers
/// (`errno`). Both are kept so dialects can match on whichever applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverError {
    /// SQLSTATE or driver-specific string code (e.g. `"23502"`, `"ER_DUP_ENTRY"`)
    pub code: Option<String>,

    /// Numeric error number (e.g. SQLite `19`, MySQL `1062`)
    pub errno: Option<i32>,

    /// Column involved in the failure, when the driver reports one
    pub column: Option<String>,

    /// Human readable driver message
    pub message: String,
}

impl DriverError {
    /// Create a driver error carrying only a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Attach a SQLSTATE / string code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach a numeric error number
    pub fn with_errno(mut self, errno: i32) -> Self {
        self.errno = Some(errno);
        self
    }

    /// Attach the offending column
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.code, self.errno) {
            (Some(code), _) => write!(f, "[{}] {}", code, self.message),
            (None, Some(errno)) => write!(f, "[errno {}] {}", errno, self.message),
            (None, None) => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for DriverError {}

/// Kind of a dialect-translated error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectErrorKind {
    NotNullConstraint,
    UniqueConstraint,
    ForeignKeyConstraint,
    InvalidRelation,
}

/// Native driver error normalized by a dialect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectError {
    pub kind: DialectErrorKind,
    pub column: Option<String>,
    pub message: String,
}

impl DialectError {
    /// Not-null violation, optionally naming the column
    pub fn not_null(column: Option<String>) -> Self {
        let message = match &column {
            Some(column) => format!("Not null constraint violation on column {}.", column),
            None => "Not null constraint violation.".to_string(),
        };
        Self {
            kind: DialectErrorKind::NotNullConstraint,
            column,
            message,
        }
    }

    /// Unique violation
    pub fn unique(column: Option<String>, detail: &str) -> Self {
        Self {
            kind: DialectErrorKind::UniqueConstraint,
            column,
            message: format!("Unique constraint violation: {}", detail),
        }
    }

    /// Foreign key violation
    pub fn foreign_key(detail: &str) -> Self {
        Self {
            kind: DialectErrorKind::ForeignKeyConstraint,
            column: None,
            message: format!("Foreign key constraint violation: {}", detail),
        }
    }
}

impl fmt::Display for DialectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for DialectError {}

/// Database core errors
///
/// Everything raised by the orderer, the field codecs and the dialect layer.
/// None of these are retried: callers correct the input and resubmit.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Connect/disconnect batch cannot be applied
    #[error("{0}")]
    InvalidRelation(String),

    /// Value cannot be stored by a number-like field
    #[error("{0}")]
    InvalidFieldValue(String),

    /// Value is not (or cannot become) valid JSON
    #[error("{0}")]
    InvalidJsonValue(String),

    /// Value is not a calendar date
    #[error("{0}")]
    InvalidDate(String),

    /// Value is not a datetime or millisecond timestamp
    #[error("{0}")]
    InvalidDateTime(String),

    /// Value is not a time of day
    #[error("{0}")]
    InvalidTime(String),

    /// No codec is registered for the attribute type
    #[error("Undefined field for type {field_type}")]
    UndefinedField { field_type: String },

    /// Engine identifier does not name a supported dialect
    #[error("Unknown dialect {client}")]
    UnknownConnector { client: String },

    /// Connection configuration cannot select a driver
    #[error("Invalid connector: {0}")]
    InvalidConnector(String),

    /// Native error translated by the dialect
    #[error(transparent)]
    Dialect(#[from] DialectError),

    /// Native error the dialect does not recognize, unchanged
    ///
    /// Only built by `Dialect::transform_errors`; there is no `From` impl so
    /// native errors cannot skip translation.
    #[error(transparent)]
    Driver(DriverError),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Filesystem failure while preparing the database location
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// libsql operation error
    #[cfg(feature = "libsql")]
    #[error("Database operation failed: {0}")]
    Libsql(#[from] libsql::Error),
}

impl DatabaseError {
    /// Create an invalid relation error
    pub fn invalid_relation(msg: impl Into<String>) -> Self {
        Self::InvalidRelation(msg.into())
    }

    /// Create an invalid field value error
    pub fn invalid_field_value(msg: impl Into<String>) -> Self {
        Self::InvalidFieldValue(msg.into())
    }

    /// Create an invalid JSON value error
    pub fn invalid_json(msg: impl Into<String>) -> Self {
        Self::InvalidJsonValue(msg.into())
    }

    /// Create an invalid date error
    pub fn invalid_date(msg: impl Into<String>) -> Self {
        Self::InvalidDate(msg.into())
    }

    /// Create an invalid datetime error
    pub fn invalid_datetime(msg: impl Into<String>) -> Self {
        Self::InvalidDateTime(msg.into())
    }

    /// Create an invalid time error
    pub fn invalid_time(msg: impl Into<String>) -> Self {
        Self::InvalidTime(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Kind of the translated dialect error, if this is one
    pub fn dialect_kind(&self) -> Option<DialectErrorKind> {
        match self {
            Self::Dialect(err) => Some(err.kind),
            Self::InvalidRelation(_) => Some(DialectErrorKind::InvalidRelation),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_null_message_names_column() {
        let err = DialectError::not_null(Some("title".to_string()));
        assert_eq!(err.to_string(), "Not null constraint violation on column title.");
        assert_eq!(DialectError::not_null(None).to_string(), "Not null constraint violation.");
    }

    #[test]
    fn test_driver_error_display_prefers_code() {
        let err = DriverError::new("boom").with_code("23502").with_errno(7);
        assert_eq!(err.to_string(), "[23502] boom");
        assert_eq!(DriverError::new("boom").with_errno(19).to_string(), "[errno 19] boom");
    }

    #[test]
    fn test_dialect_kind() {
        let err: DatabaseError = DialectError::not_null(None).into();
        assert_eq!(err.dialect_kind(), Some(DialectErrorKind::NotNullConstraint));
        assert_eq!(
            DatabaseError::invalid_relation("x").dialect_kind(),
            Some(DialectErrorKind::InvalidRelation)
        );
        assert_eq!(DatabaseError::Driver(DriverError::new("x")).dialect_kind(), None);
    }
}
