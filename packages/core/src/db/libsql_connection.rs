//! libsql-backed connection
//!
//! Embedded SQLite-compatible engine behind the [`Connection`] trait so the
//! SQLite dialect and inspector run end to end without an external server.

use crate::db::{Connection, DatabaseError, DriverError, Row};
use crate::models::FieldValue;
use async_trait::async_trait;
use libsql::params::Params;
use libsql::{Builder, Database};
use serde_json::Value;
use std::path::Path;

/// [`Connection`] over a `libsql::Connection`
pub struct LibsqlConnection {
    // Kept alive for as long as the connection is in use
    _db: Option<Database>,
    conn: libsql::Connection,
}

impl LibsqlConnection {
    /// Wrap an already open libsql connection
    pub fn new(conn: libsql::Connection) -> Self {
        Self { _db: None, conn }
    }

    /// Open a private in-memory database
    pub async fn open_memory() -> Result<Self, DatabaseError> {
        let db = Builder::new_local(":memory:").build().await?;
        let conn = db.connect()?;
        Ok(Self { _db: Some(db), conn })
    }

    /// Open (creating if needed) a database file
    ///
    /// The parent directory must exist; `Dialect::configure` creates it.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path.as_ref()).build().await?;
        let conn = db.connect()?;
        Ok(Self { _db: Some(db), conn })
    }

    /// Underlying libsql connection
    pub fn inner(&self) -> &libsql::Connection {
        &self.conn
    }
}

fn to_libsql_value(value: &FieldValue) -> libsql::Value {
    match value {
        FieldValue::Null => libsql::Value::Null,
        FieldValue::Bool(b) => libsql::Value::Integer(i64::from(*b)),
        FieldValue::Int(i) => libsql::Value::Integer(*i),
        FieldValue::Float(f) => libsql::Value::Real(*f),
        FieldValue::String(s) => libsql::Value::Text(s.clone()),
        FieldValue::Json(Value::Null) => libsql::Value::Null,
        other => libsql::Value::Text(other.to_text()),
    }
}

fn from_libsql_value(value: libsql::Value) -> Value {
    match value {
        libsql::Value::Null => Value::Null,
        libsql::Value::Integer(i) => Value::from(i),
        libsql::Value::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        libsql::Value::Text(s) => Value::String(s),
        libsql::Value::Blob(bytes) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
    }
}

fn to_driver_error(err: libsql::Error) -> DriverError {
    match err {
        libsql::Error::SqliteFailure(errno, message) => DriverError::new(message).with_errno(errno),
        other => DriverError::new(other.to_string()),
    }
}

#[async_trait]
impl Connection for LibsqlConnection {
    async fn raw(&self, sql: &str, params: &[FieldValue]) -> Result<Vec<Row>, DriverError> {
        let values = params.iter().map(to_libsql_value).collect::<Vec<_>>();
        let mut rows = self
            .conn
            .query(sql, Params::Positional(values))
            .await
            .map_err(to_driver_error)?;

        let columns = (0..rows.column_count())
            .map(|idx| rows.column_name(idx).unwrap_or_default().to_string())
            .collect::<Vec<_>>();

        let mut result = Vec::new();
        while let Some(row) = rows.next().await.map_err(to_driver_error)? {
            let mut record = Row::new();
            for (idx, name) in columns.iter().enumerate() {
                let value = row.get_value(idx as i32).map_err(to_driver_error)?;
                record.insert(name.clone(), from_libsql_value(value));
            }
            result.push(record);
        }

        Ok(result)
    }
}
