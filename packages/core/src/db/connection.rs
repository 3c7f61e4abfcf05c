//! Connection abstraction
//!
//! The dialect layer never talks to a driver directly. Everything it needs is
//! one parameterized raw-SQL primitive returning rows as JSON objects keyed by
//! column name, which keeps dialects and schema inspectors testable without a
//! live server.

use crate::db::DriverError;
use crate::models::FieldValue;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A result row, column name to value
pub type Row = Map<String, Value>;

/// Live database connection as seen by the dialect layer
#[async_trait]
pub trait Connection: Send + Sync {
    /// Execute `sql` with positional `params` and return every result row
    ///
    /// Statements producing no rows return an empty vector.
    async fn raw(&self, sql: &str, params: &[FieldValue]) -> Result<Vec<Row>, DriverError>;
}

/// Read a column as a string, accepting numeric values
pub(crate) fn row_str(row: &Row, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read a column as an integer, accepting numeric strings
pub(crate) fn row_i64(row: &Row, column: &str) -> Option<i64> {
    match row.get(column)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Read a column as a flag (`1`, `true`, `"YES"`, `"t"`)
pub(crate) fn row_bool(row: &Row, column: &str) -> bool {
    match row.get(column) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => matches!(
            s.to_ascii_lowercase().as_str(),
            "1" | "t" | "true" | "yes" | "y"
        ),
        _ => false,
    }
}
