//! Schema inspection
//!
//! Reads the live database structure back into a [`Schema`]: every user
//! table with its columns, indexes and foreign keys. Native column types are
//! mapped back to the generic type most likely to have produced them, so the
//! result can be diffed against the schema generated from content types.
//!
//! CockroachDB speaks the PostgreSQL catalog and shares its inspector.

mod mysql;
mod postgres;
mod sqlite;

use crate::db::{Connection, DatabaseError};
use crate::dialects::{Dialect, DialectKind};
use crate::models::{ForeignKey, Index, IndexType, Schema};
use serde_json::{json, Value};

/// Engine-specific schema reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaInspector {
    Sqlite,
    Mysql,
    /// PostgreSQL and CockroachDB, scoped to one schema
    Postgres { schema: String },
}

impl SchemaInspector {
    /// Read every user table of the connected database
    ///
    /// Catalog query failures are normalized by the engine's dialect.
    pub async fn get_schema(&self, conn: &dyn Connection) -> Result<Schema, DatabaseError> {
        let tables = match self {
            SchemaInspector::Sqlite => sqlite::get_tables(conn).await,
            SchemaInspector::Mysql => mysql::get_tables(conn).await,
            SchemaInspector::Postgres { schema } => postgres::get_tables(conn, schema).await,
        }
        .map_err(|e| self.dialect().transform_errors(e))?;

        tracing::debug!("Inspected {} tables", tables.len());
        Ok(Schema { tables })
    }

    /// Dialect whose error translation applies to catalog queries
    fn dialect(&self) -> Dialect {
        // CockroachDB translates SQLSTATEs exactly like PostgreSQL
        Dialect::new(match self {
            SchemaInspector::Sqlite => DialectKind::Sqlite,
            SchemaInspector::Mysql => DialectKind::Mysql,
            SchemaInspector::Postgres { .. } => DialectKind::Postgres,
        })
    }
}

/// Arguments of an auto-increment primary key column
fn increments_args() -> Vec<Value> {
    vec![json!({ "primary": true, "primaryKey": true })]
}

/// Arguments of a datetime/timestamp column
fn datetime_args(use_tz: bool) -> Vec<Value> {
    vec![json!({ "useTz": use_tz, "precision": 6 })]
}

/// Arguments of a time column
fn time_args() -> Vec<Value> {
    vec![json!({ "precision": 3 })]
}

/// Add one index column, grouping rows by index name in first-seen order
fn push_index_column(
    indexes: &mut Vec<Index>,
    name: String,
    column: String,
    index_type: Option<IndexType>,
) {
    match indexes.iter_mut().find(|index| index.name == name) {
        Some(index) => index.columns.push(column),
        None => indexes.push(Index {
            name,
            columns: vec![column],
            index_type,
        }),
    }
}

/// One row of a foreign key listing (one column pair of a constraint)
struct ForeignKeyColumn {
    name: String,
    column: String,
    referenced_table: String,
    referenced_column: String,
    on_update: Option<String>,
    on_delete: Option<String>,
}

/// Add one foreign key column pair, grouping rows by constraint name
fn push_foreign_key_column(foreign_keys: &mut Vec<ForeignKey>, row: ForeignKeyColumn) {
    match foreign_keys.iter_mut().find(|fk| fk.name == row.name) {
        Some(fk) => {
            fk.columns.push(row.column);
            fk.referenced_columns.push(row.referenced_column);
        }
        None => foreign_keys.push(ForeignKey {
            name: row.name,
            columns: vec![row.column],
            referenced_table: row.referenced_table,
            referenced_columns: vec![row.referenced_column],
            on_update: row.on_update,
            on_delete: row.on_delete,
        }),
    }
}
