use super::{
    datetime_args, increments_args, push_foreign_key_column, push_index_column, time_args,
    ForeignKeyColumn,
};
use crate::db::{row_i64, row_str, Connection, DriverError, Row};
use crate::models::{Column, FieldValue, ForeignKey, Index, IndexType, Table};
use serde_json::{json, Value};

const SQL_TABLES: &str = r#"
    SELECT table_name AS table_name
    FROM information_schema.tables
    WHERE table_schema = DATABASE() AND table_type = 'BASE TABLE'
    ORDER BY table_name
"#;

const SQL_COLUMNS: &str = r#"
    SELECT
        column_name AS column_name,
        data_type AS data_type,
        column_type AS column_type,
        character_maximum_length AS character_maximum_length,
        column_default AS column_default,
        is_nullable AS is_nullable,
        column_key AS column_key
    FROM information_schema.columns
    WHERE table_schema = DATABASE() AND table_name = ?
    ORDER BY ordinal_position
"#;

const SQL_INDEXES: &str = r#"
    SELECT
        index_name AS index_name,
        column_name AS column_name,
        non_unique AS non_unique
    FROM information_schema.statistics
    WHERE table_schema = DATABASE() AND table_name = ?
    ORDER BY index_name, seq_in_index
"#;

const SQL_FOREIGN_KEYS: &str = r#"
    SELECT
        kcu.constraint_name AS constraint_name,
        kcu.column_name AS column_name,
        kcu.referenced_table_name AS referenced_table_name,
        kcu.referenced_column_name AS referenced_column_name,
        rc.update_rule AS on_update,
        rc.delete_rule AS on_delete
    FROM information_schema.key_column_usage kcu
    JOIN information_schema.referential_constraints rc
        ON rc.constraint_schema = kcu.constraint_schema
        AND rc.constraint_name = kcu.constraint_name
    WHERE kcu.table_schema = DATABASE() AND kcu.table_name = ?
      AND kcu.referenced_table_name IS NOT NULL
    ORDER BY kcu.constraint_name, kcu.ordinal_position
"#;

pub(super) async fn get_tables(conn: &dyn Connection) -> Result<Vec<Table>, DriverError> {
    let rows = conn.raw(SQL_TABLES, &[]).await?;

    let mut tables = Vec::with_capacity(rows.len());
    for name in rows.iter().filter_map(|row| row_str(row, "table_name")) {
        tables.push(Table {
            columns: get_columns(conn, &name).await?,
            indexes: get_indexes(conn, &name).await?,
            foreign_keys: get_foreign_keys(conn, &name).await?,
            name,
        });
    }
    Ok(tables)
}

/// Generic type and builder args for an information_schema column row
fn column_type(row: &Row) -> (String, Vec<Value>) {
    let data_type = row_str(row, "data_type").unwrap_or_default().to_ascii_lowercase();
    let primary_key = row_str(row, "column_key").as_deref() == Some("PRI");

    let (generic, args) = match data_type.as_str() {
        "int" if primary_key => ("increments", increments_args()),
        "int" => ("integer", Vec::new()),
        "bigint" => ("bigInteger", Vec::new()),
        "decimal" => ("decimal", vec![json!(10), json!(2)]),
        "double" => ("double", Vec::new()),
        "float" => ("float", vec![json!(10), json!(2)]),
        "tinyint" => ("boolean", Vec::new()),
        "enum" => ("string", Vec::new()),
        "varchar" => (
            "string",
            row_i64(row, "character_maximum_length")
                .map(|len| vec![json!(len)])
                .unwrap_or_default(),
        ),
        "longtext" | "text" | "mediumtext" => ("text", vec![json!("longtext")]),
        "json" => ("jsonb", Vec::new()),
        "date" => ("date", Vec::new()),
        "time" => ("time", time_args()),
        "datetime" => ("datetime", datetime_args(false)),
        "timestamp" => ("timestamp", datetime_args(false)),
        _ => ("specificType", vec![json!(data_type.clone())]),
    };
    (generic.to_string(), args)
}

fn to_column(row: &Row) -> Option<Column> {
    let name = row_str(row, "column_name")?;
    let (generic, args) = column_type(row);

    let mut column = Column::new(name, generic).with_args(args);
    column.default_to = row_str(row, "column_default");
    column.not_nullable = row_str(row, "is_nullable").as_deref() == Some("NO");
    column.unsigned = row_str(row, "column_type")
        .is_some_and(|native| native.to_ascii_lowercase().contains("unsigned"));
    Some(column)
}

async fn get_columns(conn: &dyn Connection, table: &str) -> Result<Vec<Column>, DriverError> {
    let rows = conn.raw(SQL_COLUMNS, &[FieldValue::from(table)]).await?;
    Ok(rows.iter().filter_map(to_column).collect())
}

async fn get_indexes(conn: &dyn Connection, table: &str) -> Result<Vec<Index>, DriverError> {
    let rows = conn.raw(SQL_INDEXES, &[FieldValue::from(table)]).await?;

    let mut indexes = Vec::new();
    for row in &rows {
        let (Some(name), Some(column)) = (row_str(row, "index_name"), row_str(row, "column_name"))
        else {
            continue;
        };
        let index_type = if name == "PRIMARY" {
            Some(IndexType::Primary)
        } else if row_i64(row, "non_unique") == Some(0) {
            Some(IndexType::Unique)
        } else {
            None
        };
        push_index_column(&mut indexes, name, column, index_type);
    }

    tracing::debug!("Loaded {} indexes for {}", indexes.len(), table);
    Ok(indexes)
}

async fn get_foreign_keys(
    conn: &dyn Connection,
    table: &str,
) -> Result<Vec<ForeignKey>, DriverError> {
    let rows = conn.raw(SQL_FOREIGN_KEYS, &[FieldValue::from(table)]).await?;

    let mut foreign_keys = Vec::new();
    for row in &rows {
        let (Some(name), Some(column), Some(referenced_table), Some(referenced_column)) = (
            row_str(row, "constraint_name"),
            row_str(row, "column_name"),
            row_str(row, "referenced_table_name"),
            row_str(row, "referenced_column_name"),
        ) else {
            continue;
        };
        push_foreign_key_column(
            &mut foreign_keys,
            ForeignKeyColumn {
                name,
                column,
                referenced_table,
                referenced_column,
                on_update: row_str(row, "on_update"),
                on_delete: row_str(row, "on_delete"),
            },
        );
    }

    tracing::debug!("Loaded {} foreign keys for {}", foreign_keys.len(), table);
    Ok(foreign_keys)
}
