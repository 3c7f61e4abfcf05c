use super::{
    datetime_args, increments_args, push_foreign_key_column, push_index_column, time_args,
    ForeignKeyColumn,
};
use crate::db::{row_bool, row_i64, row_str, Connection, DriverError, Row};
use crate::models::{Column, FieldValue, ForeignKey, Index, IndexType, Table};
use serde_json::{json, Value};

const SQL_TABLES: &str = r#"
    SELECT table_name
    FROM information_schema.tables
    WHERE table_schema = $1 AND table_type = 'BASE TABLE'
    ORDER BY table_name
"#;

const SQL_COLUMNS: &str = r#"
    SELECT column_name, data_type, character_maximum_length, column_default, is_nullable
    FROM information_schema.columns
    WHERE table_schema = $1 AND table_name = $2
    ORDER BY ordinal_position
"#;

const SQL_INDEXES: &str = r#"
    SELECT
        i.relname AS index_name,
        a.attname AS column_name,
        ix.indisunique AS is_unique,
        ix.indisprimary AS is_primary
    FROM pg_class t
    JOIN pg_namespace n ON n.oid = t.relnamespace
    JOIN pg_index ix ON ix.indrelid = t.oid
    JOIN pg_class i ON i.oid = ix.indexrelid
    JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = ANY(ix.indkey)
    WHERE t.relkind = 'r' AND n.nspname = $1 AND t.relname = $2
    ORDER BY i.relname, array_position(ix.indkey, a.attnum)
"#;

const SQL_FOREIGN_KEYS: &str = r#"
    SELECT
        tco.constraint_name AS constraint_name,
        kcu.column_name AS column_name,
        rel_kcu.table_name AS referenced_table,
        rel_kcu.column_name AS referenced_column,
        rco.update_rule AS on_update,
        rco.delete_rule AS on_delete
    FROM information_schema.table_constraints tco
    JOIN information_schema.key_column_usage kcu
        ON tco.constraint_schema = kcu.constraint_schema
        AND tco.constraint_name = kcu.constraint_name
    JOIN information_schema.referential_constraints rco
        ON tco.constraint_schema = rco.constraint_schema
        AND tco.constraint_name = rco.constraint_name
    JOIN information_schema.key_column_usage rel_kcu
        ON rco.unique_constraint_schema = rel_kcu.constraint_schema
        AND rco.unique_constraint_name = rel_kcu.constraint_name
        AND kcu.ordinal_position = rel_kcu.ordinal_position
    WHERE tco.constraint_type = 'FOREIGN KEY'
      AND tco.constraint_schema = $1 AND tco.table_name = $2
    ORDER BY tco.constraint_name, kcu.ordinal_position
"#;

pub(super) async fn get_tables(
    conn: &dyn Connection,
    schema: &str,
) -> Result<Vec<Table>, DriverError> {
    let rows = conn.raw(SQL_TABLES, &[FieldValue::from(schema)]).await?;

    let mut tables = Vec::with_capacity(rows.len());
    for name in rows.iter().filter_map(|row| row_str(row, "table_name")) {
        let params = [FieldValue::from(schema), FieldValue::from(name.as_str())];
        tables.push(Table {
            columns: get_columns(conn, &params).await?,
            indexes: get_indexes(conn, &params).await?,
            foreign_keys: get_foreign_keys(conn, &params).await?,
            name,
        });
    }
    Ok(tables)
}

/// Generic type and builder args for an information_schema column row
fn column_type(row: &Row) -> (String, Vec<Value>) {
    let data_type = row_str(row, "data_type").unwrap_or_default().to_ascii_lowercase();
    let serial = row_str(row, "column_default").is_some_and(|default| default.contains("nextval("));

    let (generic, args) = match data_type.as_str() {
        "integer" if serial => ("increments", increments_args()),
        "integer" => ("integer", Vec::new()),
        "bigint" => ("bigInteger", Vec::new()),
        "real" | "double precision" => ("double", Vec::new()),
        "numeric" => ("decimal", vec![json!(10), json!(2)]),
        "character varying" | "character" => (
            "string",
            row_i64(row, "character_maximum_length")
                .map(|len| vec![json!(len)])
                .unwrap_or_default(),
        ),
        "text" => ("text", vec![json!("longtext")]),
        "boolean" => ("boolean", Vec::new()),
        "jsonb" | "json" => ("jsonb", Vec::new()),
        "date" => ("date", Vec::new()),
        "time with time zone" | "time without time zone" => ("time", time_args()),
        "timestamp with time zone" => ("datetime", datetime_args(true)),
        "timestamp without time zone" => ("datetime", datetime_args(false)),
        _ => ("specificType", vec![json!(data_type.clone())]),
    };
    (generic.to_string(), args)
}

fn to_column(row: &Row) -> Option<Column> {
    let name = row_str(row, "column_name")?;
    let (generic, args) = column_type(row);
    let increments = generic == "increments";

    let mut column = Column::new(name, generic).with_args(args);
    // The sequence default belongs to the increments type
    if !increments {
        column.default_to = row_str(row, "column_default");
    }
    column.not_nullable = row_str(row, "is_nullable").as_deref() == Some("NO");
    Some(column)
}

async fn get_columns(
    conn: &dyn Connection,
    params: &[FieldValue],
) -> Result<Vec<Column>, DriverError> {
    let rows = conn.raw(SQL_COLUMNS, params).await?;
    Ok(rows.iter().filter_map(to_column).collect())
}

async fn get_indexes(
    conn: &dyn Connection,
    params: &[FieldValue],
) -> Result<Vec<Index>, DriverError> {
    let rows = conn.raw(SQL_INDEXES, params).await?;

    let mut indexes = Vec::new();
    for row in &rows {
        let (Some(name), Some(column)) = (row_str(row, "index_name"), row_str(row, "column_name"))
        else {
            continue;
        };
        let index_type = if row_bool(row, "is_primary") {
            Some(IndexType::Primary)
        } else if row_bool(row, "is_unique") {
            Some(IndexType::Unique)
        } else {
            None
        };
        push_index_column(&mut indexes, name, column, index_type);
    }
    Ok(indexes)
}

async fn get_foreign_keys(
    conn: &dyn Connection,
    params: &[FieldValue],
) -> Result<Vec<ForeignKey>, DriverError> {
    let rows = conn.raw(SQL_FOREIGN_KEYS, params).await?;

    let mut foreign_keys = Vec::new();
    for row in &rows {
        let (Some(name), Some(column), Some(referenced_table), Some(referenced_column)) = (
            row_str(row, "constraint_name"),
            row_str(row, "column_name"),
            row_str(row, "referenced_table"),
            row_str(row, "referenced_column"),
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
    Ok(foreign_keys)
}
