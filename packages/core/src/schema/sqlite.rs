use super::{
    datetime_args, increments_args, push_foreign_key_column, push_index_column, time_args,
    ForeignKeyColumn,
};
use crate::db::{row_bool, row_i64, row_str, Connection, DriverError, Row};
use crate::models::{Column, FieldValue, ForeignKey, Index, IndexType, Table};
use serde_json::{json, Value};

const SQL_TABLES: &str = "SELECT name FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name";
const SQL_COLUMNS: &str = "SELECT * FROM pragma_table_info(?)";
const SQL_INDEXES: &str = "SELECT * FROM pragma_index_list(?)";
const SQL_INDEX_COLUMNS: &str = "SELECT * FROM pragma_index_info(?) ORDER BY seqno";
const SQL_FOREIGN_KEYS: &str = "SELECT * FROM pragma_foreign_key_list(?) ORDER BY id, seq";

pub(super) async fn get_tables(conn: &dyn Connection) -> Result<Vec<Table>, DriverError> {
    let rows = conn.raw(SQL_TABLES, &[]).await?;

    let mut tables = Vec::with_capacity(rows.len());
    for name in rows.iter().filter_map(|row| row_str(row, "name")) {
        tables.push(Table {
            columns: get_columns(conn, &name).await?,
            indexes: get_indexes(conn, &name).await?,
            foreign_keys: get_foreign_keys(conn, &name).await?,
            name,
        });
    }
    Ok(tables)
}

/// Generic type and builder args for a declared SQLite column type
fn column_type(declared: &str, primary_key: bool) -> (String, Vec<Value>) {
    let lower = declared.trim().to_ascii_lowercase();
    let root = lower
        .split(|c: char| c == '(' || c == ')' || c == ',' || c == ' ')
        .find(|part| !part.is_empty())
        .unwrap_or_default();

    let (generic, args) = match root {
        "integer" if primary_key => ("increments", increments_args()),
        "integer" => ("integer", Vec::new()),
        "bigint" => ("bigInteger", Vec::new()),
        "float" => ("float", vec![json!(10), json!(2)]),
        "varchar" => {
            let length = lower
                .split_once('(')
                .and_then(|(_, rest)| rest.trim_end_matches(')').trim().parse::<u64>().ok());
            ("string", length.map(|len| vec![json!(len)]).unwrap_or_default())
        }
        "text" => ("text", vec![json!("longtext")]),
        "json" => ("jsonb", Vec::new()),
        "boolean" => ("boolean", Vec::new()),
        "date" => ("date", Vec::new()),
        "time" => ("time", time_args()),
        "datetime" => ("datetime", datetime_args(false)),
        "timestamp" => ("timestamp", datetime_args(false)),
        _ => ("specificType", vec![json!(declared)]),
    };
    (generic.to_string(), args)
}

fn to_column(row: &Row) -> Option<Column> {
    let name = row_str(row, "name")?;
    let declared = row_str(row, "type").unwrap_or_default();
    let primary_key = row_i64(row, "pk").unwrap_or(0) > 0;
    let (generic, args) = column_type(&declared, primary_key);

    let mut column = Column::new(name, generic).with_args(args);
    column.default_to = row_str(row, "dflt_value");
    column.not_nullable = row_bool(row, "notnull") || primary_key;
    Some(column)
}

async fn get_columns(conn: &dyn Connection, table: &str) -> Result<Vec<Column>, DriverError> {
    let rows = conn.raw(SQL_COLUMNS, &[FieldValue::from(table)]).await?;
    Ok(rows.iter().filter_map(to_column).collect())
}

async fn get_indexes(
    conn: &dyn Connection,
    table: &str,
) -> Result<Vec<Index>, DriverError> {
    let rows = conn.raw(SQL_INDEXES, &[FieldValue::from(table)]).await?;

    let mut indexes = Vec::new();
    for row in &rows {
        let Some(name) = row_str(row, "name") else {
            continue;
        };
        let index_type = if row_str(row, "origin").as_deref() == Some("pk") {
            Some(IndexType::Primary)
        } else if row_bool(row, "unique") {
            Some(IndexType::Unique)
        } else {
            None
        };

        let columns = conn.raw(SQL_INDEX_COLUMNS, &[FieldValue::from(name.as_str())]).await?;
        for column in columns.iter().filter_map(|c| row_str(c, "name")) {
            push_index_column(&mut indexes, name.clone(), column, index_type);
        }
    }
    Ok(indexes)
}

/// Action reported by SQLite, `NO ACTION` counting as unset
fn action(row: &Row, column: &str) -> Option<String> {
    row_str(row, column).filter(|action| action != "NO ACTION")
}

async fn get_foreign_keys(
    conn: &dyn Connection,
    table: &str,
) -> Result<Vec<ForeignKey>, DriverError> {
    let rows = conn.raw(SQL_FOREIGN_KEYS, &[FieldValue::from(table)]).await?;

    // SQLite does not keep constraint names; key them by table and ordinal
    let mut foreign_keys = Vec::new();
    for row in &rows {
        let id = row_i64(row, "id").unwrap_or(0);
        let (Some(column), Some(referenced_table)) = (row_str(row, "from"), row_str(row, "table"))
        else {
            continue;
        };
        push_foreign_key_column(
            &mut foreign_keys,
            ForeignKeyColumn {
                name: format!("{}_fk_{}", table, id),
                column,
                referenced_column: row_str(row, "to").unwrap_or_else(|| "id".to_string()),
                referenced_table,
                on_update: action(row, "on_update"),
                on_delete: action(row, "on_delete"),
            },
        );
    }
    Ok(foreign_keys)
}
