//! SQLite End-to-End Tests
//!
//! Runs the SQLite dialect and schema inspector against a real embedded
//! libsql database.
//!
//! ## Test Coverage
//! - File configuration (absolute path, directory creation)
//! - Session setup enabling foreign keys
//! - Schema inspection of columns, indexes and foreign keys
//! - Constraint violations translated into dialect errors

mod common;

#[cfg(test)]
mod sqlite_schema_tests {
    use super::common::init_tracing;
    use anyhow::Result;
    use cmsdb_core::db::LibsqlConnection;
    use cmsdb_core::dialects::{Dialect, DialectKind};
    use cmsdb_core::models::{FieldValue, IndexType};
    use cmsdb_core::{Connection, DatabaseConfig, DatabaseError, DialectErrorKind};
    use serde_json::{json, Value};
    use std::path::Path;
    use tempfile::TempDir;

    const SCHEMA: &str = r#"
        CREATE TABLE authors (
            id INTEGER PRIMARY KEY,
            name varchar(255) NOT NULL
        );
        CREATE TABLE articles (
            id INTEGER PRIMARY KEY,
            title varchar(255) NOT NULL,
            slug varchar(255),
            author_id INTEGER REFERENCES authors(id) ON DELETE CASCADE,
            published_at datetime
        );
        CREATE UNIQUE INDEX articles_slug_unique ON articles (slug);
        CREATE INDEX articles_author_idx ON articles (author_id);
    "#;

    async fn setup_database() -> Result<(LibsqlConnection, Dialect)> {
        init_tracing();
        let conn = LibsqlConnection::open_memory().await?;
        conn.inner().execute_batch(SCHEMA).await?;

        let mut dialect = Dialect::new(DialectKind::Sqlite);
        dialect.initialize(&conn).await?;
        Ok((conn, dialect))
    }

    #[tokio::test]
    async fn test_configure_creates_database_directory() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("nested").join("data").join("cms.db");

        let mut config = DatabaseConfig::new("sqlite");
        config.connection.filename = Some(db_path.to_string_lossy().into_owned());

        let dialect = config.dialect()?;
        dialect.configure(&mut config)?;

        let filename = config.connection.filename.clone().expect("filename kept");
        assert!(Path::new(&filename).is_absolute());
        assert!(temp_dir.path().join("nested").join("data").is_dir());

        let conn = LibsqlConnection::open(&filename).await?;
        conn.raw("CREATE TABLE notes (id INTEGER PRIMARY KEY)", &[]).await?;
        assert!(db_path.exists());
        Ok(())
    }

    #[test]
    fn test_configure_requires_filename() {
        let mut config = DatabaseConfig::new("sqlite");
        let err = Dialect::new(DialectKind::Sqlite).configure(&mut config).unwrap_err();
        assert!(matches!(err, DatabaseError::Configuration(_)));

        config.connection.filename = Some(":memory:".to_string());
        assert!(Dialect::new(DialectKind::Sqlite).configure(&mut config).is_ok());
        assert_eq!(config.connection.filename.as_deref(), Some(":memory:"));
    }

    #[tokio::test]
    async fn test_initialize_enables_foreign_keys() -> Result<()> {
        let (conn, _dialect) = setup_database().await?;

        let rows = conn.raw("PRAGMA foreign_keys", &[]).await?;
        assert_eq!(rows[0]["foreign_keys"], Value::from(1));
        Ok(())
    }

    #[tokio::test]
    async fn test_schema_update_toggles_foreign_keys() -> Result<()> {
        let (conn, dialect) = setup_database().await?;

        dialect.start_schema_update(&conn).await?;
        let rows = conn.raw("PRAGMA foreign_keys", &[]).await?;
        assert_eq!(rows[0]["foreign_keys"], Value::from(0));

        dialect.end_schema_update(&conn).await?;
        let rows = conn.raw("PRAGMA foreign_keys", &[]).await?;
        assert_eq!(rows[0]["foreign_keys"], Value::from(1));
        Ok(())
    }

    #[tokio::test]
    async fn test_inspector_reads_tables_columns_and_keys() -> Result<()> {
        let (conn, dialect) = setup_database().await?;

        let inspector = dialect.schema_inspector(&DatabaseConfig::new("sqlite").connection);
        let schema = inspector.get_schema(&conn).await?;

        let names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["articles", "authors"]);

        let articles = schema.table("articles").expect("articles inspected");
        assert_eq!(articles.columns.len(), 5);

        let id = articles.column("id").expect("id column");
        assert_eq!(id.column_type, "increments");
        assert!(id.not_nullable);

        let title = articles.column("title").expect("title column");
        assert_eq!(title.column_type, "string");
        assert_eq!(title.args, vec![json!(255)]);
        assert!(title.not_nullable);

        assert_eq!(
            articles.column("published_at").map(|c| c.column_type.as_str()),
            Some("datetime")
        );
        assert_eq!(
            articles.column("author_id").map(|c| c.column_type.as_str()),
            Some("integer")
        );

        let unique = articles
            .indexes
            .iter()
            .find(|i| i.name == "articles_slug_unique")
            .expect("unique index");
        assert_eq!(unique.columns, vec!["slug"]);
        assert_eq!(unique.index_type, Some(IndexType::Unique));

        let plain = articles
            .indexes
            .iter()
            .find(|i| i.name == "articles_author_idx")
            .expect("plain index");
        assert_eq!(plain.index_type, None);

        assert_eq!(articles.foreign_keys.len(), 1);
        let fk = &articles.foreign_keys[0];
        assert_eq!(fk.name, "articles_fk_0");
        assert_eq!(fk.columns, vec!["author_id"]);
        assert_eq!(fk.referenced_table, "authors");
        assert_eq!(fk.referenced_columns, vec!["id"]);
        assert_eq!(fk.on_delete.as_deref(), Some("CASCADE"));
        assert_eq!(fk.on_update, None);

        assert!(schema.table("authors").expect("authors").foreign_keys.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_not_null_violation_is_translated() -> Result<()> {
        let (conn, dialect) = setup_database().await?;

        let native = conn
            .raw("INSERT INTO authors (name) VALUES (?)", &[FieldValue::Null])
            .await
            .unwrap_err();
        let err = dialect.transform_errors(native);

        assert_eq!(err.dialect_kind(), Some(DialectErrorKind::NotNullConstraint));
        match err {
            DatabaseError::Dialect(dialect_error) => {
                assert_eq!(dialect_error.column.as_deref(), Some("name"));
            }
            other => panic!("expected dialect error, got {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_unique_and_foreign_key_violations_are_translated() -> Result<()> {
        let (conn, dialect) = setup_database().await?;

        conn.raw("INSERT INTO authors (id, name) VALUES (1, 'Ada')", &[]).await?;
        conn.raw(
            "INSERT INTO articles (title, slug, author_id) VALUES (?, ?, ?)",
            &[FieldValue::from("First"), FieldValue::from("first"), FieldValue::Int(1)],
        )
        .await?;

        let duplicate = conn
            .raw(
                "INSERT INTO articles (title, slug) VALUES (?, ?)",
                &[FieldValue::from("Again"), FieldValue::from("first")],
            )
            .await
            .unwrap_err();
        assert_eq!(
            dialect.transform_errors(duplicate).dialect_kind(),
            Some(DialectErrorKind::UniqueConstraint)
        );

        let orphan = conn
            .raw(
                "INSERT INTO articles (title, author_id) VALUES (?, ?)",
                &[FieldValue::from("Orphan"), FieldValue::Int(404)],
            )
            .await
            .unwrap_err();
        assert_eq!(
            dialect.transform_errors(orphan).dialect_kind(),
            Some(DialectErrorKind::ForeignKeyConstraint)
        );
        Ok(())
    }
}
