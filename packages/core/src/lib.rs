//! CMS Database Core
//!
//! The storage-facing core of the content-management backend:
//!
//! - **Relation ordering**: fractional `order` values for many-to-many and
//!   one-to-many links, so connected entities keep a user-controlled sequence
//! - **Field codecs**: per-attribute-type conversion between application
//!   values and stored values
//! - **Dialects**: capability flags, type mapping, session setup and error
//!   normalization for SQLite, MySQL/MariaDB, PostgreSQL and CockroachDB
//! - **Schema inspection**: reading the live database structure back
//!
//! # Modules
//!
//! - [`relations`] - `RelationsOrderer` and the connect batch pre-sort
//! - [`fields`] - `FieldCodec` implementations and the type registry
//! - [`dialects`] - `Dialect` and `DialectKind`
//! - [`schema`] - `SchemaInspector`
//! - [`db`] - errors and the `Connection` seam (libsql implementation included)
//! - [`config`] - `DatabaseConfig`
//! - [`models`] - shared data structures

pub mod config;
pub mod db;
pub mod dialects;
pub mod fields;
pub mod models;
pub mod relations;
pub mod schema;

// Re-export commonly used types
pub use config::DatabaseConfig;
pub use db::{Connection, DatabaseError, DialectError, DialectErrorKind, DriverError};
pub use dialects::{Dialect, DialectKind};
pub use fields::FieldCodec;
pub use models::*;
pub use relations::RelationsOrderer;
pub use schema::SchemaInspector;
