//! Database Layer
//!
//! Error types shared by the whole crate and the connection seam the dialect
//! layer runs its SQL through:
//!
//! - [`DatabaseError`] and the native error shapes ([`DriverError`],
//!   [`DialectError`])
//! - [`Connection`] - parameterized raw-SQL execution
//! - [`LibsqlConnection`] - embedded libsql implementation (`libsql` feature)

mod connection;
mod error;
#[cfg(feature = "libsql")]
mod libsql_connection;

pub use connection::{Connection, Row};
pub(crate) use connection::{row_bool, row_i64, row_str};
pub use error::{DatabaseError, DialectError, DialectErrorKind, DriverError};
#[cfg(feature = "libsql")]
pub use libsql_connection::LibsqlConnection;
