//! Data Models
//!
//! Plain data shared by the orderer, the field codecs and the dialect layer:
//!
//! - [`FieldValue`] - attribute values on both sides of a codec
//! - [`Attribute`] - attribute definition as declared by a content type
//! - Relation rows and connect/disconnect instructions
//! - [`Schema`] - database structure as read back by a schema inspector

mod attribute;
mod relation;
mod schema;
mod value;

pub use attribute::Attribute;
pub use relation::{ConnectInstruction, DisconnectInstruction, Position, RelationId, RelationRow};
pub use schema::{Column, ForeignKey, Index, IndexType, Schema, Table};
pub use value::FieldValue;
