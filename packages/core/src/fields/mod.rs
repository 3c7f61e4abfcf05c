//! Field Codec Registry
//!
//! One pure conversion pair per attribute type, applied the same way on every
//! dialect so application code never shapes values per engine.
//!
//! ## Contract
//!
//! - `to_db` converts an application value into its storage value and fails
//!   when the value cannot be represented.
//! - `from_db` converts a stored value back. It is tolerant: ambiguous input
//!   yields `FieldValue::Null` rather than an error (JSON is the exception,
//!   malformed stored documents are reported).
//!
//! ## Example
//!
//! ```
//! use cmsdb_core::fields;
//! use cmsdb_core::models::{Attribute, FieldValue};
//!
//! let time = Attribute::new("time");
//! assert_eq!(
//!     fields::to_db(&time, &FieldValue::from("14:30")).unwrap(),
//!     FieldValue::from("14:30:00.000")
//! );
//! ```

mod boolean;
mod date;
mod datetime;
mod json;
mod number;
mod string;
mod time;

pub use boolean::BooleanField;
pub use date::DateField;
pub use datetime::{DateTimeField, TimestampField};
pub use json::JsonField;
pub use number::{BigIntegerField, NumberField};
pub use string::StringField;
pub use time::TimeField;

use crate::db::DatabaseError;
use crate::models::{Attribute, FieldValue};
use std::fmt::Debug;

/// Bidirectional converter for one attribute type
///
/// Implementations are stateless and shared as `&'static` references.
pub trait FieldCodec: Debug + Send + Sync {
    /// Application value → storage value
    fn to_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError>;

    /// Storage value → application value
    fn from_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError>;
}

/// Identity codec for auto-increment identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct IncrementsField;

impl FieldCodec for IncrementsField {
    fn to_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
        Ok(value.clone())
    }

    fn from_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
        Ok(value.clone())
    }
}

/// Every attribute type with a registered codec
pub const FIELD_TYPES: &[&str] = &[
    "increments",
    "password",
    "email",
    "string",
    "uid",
    "richtext",
    "text",
    "enumeration",
    "json",
    "blocks",
    "biginteger",
    "integer",
    "float",
    "decimal",
    "date",
    "time",
    "datetime",
    "timestamp",
    "boolean",
];

/// Look up the codec for an attribute type
///
/// # Errors
///
/// `DatabaseError::UndefinedField` when the type has no codec. Unknown types
/// are never defaulted to a string codec.
pub fn field_for_type(field_type: &str) -> Result<&'static dyn FieldCodec, DatabaseError> {
    let codec: &'static dyn FieldCodec = match field_type {
        "increments" => &IncrementsField,
        "password" | "email" | "string" | "uid" | "richtext" | "text" | "enumeration" => {
            &StringField
        }
        "json" | "blocks" => &JsonField,
        "biginteger" => &BigIntegerField,
        "integer" | "float" | "decimal" => &NumberField,
        "date" => &DateField,
        "time" => &TimeField,
        "datetime" => &DateTimeField,
        "timestamp" => &TimestampField,
        "boolean" => &BooleanField,
        other => {
            return Err(DatabaseError::UndefinedField {
                field_type: other.to_string(),
            })
        }
    };
    Ok(codec)
}

/// Look up the codec for an attribute descriptor
pub fn create_field(attribute: &Attribute) -> Result<&'static dyn FieldCodec, DatabaseError> {
    field_for_type(&attribute.field_type)
}

/// Convert an application value for storage; `Null` is stored as `Null`
pub fn to_db(attribute: &Attribute, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
    let field = create_field(attribute)?;
    if value.is_null() {
        return Ok(FieldValue::Null);
    }
    field.to_db(value)
}

/// Convert a stored value for the application; `Null` stays `Null`
pub fn from_db(attribute: &Attribute, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
    let field = create_field(attribute)?;
    if value.is_null() {
        return Ok(FieldValue::Null);
    }
    field.from_db(value)
}
