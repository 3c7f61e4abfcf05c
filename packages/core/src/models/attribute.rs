//! Attribute descriptors
//!
//! The content-type loader hands the database core one descriptor per
//! attribute. Only `type` matters here; every other key is kept verbatim so
//! descriptors round-trip without loss.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Descriptor of one content-type attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute type (e.g. "string", "integer", "datetime")
    #[serde(rename = "type")]
    pub field_type: String,

    /// Remaining descriptor keys (required, default, enum values, ...)
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl Attribute {
    pub fn new(field_type: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            options: Map::new(),
        }
    }
}

impl From<&str> for Attribute {
    fn from(field_type: &str) -> Self {
        Self::new(field_type)
    }
}
