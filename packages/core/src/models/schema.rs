//! Normalized database schema
//!
//! Shape returned by every schema inspector, regardless of engine. Column
//! types are generic type guesses (`increments`, `string`, `jsonb`, ...)
//! rather than raw engine types, so a schema diff can compare them directly.
//!
//! ## Example
//!
//! ```json
//! {
//!   "tables": [
//!     {
//!       "name": "articles",
//!       "columns": [
//!         { "name": "id", "type": "increments", "args": [{ "primary": true, "primaryKey": true }],
//!           "defaultTo": null, "notNullable": true, "unsigned": false }
//!       ],
//!       "indexes": [{ "name": "articles_slug_unique", "columns": ["slug"], "type": "unique" }],
//!       "foreignKeys": []
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// All user tables of the connected database
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub tables: Vec<Table>,
}

impl Schema {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Table metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Column metadata with its generic type guess
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,

    /// Generic column type (e.g. "increments", "string", "datetime")
    #[serde(rename = "type")]
    pub column_type: String,

    /// Builder arguments for the type (length, precision, options object)
    #[serde(default)]
    pub args: Vec<Value>,

    pub default_to: Option<String>,
    pub not_nullable: bool,
    pub unsigned: bool,
}

impl Column {
    pub(crate) fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            args: Vec::new(),
            default_to: None,
            not_nullable: false,
            unsigned: false,
        }
    }

    pub(crate) fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }
}

/// Kind of a non-plain index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexType {
    Unique,
    Primary,
}

/// Index metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,

    /// `None` for plain (non-unique) indexes
    #[serde(rename = "type")]
    pub index_type: Option<IndexType>,
}

/// Foreign key metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    pub name: String,
    pub columns: Vec<String>,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
    pub on_update: Option<String>,
    pub on_delete: Option<String>,
}
