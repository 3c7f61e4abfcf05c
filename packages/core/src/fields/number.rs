use super::FieldCodec;
use crate::db::DatabaseError;
use crate::models::FieldValue;

/// Codec for `integer`, `float` and `decimal` attributes
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberField;

/// Parse numeric text, integers first so they stay exact
fn parse_number(text: &str) -> Option<FieldValue> {
    let text = text.trim();
    if let Ok(i) = text.parse::<i64>() {
        return Some(FieldValue::Int(i));
    }
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(FieldValue::Float)
}

impl FieldCodec for NumberField {
    fn to_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
        let parsed = match value {
            FieldValue::Int(i) => Some(FieldValue::Int(*i)),
            FieldValue::Float(f) if f.is_finite() => Some(FieldValue::Float(*f)),
            FieldValue::Bool(b) => Some(FieldValue::Int(i64::from(*b))),
            FieldValue::String(s) => parse_number(s),
            _ => None,
        };

        parsed.ok_or_else(|| {
            DatabaseError::invalid_field_value(format!("Expected a valid Number, got {}", value))
        })
    }

    fn from_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
        Ok(match value {
            FieldValue::Int(_) | FieldValue::Float(_) => value.clone(),
            FieldValue::Bool(b) => FieldValue::Int(i64::from(*b)),
            // Drivers return DECIMAL/NUMERIC columns as strings
            FieldValue::String(s) => parse_number(s).unwrap_or(FieldValue::Null),
            _ => FieldValue::Null,
        })
    }
}

/// Codec for `biginteger` attributes
///
/// Values travel as strings in both directions so 64-bit identifiers never
/// pass through a lossy float.
#[derive(Debug, Clone, Copy, Default)]
pub struct BigIntegerField;

impl FieldCodec for BigIntegerField {
    fn to_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
        Ok(FieldValue::String(value.to_text()))
    }

    fn from_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
        Ok(FieldValue::String(value.to_text()))
    }
}
