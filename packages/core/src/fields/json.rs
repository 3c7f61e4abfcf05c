use super::FieldCodec;
use crate::db::DatabaseError;
use crate::models::FieldValue;
use serde_json::Value;

/// Codec for `json` and `blocks` attributes
///
/// Stored as JSON text. Some rows were written with the document encoded
/// twice (a JSON string containing JSON); `from_db` unwraps that one extra
/// level when it finds it.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonField;

impl FieldCodec for JsonField {
    fn to_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
        if let FieldValue::Float(f) = value {
            if !f.is_finite() {
                return Err(DatabaseError::invalid_json(format!(
                    "Invalid JSON value: {} cannot be represented in JSON",
                    f
                )));
            }
        }

        let document = value.clone().into_json();
        let text = serde_json::to_string(&document)
            .map_err(|e| DatabaseError::invalid_json(format!("Invalid JSON value: {}", e)))?;

        // Guard against anything the serializer accepts but a reader would not
        serde_json::from_str::<Value>(&text)
            .map_err(|e| DatabaseError::invalid_json(format!("Invalid JSON value: {}", e)))?;

        Ok(FieldValue::String(text))
    }

    fn from_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
        let text = match value {
            FieldValue::String(text) => text,
            other => return Ok(other.clone()),
        };

        let parsed: Value = serde_json::from_str(text).map_err(|e| {
            DatabaseError::invalid_json(format!("Invalid JSON stored in database: {}", e))
        })?;

        let parsed = match parsed {
            Value::String(inner) => serde_json::from_str(&inner).unwrap_or(Value::String(inner)),
            other => other,
        };

        Ok(match parsed {
            document @ (Value::Object(_) | Value::Array(_)) => FieldValue::Json(document),
            scalar => FieldValue::from(scalar),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_db_serializes() {
        let stored = JsonField.to_db(&FieldValue::Json(json!({"a": 1}))).unwrap();
        assert_eq!(stored, FieldValue::from(r#"{"a":1}"#));
    }

    #[test]
    fn test_to_db_rejects_non_finite() {
        let err = JsonField.to_db(&FieldValue::Float(f64::INFINITY)).unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidJsonValue(_)));
    }

    #[test]
    fn test_from_db_parses() {
        let value = JsonField.from_db(&FieldValue::from(r#"{"a":1}"#)).unwrap();
        assert_eq!(value, FieldValue::Json(json!({"a": 1})));
    }

    #[test]
    fn test_from_db_unwraps_double_encoding() {
        let value = JsonField.from_db(&FieldValue::from(r#""{\"a\":1}""#)).unwrap();
        assert_eq!(value, FieldValue::Json(json!({"a": 1})));

        // A plain JSON string stays a string
        let value = JsonField.from_db(&FieldValue::from(r#""hello""#)).unwrap();
        assert_eq!(value, FieldValue::from("hello"));
    }

    #[test]
    fn test_from_db_malformed() {
        let err = JsonField.from_db(&FieldValue::from("{not json")).unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidJsonValue(_)));
    }

    #[test]
    fn test_from_db_passes_structured_values() {
        let value = FieldValue::Json(json!([1, 2]));
        assert_eq!(JsonField.from_db(&value).unwrap(), value);
    }
}
