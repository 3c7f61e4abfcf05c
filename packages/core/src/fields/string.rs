use super::FieldCodec;
use crate::db::DatabaseError;
use crate::models::FieldValue;

/// Codec for text-like attributes (`string`, `text`, `uid`, `enumeration`, ...)
///
/// Coerces to a string both ways. Validation (length, enum membership,
/// email shape) happens before values reach the database layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringField;

impl FieldCodec for StringField {
    fn to_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
        Ok(FieldValue::String(value.to_text()))
    }

    fn from_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
        Ok(FieldValue::String(value.to_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerces_scalars() {
        assert_eq!(StringField.to_db(&FieldValue::Int(12)).unwrap(), FieldValue::from("12"));
        assert_eq!(StringField.to_db(&FieldValue::Bool(true)).unwrap(), FieldValue::from("true"));
        assert_eq!(StringField.from_db(&FieldValue::Float(2.5)).unwrap(), FieldValue::from("2.5"));
    }

    #[test]
    fn test_strings_are_untouched() {
        let value = FieldValue::from("  not trimmed ");
        assert_eq!(StringField.to_db(&value).unwrap(), value);
    }
}
