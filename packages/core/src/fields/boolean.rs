use super::FieldCodec;
use crate::db::DatabaseError;
use crate::models::FieldValue;

/// Codec for `boolean` attributes
///
/// SQLite and MySQL store booleans as integers, so stored values are read
/// back from `0`/`1` in either numeric or string form.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanField;

impl FieldCodec for BooleanField {
    fn to_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
        let flag = match value {
            FieldValue::Bool(b) => *b,
            FieldValue::Int(1) => true,
            FieldValue::Int(0) => false,
            FieldValue::String(s) => match s.as_str() {
                "true" | "t" | "1" => true,
                "false" | "f" | "0" => false,
                _ => value.is_truthy(),
            },
            other => other.is_truthy(),
        };
        Ok(FieldValue::Bool(flag))
    }

    fn from_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
        if let FieldValue::Bool(b) = value {
            return Ok(FieldValue::Bool(*b));
        }

        Ok(match value.to_text().as_str() {
            "1" => FieldValue::Bool(true),
            "0" => FieldValue::Bool(false),
            _ => FieldValue::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_db_literals() {
        for literal in ["true", "t", "1"] {
            assert_eq!(BooleanField.to_db(&FieldValue::from(literal)).unwrap(), FieldValue::Bool(true));
        }
        for literal in ["false", "f", "0"] {
            assert_eq!(BooleanField.to_db(&FieldValue::from(literal)).unwrap(), FieldValue::Bool(false));
        }
        assert_eq!(BooleanField.to_db(&FieldValue::Int(0)).unwrap(), FieldValue::Bool(false));
    }

    #[test]
    fn test_to_db_falls_back_to_truthiness() {
        assert_eq!(BooleanField.to_db(&FieldValue::from("yes")).unwrap(), FieldValue::Bool(true));
        assert_eq!(BooleanField.to_db(&FieldValue::from("")).unwrap(), FieldValue::Bool(false));
        assert_eq!(BooleanField.to_db(&FieldValue::Int(5)).unwrap(), FieldValue::Bool(true));
    }

    #[test]
    fn test_from_db() {
        assert_eq!(BooleanField.from_db(&FieldValue::from("1")).unwrap(), FieldValue::Bool(true));
        assert_eq!(BooleanField.from_db(&FieldValue::Int(0)).unwrap(), FieldValue::Bool(false));
        assert_eq!(BooleanField.from_db(&FieldValue::Bool(true)).unwrap(), FieldValue::Bool(true));
        assert_eq!(BooleanField.from_db(&FieldValue::from("maybe")).unwrap(), FieldValue::Null);
    }
}
