//! Field values
//!
//! `FieldValue` is the value model shared by both sides of a field codec: the
//! application hands one to `to_db` and receives one back from `from_db`, and
//! the same type is bound as a parameter by `Connection::raw`.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde_json::Value;
use std::fmt;

/// A single attribute value, application side or storage side
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Arrays and objects (and any JSON document kept structured)
    Json(Value),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Int(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::String(_) => "string",
            FieldValue::Json(_) => "json",
            FieldValue::Date(_) => "date",
            FieldValue::Time(_) => "time",
            FieldValue::DateTime(_) => "datetime",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Loose string coercion
    ///
    /// Integral floats print without a fractional part (`4.0` → `"4"`),
    /// temporal values print in their canonical storage formats and
    /// structured JSON prints compact.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Float(f) => format_float(*f),
            FieldValue::String(s) => s.clone(),
            FieldValue::Json(Value::String(s)) => s.clone(),
            FieldValue::Json(v) => v.to_string(),
            FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            FieldValue::Time(t) => t.format("%H:%M:%S%.3f").to_string(),
            FieldValue::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Truthiness as the content API understands it
    ///
    /// Null, `false`, zero, NaN and the empty string are falsy; everything
    /// else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Int(i) => *i != 0,
            FieldValue::Float(f) => *f != 0.0 && !f.is_nan(),
            FieldValue::String(s) => !s.is_empty(),
            FieldValue::Json(Value::Null) => false,
            FieldValue::Json(_) => true,
            FieldValue::Date(_) | FieldValue::Time(_) | FieldValue::DateTime(_) => true,
        }
    }

    /// Convert into a JSON value (temporal values become strings)
    pub fn into_json(self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(b),
            FieldValue::Int(i) => Value::from(i),
            FieldValue::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::String(s) => Value::String(s),
            FieldValue::Json(v) => v,
            other => Value::String(other.to_text()),
        }
    }
}

/// Render a float the way JSON does: integral values lose the `.0`
pub(crate) fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{}", f as i128)
    } else {
        f.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            other => f.write_str(&other.to_text()),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Int(i),
                None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => FieldValue::String(s),
            other => FieldValue::Json(other),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<NaiveTime> for FieldValue {
    fn from(value: NaiveTime) -> Self {
        FieldValue::Time(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(FieldValue::from(json!(null)), FieldValue::Null);
        assert_eq!(FieldValue::from(json!(3)), FieldValue::Int(3));
        assert_eq!(FieldValue::from(json!(1.5)), FieldValue::Float(1.5));
        assert_eq!(FieldValue::from(json!("a")), FieldValue::String("a".into()));
        assert_eq!(FieldValue::from(json!({"a": 1})), FieldValue::Json(json!({"a": 1})));
    }

    #[test]
    fn test_to_text_formats() {
        assert_eq!(FieldValue::Float(4.0).to_text(), "4");
        assert_eq!(FieldValue::Float(4.25).to_text(), "4.25");
        assert_eq!(FieldValue::Json(json!([1, 2])).to_text(), "[1,2]");
        let dt = DateTime::parse_from_rfc3339("2024-03-01T10:20:30Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(FieldValue::DateTime(dt).to_text(), "2024-03-01T10:20:30.000Z");
    }

    #[test]
    fn test_truthiness() {
        assert!(!FieldValue::String(String::new()).is_truthy());
        assert!(FieldValue::String("no".into()).is_truthy());
        assert!(!FieldValue::Float(f64::NAN).is_truthy());
        assert!(!FieldValue::Int(0).is_truthy());
        assert!(FieldValue::Json(json!([])).is_truthy());
    }
}
