use super::FieldCodec;
use crate::db::DatabaseError;
use crate::models::FieldValue;
use regex::Regex;
use std::sync::OnceLock;

const TIME_PATTERN: &str = r"^(2[0-3]|[01][0-9]):([0-5][0-9])(?::([0-5][0-9])(?:\.([0-9]{1,3}))?)?$";
const TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// Codec for `time` attributes, stored as `HH:mm:ss.SSS`
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeField;

fn parse_time(value: &FieldValue) -> Result<String, DatabaseError> {
    let text = match value {
        FieldValue::Time(time) => return Ok(time.format(TIME_FORMAT).to_string()),
        FieldValue::DateTime(dt) => return Ok(dt.time().format(TIME_FORMAT).to_string()),
        FieldValue::String(text) => text,
        other => {
            return Err(DatabaseError::invalid_time(format!(
                "Expected a string, got a {}",
                other.type_name()
            )))
        }
    };

    static TIME_REGEX: OnceLock<Regex> = OnceLock::new();
    let time_regex = TIME_REGEX.get_or_init(|| Regex::new(TIME_PATTERN).expect("valid time pattern"));

    let captures = time_regex
        .captures(text)
        .ok_or_else(|| DatabaseError::invalid_time("Invalid time format, expected HH:mm:ss.SSS"))?;

    let hours = &captures[1];
    let minutes = &captures[2];
    let seconds = captures.get(3).map_or("00", |m| m.as_str());
    let fraction = captures.get(4).map_or("", |m| m.as_str());

    Ok(format!("{}:{}:{}.{:0<3}", hours, minutes, seconds, fraction))
}

impl FieldCodec for TimeField {
    fn to_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
        parse_time(value).map(FieldValue::String)
    }

    fn from_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
        Ok(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn to_db(text: &str) -> Result<FieldValue, DatabaseError> {
        TimeField.to_db(&FieldValue::from(text))
    }

    #[test]
    fn test_pads_missing_parts() {
        assert_eq!(to_db("14:30").unwrap(), FieldValue::from("14:30:00.000"));
        assert_eq!(to_db("14:30:15").unwrap(), FieldValue::from("14:30:15.000"));
        assert_eq!(to_db("14:30:15.5").unwrap(), FieldValue::from("14:30:15.500"));
    }

    #[test]
    fn test_canonical_value_is_idempotent() {
        assert_eq!(to_db("14:30:00.000").unwrap(), FieldValue::from("14:30:00.000"));
    }

    #[test]
    fn test_native_time() {
        let time = NaiveTime::from_hms_milli_opt(8, 5, 3, 42).unwrap();
        assert_eq!(TimeField.to_db(&FieldValue::Time(time)).unwrap(), FieldValue::from("08:05:03.042"));
    }

    #[test]
    fn test_rejects_other_shapes() {
        for bad in ["24:00", "9:30", "14:30:00.1234", "noon"] {
            let err = to_db(bad).unwrap_err();
            assert!(matches!(err, DatabaseError::InvalidTime(_)), "{} accepted", bad);
        }
        let err = TimeField.to_db(&FieldValue::Int(5)).unwrap_err();
        assert_eq!(err.to_string(), "Expected a string, got a integer");
    }
}
