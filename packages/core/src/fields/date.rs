use super::datetime::parse_datetime_or_timestamp;
use super::FieldCodec;
use crate::db::DatabaseError;
use crate::models::FieldValue;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

const DATE_PREFIX_PATTERN: &str = r"^(\d{4}-\d{2}-\d{2})";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Codec for calendar `date` attributes, stored as `YYYY-MM-DD`
#[derive(Debug, Clone, Copy, Default)]
pub struct DateField;

fn invalid_date() -> DatabaseError {
    DatabaseError::invalid_date("Invalid format, expected an ISO compatible date")
}

fn parse_date(value: &FieldValue) -> Result<NaiveDate, DatabaseError> {
    match value {
        FieldValue::Date(date) => Ok(*date),
        FieldValue::DateTime(dt) => Ok(dt.date_naive()),
        FieldValue::String(text) => {
            static DATE_PREFIX: OnceLock<Regex> = OnceLock::new();
            let prefix = DATE_PREFIX
                .get_or_init(|| Regex::new(DATE_PREFIX_PATTERN).expect("valid date pattern"));

            match prefix.captures(text) {
                Some(captures) => {
                    let date = &captures[1];
                    if date.len() != text.len() {
                        tracing::warn!(
                            "Deprecated date format '{}': dates should be sent as YYYY-MM-DD, only '{}' is kept",
                            text,
                            date
                        );
                    }
                    NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| invalid_date())
                }
                // Millisecond timestamps and other ISO shapes
                None => parse_datetime_or_timestamp(value)
                    .map(|dt| dt.date_naive())
                    .ok_or_else(invalid_date),
            }
        }
        _ => Err(invalid_date()),
    }
}

impl FieldCodec for DateField {
    fn to_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
        let date = parse_date(value)?;
        Ok(FieldValue::String(date.format(DATE_FORMAT).to_string()))
    }

    fn from_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
        Ok(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_db_canonical() {
        assert_eq!(
            DateField.to_db(&FieldValue::from("2024-02-29")).unwrap(),
            FieldValue::from("2024-02-29")
        );
    }

    #[test]
    fn test_to_db_extracts_leading_date() {
        assert_eq!(
            DateField.to_db(&FieldValue::from("2024-02-29T23:10:00.000Z")).unwrap(),
            FieldValue::from("2024-02-29")
        );
    }

    #[test]
    fn test_to_db_native_date() {
        let date = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();
        assert_eq!(DateField.to_db(&FieldValue::Date(date)).unwrap(), FieldValue::from("2023-07-01"));
    }

    #[test]
    fn test_to_db_invalid() {
        for bad in ["2023-02-30", "yesterday", ""] {
            let err = DateField.to_db(&FieldValue::from(bad)).unwrap_err();
            assert!(matches!(err, DatabaseError::InvalidDate(_)), "{} accepted", bad);
        }
        assert!(DateField.to_db(&FieldValue::Bool(true)).is_err());
    }

    #[test]
    fn test_from_db_passthrough() {
        let stored = FieldValue::from("2020-01-01");
        assert_eq!(DateField.from_db(&stored).unwrap(), stored);
    }
}
