use super::FieldCodec;
use crate::db::DatabaseError;
use crate::models::FieldValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Naive formats accepted in addition to RFC 3339, interpreted as UTC
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

fn parse_datetime_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    // Unix timestamp in milliseconds
    let digits = text.strip_prefix('-').unwrap_or(text);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return text.parse::<i64>().ok().and_then(from_millis);
    }

    None
}

/// Interpret a value as an instant
///
/// Accepts native datetimes and dates, ISO 8601 / SQL datetime strings and
/// millisecond Unix timestamps (integer or string).
pub(crate) fn parse_datetime_or_timestamp(value: &FieldValue) -> Option<DateTime<Utc>> {
    match value {
        FieldValue::DateTime(dt) => Some(*dt),
        FieldValue::Date(date) => date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc()),
        FieldValue::Int(millis) => from_millis(*millis),
        FieldValue::Float(millis) if millis.is_finite() => from_millis(*millis as i64),
        FieldValue::String(text) => parse_datetime_text(text),
        _ => None,
    }
}

fn datetime_to_db(value: &FieldValue) -> Result<FieldValue, DatabaseError> {
    parse_datetime_or_timestamp(value)
        .map(FieldValue::DateTime)
        .ok_or_else(|| {
            DatabaseError::invalid_datetime("Invalid format, expected a timestamp or an ISO date")
        })
}

/// Codec for `datetime` attributes
///
/// Reads back as an ISO 8601 string with millisecond precision in UTC
/// (`2024-05-01T10:00:00.000Z`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeField;

impl FieldCodec for DateTimeField {
    fn to_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
        datetime_to_db(value)
    }

    fn from_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
        Ok(parse_datetime_or_timestamp(value)
            .map(|dt| FieldValue::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)))
            .unwrap_or(FieldValue::Null))
    }
}

/// Codec for `timestamp` attributes
///
/// Reads back as a Unix timestamp in milliseconds, as a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampField;

impl FieldCodec for TimestampField {
    fn to_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
        datetime_to_db(value)
    }

    fn from_db(&self, value: &FieldValue) -> Result<FieldValue, DatabaseError> {
        Ok(parse_datetime_or_timestamp(value)
            .map(|dt| FieldValue::String(dt.timestamp_millis().to_string()))
            .unwrap_or(FieldValue::Null))
    }
}
