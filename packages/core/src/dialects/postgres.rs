use super::quoted_name;
use crate::config::ConnectionSettings;
use crate::db::{DialectError, DriverError};

pub(super) const DEFAULT_SCHEMA: &str = "public";

// SQLSTATE class 23, integrity constraint violation
const NOT_NULL_VIOLATION: &str = "23502";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";

// Type oids read back as plain values
const DATE_OID: &str = "1082";
const NUMERIC_OID: &str = "1700";

/// Register type parsers: DATE stays text, NUMERIC becomes a float
pub(super) fn configure(settings: &mut ConnectionSettings) {
    let casts = &mut settings.driver_options.type_casts;
    casts.insert(DATE_OID.to_string(), "text".to_string());
    casts.insert(NUMERIC_OID.to_string(), "float".to_string());
}

pub(super) fn transform_error(error: &DriverError) -> Option<DialectError> {
    match error.code.as_deref()? {
        NOT_NULL_VIOLATION => Some(DialectError::not_null(
            error
                .column
                .clone()
                .or_else(|| quoted_name(&error.message, '"')),
        )),
        UNIQUE_VIOLATION => Some(DialectError::unique(error.column.clone(), &error.message)),
        FOREIGN_KEY_VIOLATION => Some(DialectError::foreign_key(&error.message)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DialectErrorKind;

    #[test]
    fn test_not_null_carries_column() {
        let err = DriverError::new("null value in column \"title\" violates not-null constraint")
            .with_code(NOT_NULL_VIOLATION)
            .with_column("title");
        let translated = transform_error(&err).unwrap();
        assert_eq!(translated.kind, DialectErrorKind::NotNullConstraint);
        assert_eq!(translated.message, "Not null constraint violation on column title.");
    }

    #[test]
    fn test_not_null_column_from_message() {
        let err = DriverError::new(
            "null value in column \"title\" of relation \"articles\" violates not-null constraint",
        )
        .with_code(NOT_NULL_VIOLATION);
        let translated = transform_error(&err).unwrap();
        assert_eq!(translated.column.as_deref(), Some("title"));
        assert_eq!(translated.message, "Not null constraint violation on column title.");
    }

    #[test]
    fn test_other_codes() {
        let unique = DriverError::new("duplicate key").with_code(UNIQUE_VIOLATION);
        assert_eq!(transform_error(&unique).unwrap().kind, DialectErrorKind::UniqueConstraint);

        let syntax = DriverError::new("syntax error").with_code("42601");
        assert!(transform_error(&syntax).is_none());

        assert!(transform_error(&DriverError::new("no code")).is_none());
    }

    #[test]
    fn test_configure_registers_type_parsers() {
        let mut settings = ConnectionSettings::default();
        configure(&mut settings);
        assert_eq!(settings.driver_options.type_casts.get(DATE_OID).map(String::as_str), Some("text"));
        assert_eq!(settings.driver_options.type_casts.get(NUMERIC_OID).map(String::as_str), Some("float"));
    }
}
