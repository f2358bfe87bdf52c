use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::AppError;

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(AppError::from)
}

pub fn violation(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(violation("required", "Username is required"));
    }
    Ok(())
}

/// Non-blank JSON string.
pub fn text_field(field: &str, value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Value::String(_) => Err(violation("required", format!("{field} is required"))),
        _ => Err(violation("type", format!("{field} must be a string"))),
    }
}

pub fn email_field(field: &str, value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) if validator::validate_email(s.trim()) => Ok(s.trim().to_string()),
        _ => Err(violation("email", format!("{field} must be a valid email address"))),
    }
}

/// Accepts JSON numbers and numeric strings.
pub fn numeric_field(field: &str, value: &Value) -> Result<f64, ValidationError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|n| n.is_finite())
        .ok_or_else(|| violation("numeric", format!("{field} must be numeric")))
}

/// ISO-8601 calendar date, or a date-time whose date part is kept.
pub fn date_field(field: &str, value: &Value) -> Result<NaiveDate, ValidationError> {
    let invalid = || violation("date", format!("{field} must be an ISO-8601 date"));
    let raw = value.as_str().map(str::trim).ok_or_else(invalid)?;

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Ok(datetime.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|datetime| datetime.date())
        .map_err(|_| invalid())
}

/// Runs `check` when the field is present, collecting any violation into `errors`.
/// A missing field is reported as required only when `required` is set.
pub fn collect<T>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&Value>,
    required: bool,
    check: fn(&str, &Value) -> Result<T, ValidationError>,
) -> Option<T> {
    match value {
        Some(value) => match check(field, value) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                errors.add(field, err);
                None
            }
        },
        None => {
            if required {
                errors.add(field, violation("required", format!("{field} is required")));
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!("2023-01-15"), "2023-01-15")]
    #[case(json!("2023-01-15T09:30:00Z"), "2023-01-15")]
    #[case(json!("2023-01-15T23:30:00-05:00"), "2023-01-15")]
    #[case(json!("2023-01-15T09:30:00.250"), "2023-01-15")]
    fn accepts_iso_dates(#[case] input: Value, #[case] expected: &str) {
        let date = date_field("date_of_joining", &input).expect("valid date");
        assert_eq!(date.to_string(), expected);
    }

    #[rstest]
    #[case(json!("15/01/2023"))]
    #[case(json!("2023-13-01"))]
    #[case(json!(20230115))]
    fn rejects_non_iso_dates(#[case] input: Value) {
        let err = date_field("date_of_joining", &input).unwrap_err();
        assert_eq!(err.code, "date");
    }

    #[rstest]
    #[case(json!(90000), 90000.0)]
    #[case(json!(1234.5), 1234.5)]
    #[case(json!("75000"), 75000.0)]
    fn accepts_numeric_salaries(#[case] input: Value, #[case] expected: f64) {
        assert_eq!(numeric_field("salary", &input).expect("numeric"), expected);
    }

    #[rstest]
    #[case(json!("lots"))]
    #[case(json!(true))]
    #[case(json!("NaN"))]
    fn rejects_non_numeric_salaries(#[case] input: Value) {
        assert!(numeric_field("salary", &input).is_err());
    }

    #[test]
    fn text_fields_must_be_non_blank_strings() {
        assert_eq!(text_field("position", &json!("  Engineer ")).unwrap(), "Engineer");
        assert_eq!(text_field("position", &json!("   ")).unwrap_err().code, "required");
        assert_eq!(text_field("position", &json!(7)).unwrap_err().code, "type");
    }

    #[test]
    fn usernames_must_not_be_blank() {
        assert!(validate_username("ann").is_ok());
        let err = validate_username("  \t ").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("Username is required"));
    }

    #[test]
    fn email_fields_are_syntax_checked() {
        assert_eq!(email_field("email", &json!("ann@x.com")).unwrap(), "ann@x.com");
        assert!(email_field("email", &json!("not-an-email")).is_err());
    }

    #[test]
    fn collect_reports_missing_required_fields_only() {
        let mut errors = ValidationErrors::new();
        assert_eq!(collect(&mut errors, "position", None, false, text_field), None);
        assert!(errors.is_empty());

        collect(&mut errors, "position", None, true, text_field);
        assert!(errors.field_errors().contains_key("position"));
    }
}
