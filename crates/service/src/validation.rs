//! Request payload validation.
//!
//! Handlers collect every field problem into a `Vec<FieldError>` before
//! failing, so a single 422 response reports the whole payload at once.

use sea_orm::{ConnectionTrait, EntityTrait};
use serde::{Deserialize, Deserializer, Serialize};

use models::rating_level;

use crate::errors::{db_err, ServiceError};

/// Machine-readable codes carried by 422 responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NoContent,
    InvalidValueType,
    FieldCannotBeNull,
    FieldCannotBeEmpty,
    FieldMaxLengthExceeded,
    FieldMinLengthNotMet,
    FieldValueAlreadyExists,
    FieldValueInvalid,
}

/// One problem found in a request payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
}

impl FieldError {
    pub fn no_content() -> Self {
        Self {
            code: ErrorCode::NoContent,
            message: "No content to apply".into(),
            field_name: None,
        }
    }

    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidValueType,
            message: message.into(),
            field_name: None,
        }
    }

    pub fn cannot_be_null(field: &str) -> Self {
        Self {
            code: ErrorCode::FieldCannotBeNull,
            message: format!("Field cannot be null: {field}"),
            field_name: Some(field.to_string()),
        }
    }

    pub fn cannot_be_empty(field: &str) -> Self {
        Self {
            code: ErrorCode::FieldCannotBeEmpty,
            message: format!("Field cannot be empty: {field}"),
            field_name: Some(field.to_string()),
        }
    }

    pub fn max_length_exceeded(field: &str, max: usize) -> Self {
        Self {
            code: ErrorCode::FieldMaxLengthExceeded,
            message: format!("Field exceeds the maximum length of {max}: {field}"),
            field_name: Some(field.to_string()),
        }
    }

    pub fn min_length_not_met(field: &str, min: usize) -> Self {
        Self {
            code: ErrorCode::FieldMinLengthNotMet,
            message: format!("Field does not meet the minimum length of {min}: {field}"),
            field_name: Some(field.to_string()),
        }
    }

    pub fn already_exists(field: &str) -> Self {
        Self {
            code: ErrorCode::FieldValueAlreadyExists,
            message: format!("Field value already exists: {field}"),
            field_name: Some(field.to_string()),
        }
    }

    pub fn invalid_value(field: &str) -> Self {
        Self {
            code: ErrorCode::FieldValueInvalid,
            message: format!("Invalid field value: {field}"),
            field_name: Some(field.to_string()),
        }
    }
}

/// Length bounds for a string field, measured in characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrRules {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl StrRules {
    pub fn max(max: usize) -> Self {
        Self {
            min_length: None,
            max_length: Some(max),
        }
    }
}

/// Validate a mandatory string field. Always returns the trimmed value so the
/// caller can keep going; when an error was pushed the caller bails before
/// using it.
pub fn validate_required_str(
    field: &str,
    value: Option<&str>,
    rules: StrRules,
    errors: &mut Vec<FieldError>,
) -> String {
    let Some(raw) = value else {
        errors.push(FieldError::cannot_be_null(field));
        return String::new();
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::cannot_be_empty(field));
        return String::new();
    }
    check_length(field, trimmed, rules, errors);
    trimmed.to_string()
}

/// Validate an optional string field. Absent fields pass untouched.
pub fn validate_str(
    field: &str,
    value: Option<&str>,
    rules: StrRules,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let raw = value?;
    let trimmed = raw.trim();
    check_length(field, trimmed, rules, errors);
    Some(trimmed.to_string())
}

fn check_length(field: &str, value: &str, rules: StrRules, errors: &mut Vec<FieldError>) {
    let len = value.chars().count();
    if let Some(min) = rules.min_length {
        if len < min {
            errors.push(FieldError::min_length_not_met(field, min));
            return;
        }
    }
    if let Some(max) = rules.max_length {
        if len > max {
            errors.push(FieldError::max_length_exceeded(field, max));
        }
    }
}

/// Push FIELD_VALUE_INVALID when a rating id is not one of the seeded levels.
pub async fn check_rating_level<C: ConnectionTrait>(
    db: &C,
    field: &str,
    value: Option<i16>,
    errors: &mut Vec<FieldError>,
) -> Result<(), ServiceError> {
    if let Some(id) = value {
        let known = rating_level::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(db_err)?;
        if known.is_none() {
            errors.push(FieldError::invalid_value(field));
        }
    }
    Ok(())
}

/// Fail with a single 422 carrying every collected error.
pub fn ensure_valid(errors: Vec<FieldError>) -> Result<(), ServiceError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Unprocessable(errors))
    }
}

/// Deserializer for PATCH fields that must distinguish "absent" from "null".
/// Absent maps to `None`, an explicit null to `Some(None)`.
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_str_rejects_null_and_empty() {
        let mut errors = Vec::new();
        validate_required_str("name", None, StrRules::max(10), &mut errors);
        validate_required_str("label", Some("   "), StrRules::max(10), &mut errors);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].code, ErrorCode::FieldCannotBeNull);
        assert_eq!(errors[0].field_name.as_deref(), Some("name"));
        assert_eq!(errors[1].code, ErrorCode::FieldCannotBeEmpty);
        assert_eq!(errors[1].field_name.as_deref(), Some("label"));
    }

    #[test]
    fn required_str_trims_whitespace() {
        let mut errors = Vec::new();
        let value = validate_required_str("name", Some("  Finance  "), StrRules::max(20), &mut errors);
        assert!(errors.is_empty());
        assert_eq!(value, "Finance");
    }

    #[test]
    fn length_is_counted_in_chars() {
        let mut errors = Vec::new();
        // Five characters, more than five bytes.
        let value = validate_required_str("name", Some("ação!"), StrRules::max(5), &mut errors);
        assert!(errors.is_empty());
        assert_eq!(value, "ação!");

        validate_required_str("name", Some("ação!!"), StrRules::max(5), &mut errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::FieldMaxLengthExceeded);
    }

    #[test]
    fn min_length_applies_before_max() {
        let mut errors = Vec::new();
        let rules = StrRules {
            min_length: Some(8),
            max_length: Some(64),
        };
        validate_required_str("password", Some("short"), rules, &mut errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::FieldMinLengthNotMet);
    }

    #[test]
    fn optional_str_passes_when_absent() {
        let mut errors = Vec::new();
        let value = validate_str("description", None, StrRules::max(10), &mut errors);
        assert!(errors.is_empty());
        assert!(value.is_none());
    }

    #[test]
    fn field_error_wire_format() {
        let err = FieldError::max_length_exceeded("legalName", 128);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "FIELD_MAX_LENGTH_EXCEEDED");
        assert_eq!(json["fieldName"], "legalName");
        assert!(json["message"].as_str().unwrap().contains("128"));
    }

    #[test]
    fn no_content_omits_field_name() {
        let json = serde_json::to_value(FieldError::no_content()).unwrap();
        assert_eq!(json["code"], "NO_CONTENT");
        assert!(json.get("fieldName").is_none());
    }

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "double_option")]
        name: Option<Option<String>>,
    }

    #[test]
    fn double_option_distinguishes_absent_from_null() {
        let absent: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.name, None);

        let null: Probe = serde_json::from_str(r#"{"name":null}"#).unwrap();
        assert_eq!(null.name, Some(None));

        let set: Probe = serde_json::from_str(r#"{"name":"HR"}"#).unwrap();
        assert_eq!(set.name, Some(Some("HR".to_string())));
    }
}
