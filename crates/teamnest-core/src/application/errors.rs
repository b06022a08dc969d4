//! Backend error normalization
//!
//! Turns a failed backend response into one consistent shape: a display
//! message, the raw validation payload, and a flat `field -> message` map
//! suitable for attaching errors to form fields.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::Error;

/// Message used when neither the body nor the status says anything useful
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred, please try again.";

/// Message for requests that never reached the backend
pub const NETWORK_ERROR_MESSAGE: &str = "Network error - Please check your connection.";

/// Key for validation messages that are not tied to a field
pub const GENERAL_ERROR_KEY: &str = "_error";

/// Human readable message for well-known HTTP statuses
pub fn status_message(status: u16) -> Option<&'static str> {
    match status {
        401 => Some("Unauthorized - Please log in again."),
        403 => Some("Forbidden - You do not have permission to access this resource."),
        404 => Some("Requested resource was not found."),
        429 => Some("Too many requests - Please wait and try again."),
        500 => Some("Internal Server Error - Please try again later."),
        _ => None,
    }
}

/// Normalized view of a failed backend call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorDetails {
    /// HTTP status; `None` when the request failed before a response
    pub status: Option<u16>,
    pub message: String,
    /// Validation payload exactly as the backend sent it
    pub validation_errors: Option<Value>,
    pub validation_map: BTreeMap<String, String>,
    pub api_path: String,
}

impl ApiErrorDetails {
    /// Build details from an HTTP status and the response body.
    ///
    /// The body's `message` wins, then the status message, then
    /// `fallback` (or the default message).
    pub fn from_response(status: u16, body: &Value, fallback: Option<&str>) -> Self {
        let data = body.as_object();
        let field = |key: &str| data.and_then(|d| d.get(key)).filter(|v| !v.is_null());

        let validation_errors = field("validationErrors").or_else(|| field("errors")).cloned();
        let message = field("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .or_else(|| status_message(status))
            .or(fallback)
            .unwrap_or(DEFAULT_ERROR_MESSAGE)
            .to_string();
        let api_path = field("apiPath")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Self {
            status: Some(status),
            message,
            validation_map: validation_errors
                .as_ref()
                .map(normalize_validation_errors)
                .unwrap_or_default(),
            validation_errors,
            api_path,
        }
    }

    /// Details for a request that never got a response
    pub fn network() -> Self {
        Self {
            status: None,
            message: NETWORK_ERROR_MESSAGE.to_string(),
            validation_errors: None,
            validation_map: BTreeMap::new(),
            api_path: String::new(),
        }
    }

    pub fn has_validation_errors(&self) -> bool {
        !self.validation_map.is_empty()
    }
}

impl From<ApiErrorDetails> for Error {
    fn from(details: ApiErrorDetails) -> Self {
        Error::ApiError {
            status: details.status.unwrap_or_default(),
            message: details.message,
        }
    }
}

/// Flatten any validation payload into `field -> message`.
///
/// Strings attach to their parent key, string arrays are joined with ", ",
/// arrays of objects read `field`/`path`/`property` and
/// `message`/`msg`/`error`/`defaultMessage`, and nested objects produce
/// dotted keys. Messages landing on the same key are joined with ", ".
pub fn normalize_validation_errors(value: &Value) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();
    walk(value, &mut errors, "");
    errors
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn append(errors: &mut BTreeMap<String, String>, key: &str, message: &str) {
    if message.is_empty() {
        return;
    }
    let key = if key.is_empty() { GENERAL_ERROR_KEY } else { key };
    errors
        .entry(key.to_string())
        .and_modify(|existing| {
            existing.push_str(", ");
            existing.push_str(message);
        })
        .or_insert_with(|| message.to_string());
}

fn first_truthy<'a>(item: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| item.get(*key))
        .find(|v| is_truthy(v))
}

fn walk(value: &Value, errors: &mut BTreeMap<String, String>, parent: &str) {
    if !is_truthy(value) {
        return;
    }

    match value {
        Value::String(s) => append(errors, parent, s),
        Value::Array(items) => {
            if items.iter().all(Value::is_string) {
                let joined: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
                append(errors, parent, &joined.join(", "));
                return;
            }
            for item in items {
                if let Value::Object(fields) = item {
                    let field = first_truthy(fields, &["field", "path", "property"])
                        .map(display)
                        .unwrap_or_else(|| parent.to_string());
                    if let Some(message) =
                        first_truthy(fields, &["message", "msg", "error", "defaultMessage"])
                    {
                        append(errors, &field, &display(message));
                        continue;
                    }
                }
                walk(item, errors, parent);
            }
        }
        Value::Object(fields) => {
            for (key, nested) in fields {
                let next = if parent.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", parent, key)
                };
                walk(nested, errors, &next);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_message_wins() {
        let details = ApiErrorDetails::from_response(
            401,
            &json!({"message": "Bad credentials", "apiPath": "uri=/api/auth/login"}),
            None,
        );
        assert_eq!(details.message, "Bad credentials");
        assert_eq!(details.api_path, "uri=/api/auth/login");
        assert_eq!(details.status, Some(401));
    }

    #[test]
    fn test_status_then_fallback_then_default() {
        let empty = json!({});
        assert_eq!(
            ApiErrorDetails::from_response(403, &empty, None).message,
            "Forbidden - You do not have permission to access this resource."
        );
        assert_eq!(
            ApiErrorDetails::from_response(418, &empty, Some("Teapot")).message,
            "Teapot"
        );
        assert_eq!(
            ApiErrorDetails::from_response(418, &Value::Null, None).message,
            DEFAULT_ERROR_MESSAGE
        );
    }

    #[test]
    fn test_network_failure() {
        let details = ApiErrorDetails::network();
        assert_eq!(details.status, None);
        assert_eq!(details.message, NETWORK_ERROR_MESSAGE);
        assert!(!details.has_validation_errors());
    }

    #[test]
    fn test_field_map_from_spring_style_errors() {
        let map = normalize_validation_errors(&json!({
            "email": "must be a well-formed email address",
            "password": ["too short", "needs a digit"],
        }));
        assert_eq!(map["email"], "must be a well-formed email address");
        assert_eq!(map["password"], "too short, needs a digit");
    }

    #[test]
    fn test_object_arrays_and_duplicates() {
        let map = normalize_validation_errors(&json!([
            {"field": "name", "defaultMessage": "is required"},
            {"path": "name", "msg": "is too long"},
            {"message": "Tenant is disabled"},
        ]));
        assert_eq!(map["name"], "is required, is too long");
        assert_eq!(map[GENERAL_ERROR_KEY], "Tenant is disabled");
    }

    #[test]
    fn test_nested_objects_use_dotted_keys() {
        let map = normalize_validation_errors(&json!({
            "ownerInfo": {"email": "already registered", "firstName": ""},
            "tenantInfo": {"organizationName": ["is required"]},
        }));
        assert_eq!(map["ownerInfo.email"], "already registered");
        assert_eq!(map["tenantInfo.organizationName"], "is required");
        assert!(!map.contains_key("ownerInfo.firstName"));
    }

    #[test]
    fn test_validation_errors_fall_back_to_errors_key() {
        let details = ApiErrorDetails::from_response(
            400,
            &json!({"errors": {"email": "taken"}}),
            None,
        );
        assert_eq!(details.validation_map["email"], "taken");
        assert!(details.validation_errors.is_some());
        assert_eq!(details.message, DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn test_into_error() {
        let err: Error = ApiErrorDetails::from_response(404, &json!({}), None).into();
        assert_eq!(err.code(), "E201");
        assert!(err.to_string().contains("Requested resource was not found."));
    }
}
