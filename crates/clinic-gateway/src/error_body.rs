//! Error payloads in the backend's `{"exception": {"message": ...}}` shape.

use crate::ApiError;
use serde_json::Value;
use std::collections::BTreeMap;

/// Shown when a failure body carries nothing usable.
pub const GENERIC_ERROR_MESSAGE: &str = "The operation could not be completed";

/// Map a non-2xx body (other than 401/403) onto an [`ApiError`].
///
/// - string message: surfaced verbatim
/// - object message: one `field: message` line per entry, arrays expanded
/// - anything else: [`GENERIC_ERROR_MESSAGE`]
pub fn extract_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|mut value| value.get_mut("exception")?.get_mut("message").map(Value::take));

    match message {
        Some(Value::String(message)) if !message.trim().is_empty() => {
            ApiError::Api { status, message }
        }
        Some(Value::Object(entries)) if !entries.is_empty() => {
            let fields: BTreeMap<String, Vec<String>> = entries
                .into_iter()
                .map(|(field, value)| (field, messages(value)))
                .collect();
            let message = fields
                .iter()
                .flat_map(|(field, msgs)| msgs.iter().map(move |m| format!("{}: {}", field, m)))
                .collect::<Vec<_>>()
                .join("\n");
            ApiError::Validation { message, fields }
        }
        _ => ApiError::Api {
            status,
            message: GENERIC_ERROR_MESSAGE.to_string(),
        },
    }
}

fn messages(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.into_iter().flat_map(messages).collect(),
        Value::String(s) => vec![s],
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_array_becomes_field_line() {
        let err = extract_error(
            400,
            r#"{"exception":{"message":{"username":["Username taken"]}}}"#,
        );
        assert_eq!(err.to_string(), "username: Username taken");
        let ApiError::Validation { fields, .. } = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields["username"], vec!["Username taken".to_string()]);
    }

    #[test]
    fn test_multiple_fields_and_messages_are_one_per_line() {
        let err = extract_error(
            400,
            r#"{"exception":{"message":{"phone":"must not be blank","email":["too long","invalid"]}}}"#,
        );
        assert_eq!(
            err.to_string(),
            "email: too long\nemail: invalid\nphone: must not be blank"
        );
    }

    #[test]
    fn test_string_message_is_verbatim() {
        let err = extract_error(409, r#"{"exception":{"message":"Chip number already exists"}}"#);
        assert!(matches!(
            err,
            ApiError::Api { status: 409, ref message } if message == "Chip number already exists"
        ));
    }

    #[test]
    fn test_unusable_bodies_fall_back_to_generic() {
        for body in [
            "",
            "<html>oops</html>",
            "{}",
            r#"{"exception":{}}"#,
            r#"{"exception":{"message":42}}"#,
            r#"{"exception":{"message":{}}}"#,
            r#"{"error":"Internal Server Error"}"#,
        ] {
            let err = extract_error(500, body);
            assert_eq!(err.to_string(), GENERIC_ERROR_MESSAGE, "body {:?}", body);
            assert_eq!(err.status(), Some(500));
        }
    }
}
