//! Wire shapes exchanged with the CRM REST API besides paged listings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::types::{ContactId, PhoneNumber};

/// Field name to the list of messages reported against it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Key under which errors not bound to a single field are collected.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Normalizes an error body into field errors.
///
/// The API answers with either `{field: [messages]}`, `{field: "message"}`,
/// `{"message": "..."}` or `{"detail": "..."}`. Top-level `message` and
/// `detail` are filed under [`NON_FIELD_ERRORS`].
pub fn parse_error_body(body: &Value) -> FieldErrors {
    let mut errors = FieldErrors::new();

    match body {
        Value::Object(map) => {
            for (key, value) in map {
                let field = match key.as_str() {
                    "message" | "detail" => NON_FIELD_ERRORS,
                    other => other,
                };
                let messages = flatten_messages(value);
                if !messages.is_empty() {
                    errors
                        .entry(field.to_string())
                        .or_default()
                        .extend(messages);
                }
            }
        }
        Value::Array(_) | Value::String(_) => {
            let messages = flatten_messages(body);
            if !messages.is_empty() {
                errors.insert(NON_FIELD_ERRORS.to_string(), messages);
            }
        }
        _ => {}
    }

    errors
}

fn flatten_messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) if s.trim().is_empty() => Vec::new(),
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(flatten_messages).collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

/// Renders field errors as a single human-readable line.
pub fn summarize_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, messages)| {
            if field == NON_FIELD_ERRORS {
                messages.join(" ")
            } else {
                format!("{field}: {}", messages.join(" "))
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Capability token issued for the browser phone.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Body of `POST personalized-messages/{id}/send/`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct SendMessagePayload {
    pub from_: PhoneNumber,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<ContactId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<PhoneNumber>,
}
