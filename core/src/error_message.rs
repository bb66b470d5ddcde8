//! Error-formatting collaborator.
//!
//! # Design
//! The executor treats error messages as opaque: it hands either a
//! synthetic status line or the parsed JSON body to an `ErrorFormatter`
//! and stores whatever comes back. `DefaultErrorFormatter` understands the
//! usual REST error shapes (`{"detail": ...}`, `{"message": ...}` and
//! field-error maps).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the server told us about a failed request.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// `"<status>: <statusText>"`, used when the body is not JSON.
    StatusLine(String),
    /// The parsed JSON body of the failed response.
    Json(Value),
}

/// Turns a failed response into a caller-facing message value.
pub trait ErrorFormatter {
    type Message;

    fn format(&self, body: ErrorBody, status: u16) -> Self::Message;
}

/// Message shape produced by `DefaultErrorFormatter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub status: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorFormatter;

impl ErrorFormatter for DefaultErrorFormatter {
    type Message = ErrorMessage;

    fn format(&self, body: ErrorBody, status: u16) -> ErrorMessage {
        match body {
            ErrorBody::StatusLine(line) => ErrorMessage {
                status,
                message: line,
                details: None,
            },
            ErrorBody::Json(value) => ErrorMessage {
                status,
                message: summarize(&value)
                    .unwrap_or_else(|| format!("Request failed with status {status}")),
                details: Some(value),
            },
        }
    }
}

fn summarize(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => {
            for key in ["detail", "message", "error"] {
                if let Some(Value::String(s)) = map.get(key) {
                    return Some(s.clone());
                }
            }
            let fields: Vec<String> = map
                .iter()
                .filter_map(|(field, v)| field_text(v).map(|text| format!("{field}: {text}")))
                .collect();
            (!fields.is_empty()).then(|| fields.join("; "))
        }
        Value::Array(items) => {
            let texts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!texts.is_empty()).then(|| texts.join(" "))
        }
        _ => None,
    }
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let texts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!texts.is_empty()).then(|| texts.join(" "))
        }
        _ => None,
    }
}
