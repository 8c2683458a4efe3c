//! Resource records accepted by the admin and public endpoints.
//!
//! Each resource exposes `validate(&Value) -> Result<New*, Vec<String>>`, which
//! either yields a typed record or every problem found, and `sanitize`, which
//! trims free text and strips angle brackets. Validation always runs first.

use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

pub mod case_study;
pub mod chat_log;
pub mod contact;
pub mod contact_form;

pub use case_study::{CaseStudy, NewCaseStudy};
pub use chat_log::{ChatLog, MessageType, NewChatLog};
pub use contact::{ContactStatus, ContactSubmission, NewContact};
pub use contact_form::{ContactForm, ContactFormSubmission, HasProject, ServicePreference};

pub const NOT_AN_OBJECT: &str = "Request body must be a JSON object";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex must compile"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Shallow XSS mitigation: trim and drop `<` / `>`. Not an HTML escaper.
pub fn sanitize_string(value: &str) -> String {
    value.trim().replace(['<', '>'], "")
}

pub fn sanitize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| sanitize_string(&v))
        .filter(|v| !v.is_empty())
}

/// Server timestamp in the same shape browsers produce (`2026-01-30T10:00:00.000Z`)
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn as_object(input: &Value) -> Result<&Map<String, Value>, Vec<String>> {
    input.as_object().ok_or_else(|| vec![NOT_AN_OBJECT.to_string()])
}

/// A string field that must be present and non-blank
pub(crate) fn required_text(
    obj: &Map<String, Value>,
    key: &str,
    message: &str,
    errors: &mut Vec<String>,
) -> String {
    match obj.get(key).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => {
            errors.push(message.to_string());
            String::new()
        }
    }
}

/// An optional string field; `null` counts as absent
pub(crate) fn optional_text(
    obj: &Map<String, Value>,
    key: &str,
    message: &str,
    errors: &mut Vec<String>,
) -> Option<String> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(message.to_string());
            None
        }
    }
}
