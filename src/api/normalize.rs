//! Response envelope unwrapping and error-message sanitizing.
//!
//! Bodies may arrive bare or wrapped as `{status, data}`; both normalize to the
//! same payload. Failure bodies only contribute their `message` field, and only
//! for 4xx statuses when the text carries none of the technical markers.

use super::error::{RequestError, GENERIC_ERROR_MESSAGE};
use serde_json::Value;

const TECHNICAL_MARKERS: [&str; 4] = ["Exception", "java.", "at com.", "org.springframework"];

/// Parses a body as JSON. Empty or malformed bodies mean "no payload".
pub fn parse_body(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    serde_json::from_str(body).ok()
}

fn is_machine_code(message: &str) -> bool {
    !message.is_empty()
        && message
            .chars()
            .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_')
}

/// `RESOURCE_NOT_FOUND` becomes `Resource not found`; anything that is not an
/// upper-case code is returned unchanged.
pub fn humanize(message: &str) -> String {
    if !is_machine_code(message) {
        return message.to_string();
    }
    let lowered = message.replace('_', " ").to_lowercase();
    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) if first.is_alphanumeric() => {
            first.to_uppercase().chain(chars).collect::<String>()
        }
        _ => lowered,
    }
}

pub fn is_technical_message(message: &str) -> bool {
    TECHNICAL_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

/// Picks the operator-facing message for a failed response.
pub fn sanitize_error_message(status: u16, payload: Option<&Value>) -> String {
    if !(400..500).contains(&status) {
        return GENERIC_ERROR_MESSAGE.to_string();
    }
    let Some(message) = payload
        .and_then(|value| value.get("message"))
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
    else {
        return GENERIC_ERROR_MESSAGE.to_string();
    };
    if is_technical_message(message) {
        return GENERIC_ERROR_MESSAGE.to_string();
    }
    humanize(message)
}

/// Returns `data` for `{status, data}` objects, otherwise the payload itself.
pub fn unwrap_envelope(payload: Value) -> Value {
    match payload {
        Value::Object(mut map) if map.contains_key("status") && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Turns a status code and raw body into the unwrapped payload or a sanitized
/// error. `Ok(None)` is an empty result (204, or a success with no body).
pub fn normalize_response(status: u16, body: &str) -> Result<Option<Value>, RequestError> {
    if status == 204 {
        return Ok(None);
    }
    let payload = parse_body(body);
    if !(200..300).contains(&status) {
        return Err(RequestError::Application {
            status,
            message: sanitize_error_message(status, payload.as_ref()),
        });
    }
    Ok(payload.map(unwrap_envelope))
}
