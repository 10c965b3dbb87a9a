//! Backend error mapping and body sanitization

use crate::config::Platform;
use crate::error::GateError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const MAX_ERROR_TEXT_CHARS: usize = 1_024;
const REDACTED: &str = "[REDACTED]";

static BEARER_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bBearer\s+[A-Za-z0-9._\-+/=]{8,}").expect("valid bearer token regex")
});

static KEY_VALUE_SECRET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(api[_-]?key|x-goog-api-key|access[_-]?token|token|secret|password|authorization|key)\b\s*[:=]\s*["']?[^"',&\s}]+"#,
    )
    .expect("valid key/value secret regex")
});

/// Redact secrets from a backend error body and cap its length.
///
/// JSON bodies have sensitive fields replaced wholesale; plain text has
/// bearer tokens and `key=value` secrets masked.
pub fn sanitize_error_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "<empty error response body>".to_string();
    }

    if let Ok(mut json) = serde_json::from_str::<Value>(trimmed) {
        redact_json_value(&mut json);
        let serialized =
            serde_json::to_string(&json).unwrap_or_else(|_| "<unserializable error>".to_string());
        return truncate_with_suffix(serialized);
    }

    truncate_with_suffix(redact_inline_secrets(trimmed))
}

fn redact_json_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if is_sensitive_key(key) {
                    *val = Value::String(REDACTED.to_string());
                } else {
                    redact_json_value(val);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_json_value),
        Value::String(s) => *s = redact_inline_secrets(s),
        _ => {}
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.to_ascii_lowercase().replace(['-', ' '], "_");
    ["api_key", "token", "secret", "password", "authorization", "cookie", "private_key"]
        .iter()
        .any(|needle| normalized.contains(needle))
}

fn redact_inline_secrets(input: &str) -> String {
    let redacted_bearer = BEARER_TOKEN_RE.replace_all(input, "Bearer [REDACTED]");
    KEY_VALUE_SECRET_RE
        .replace_all(&redacted_bearer, "$1=[REDACTED]")
        .into_owned()
}

fn truncate_with_suffix(input: String) -> String {
    let char_count = input.chars().count();
    if char_count <= MAX_ERROR_TEXT_CHARS {
        return input;
    }

    let truncated: String = input.chars().take(MAX_ERROR_TEXT_CHARS).collect();
    format!(
        "{}... [truncated {} chars]",
        truncated,
        char_count - MAX_ERROR_TEXT_CHARS
    )
}

/// Build a backend error from a non-success HTTP response
pub async fn handle_http_error(response: reqwest::Response, platform: Platform) -> GateError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    GateError::backend(platform.name(), status, sanitize_error_text(&body))
}

/// Build a backend error from a failure below the HTTP layer
pub fn handle_transport_error(err: reqwest::Error, platform: Platform) -> GateError {
    // reqwest includes the request URL, which may carry a key in its query.
    let err = err.without_url();
    GateError::transport(platform.name(), sanitize_error_text(&err.to_string()))
}

/// Build an invalid-response error from a body that is not the expected JSON
pub fn handle_parse_error(err: reqwest::Error, platform: Platform) -> GateError {
    GateError::invalid_response(
        platform.name(),
        format!("failed to parse response body: {}", err.without_url()),
    )
}
