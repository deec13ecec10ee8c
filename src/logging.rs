//! Tracing setup and audit-log redaction
//!
//! Request handling emits structured events for every method call and tool
//! execution; params are redacted here before they reach the log stream.

use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global tracing subscriber. Intended for the embedding
/// application's startup path; honors `RUST_LOG` and defaults to `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Masks sensitive values in request params before logging. Only the log
/// stream sees the redacted copy; responses are built from the original.
pub fn redact_params(params: Option<&Value>) -> Value {
    params.map(redact_value).unwrap_or(Value::Null)
}

fn redact_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| {
                    if is_sensitive_key(key) {
                        (key.clone(), Value::String("[REDACTED]".to_string()))
                    } else {
                        (key.clone(), redact_value(item))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_value).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.trim().to_ascii_lowercase();
    normalized.contains("token")
        || normalized.contains("secret")
        || normalized.contains("password")
        || normalized.contains("credential")
        || normalized.contains("api_key")
        || normalized == "apikey"
        || normalized == "authorization"
}

#[cfg(test)]
mod tests {
    use super::redact_params;
    use serde_json::json;

    #[test]
    fn redacts_sensitive_fields() {
        let params = json!({
            "name": "review_code",
            "arguments": {
                "file": "src/main.rs",
                "api_key": "should-not-appear",
                "nested": {
                    "access_token": "should-not-appear"
                }
            }
        });

        let redacted = redact_params(Some(&params));

        assert_eq!(redacted["name"], json!("review_code"));
        assert_eq!(redacted["arguments"]["file"], json!("src/main.rs"));
        assert_eq!(redacted["arguments"]["api_key"], json!("[REDACTED]"));
        assert_eq!(
            redacted["arguments"]["nested"]["access_token"],
            json!("[REDACTED]")
        );
    }

    #[test]
    fn missing_params_redact_to_null() {
        assert_eq!(redact_params(None), serde_json::Value::Null);
    }
}
