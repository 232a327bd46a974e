//! Total parser for completion output, plus the offline sentinel.

use serde_json::{json, Value};

/// Notice placed in the offline sentinel when no credential is configured.
pub const OFFLINE_NOTICE: &str =
    "completion service offline: set completion.api_key or completion.offline_response to enable full outputs.";

/// Convert raw completion text into a structured mapping. Total function:
/// anything that is not a JSON object comes back as `{"analysis": raw}`.
pub fn parse_structured(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => value,
        _ => json!({ "analysis": raw }),
    }
}

/// Fixed mapping returned when no service credential and no pre-seeded
/// response are configured. Keeps downstream shape intact for tests and
/// demos instead of erroring.
pub fn offline_sentinel(model: &str) -> Value {
    json!({
        "analysis": OFFLINE_NOTICE,
        "model": model,
        "offline": true,
    })
}
