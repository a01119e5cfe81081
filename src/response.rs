//! Result envelope used by the generated update/delete/child handlers.

use serde_json::Value;

/// `{ "result": value }`.
pub fn wrap_result(value: Value) -> Value {
    serde_json::json!({ "result": value })
}

/// `{ "result": null }`, returned when an operation had nothing to act on.
pub fn empty_result() -> Value {
    wrap_result(Value::Null)
}
