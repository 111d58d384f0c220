//! core::json
//!
//! Helpers over [`serde_json::Value`], the only data type the merge engine and
//! the draft store operate on.
//!
//! # Equality
//!
//! [`deep_equals`] is structural equality. Unlike `Value`'s `PartialEq`,
//! numbers compare by numeric value, so `1` and `1.0` are equal: snapshots
//! round-trip through different serializers and the integer/float tag is not
//! stable across them.
//!
//! Mapping key order is irrelevant. Lists are order-sensitive and types never
//! coerce (`"1"` is not `1`).

use serde_json::{Map, Value};

/// Structural equality over JSON values.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use spedit::core::json::deep_equals;
///
/// assert!(deep_equals(&json!({"a": 1, "b": [1, 2]}), &json!({"b": [1, 2], "a": 1.0})));
/// assert!(!deep_equals(&json!([1, 2]), &json!([2, 1])));
/// assert!(!deep_equals(&json!("1"), &json!(1)));
/// ```
pub fn deep_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => {
            if x == y {
                return true;
            }
            // Two integers compare exactly; floats are involved only when present.
            if !(x.is_f64() || y.is_f64()) {
                return false;
            }
            match (x.as_f64(), y.as_f64()) {
                (Some(fx), Some(fy)) => fx == fy,
                _ => false,
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| deep_equals(x, y))
        }
        (Value::Object(xm), Value::Object(ym)) => maps_equal(xm, ym),
        _ => false,
    }
}

fn maps_equal(a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| deep_equals(value, other)))
}

/// Returns the mapping if `value` is a JSON object.
pub fn as_object(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// True if `value` is a mapping that carries an `id` field.
pub fn has_id(value: &Value) -> bool {
    as_object(value).is_some_and(|map| map.contains_key("id"))
}

/// Human-readable name of a value's JSON type, for error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
