//! merge::sanitize
//!
//! Strip empty strings from a config before it is sent to the server.
//!
//! Form fields bound to optional values come back as `""` when the user
//! clears them, but the server treats `""` as a real value (an empty regex
//! matches everything, so `excludeFilter: ""` excludes every episode). Empty
//! strings are therefore removed from mappings before upload.

use serde_json::{Map, Value};

/// Remove empty strings from `value`, recursively.
///
/// - Mapping entries whose value is `""` are dropped.
/// - List elements that are `""` become `null`, keeping positions stable.
/// - A top-level `""` yields `None`.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use spedit::merge::sanitize;
///
/// let config = json!({"id": "p1", "titleFilter": "", "playlists": [{"id": "a", "excludeFilter": ""}]});
/// assert_eq!(sanitize(&config), Some(json!({"id": "p1", "playlists": [{"id": "a"}]})));
/// ```
pub fn sanitize(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::Array(items) => Some(Value::Array(
            items
                .iter()
                .map(|item| sanitize(item).unwrap_or(Value::Null))
                .collect(),
        )),
        Value::Object(map) => Some(Value::Object(
            map.iter()
                .filter_map(|(key, item)| sanitize(item).map(|clean| (key.clone(), clean)))
                .collect::<Map<String, Value>>(),
        )),
        other => Some(other.clone()),
    }
}
