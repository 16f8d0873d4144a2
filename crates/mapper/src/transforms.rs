//! Reusable value transforms for [`RegisteredType::transform`](crate::RegisteredType::transform).

use serde_json::Value;

/// Turns an object into an array with one `callback(key, value)` entry per
/// property, in document order. Non-object values pass through unchanged.
///
/// ```rust
/// use mapper::transforms::object_to_array;
/// use serde_json::json;
///
/// let to_pairs = object_to_array(|key, value| json!({ "name": key, "value": value }));
/// let out = to_pairs(json!({ "a": "value", "b": "value2" }));
/// assert_eq!(out, json!([
///     { "name": "a", "value": "value" },
///     { "name": "b", "value": "value2" },
/// ]));
/// ```
pub fn object_to_array<F>(callback: F) -> impl Fn(Value) -> Value + Send + Sync + 'static
where
    F: Fn(&str, Value) -> Value + Send + Sync + 'static,
{
    move |value| match value {
        Value::Object(entries) => Value::Array(
            entries
                .into_iter()
                .map(|(key, value)| callback(&key, value))
                .collect(),
        ),
        other => other,
    }
}
