// ── Tab selection from query values ──

use serde_json::Value;

/// Tab name from a decoded query-string value.
///
/// A string is returned as-is (`""` included), an array yields its first
/// element when that is a string, anything else yields `None`.
pub fn tab_from_query(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(tab) => Some(tab.clone()),
        Value::Array(items) => items.first()?.as_str().map(str::to_owned),
        _ => None,
    }
}
