//! Lenient accessors over raw JSON payloads
//!
//! The backend is not consistent about key casing or about whether ids are
//! numbers or strings, and list endpoints may or may not be paginated. The
//! helpers here implement the lookup rules the view models share: try each
//! candidate key in order and take the first *truthy* value (non-null,
//! non-empty string, non-zero number, `true`, any array or object).

use serde_json::Value;

/// Returns `true` when the value counts as present
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First truthy value among `keys`
///
/// A key may be a dotted path (`"user.name"`) to reach into nested objects.
pub fn field<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|key| lookup(raw, key)).find(|value| truthy(value))
}

fn lookup<'a>(raw: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(raw, |current, segment| current.get(segment))
}

/// Renders scalars as strings; numeric ids become `"42"`
pub fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// First truthy value among `keys`, as a string
pub fn opt_string(raw: &Value, keys: &[&str]) -> Option<String> {
    field(raw, keys).and_then(stringify)
}

/// Like [`opt_string`] with an empty-string default
pub fn string_or_empty(raw: &Value, keys: &[&str]) -> String {
    opt_string(raw, keys).unwrap_or_default()
}

/// First truthy numeric value among `keys`; numeric strings are accepted
pub fn opt_f64(raw: &Value, keys: &[&str]) -> Option<f64> {
    field(raw, keys).and_then(|value| match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Like [`opt_f64`] with a zero default
pub fn f64_or_zero(raw: &Value, keys: &[&str]) -> f64 {
    opt_f64(raw, keys).unwrap_or(0.0)
}

/// Integer view of [`opt_f64`]; fractional and negative values are dropped
pub fn opt_u64(raw: &Value, keys: &[&str]) -> Option<u64> {
    opt_f64(raw, keys)
        .filter(|n| n.is_finite() && *n >= 0.0 && n.fract() == 0.0)
        .map(|n| n as u64)
}

/// Like [`opt_u64`] with a zero default
pub fn u64_or_zero(raw: &Value, keys: &[&str]) -> u64 {
    opt_u64(raw, keys).unwrap_or(0)
}

/// `true` iff some key holds a truthy value
pub fn flag(raw: &Value, keys: &[&str]) -> bool {
    field(raw, keys).is_some()
}

/// Record id as a string; empty when absent
pub fn id_string(raw: &Value) -> String {
    string_or_empty(raw, &["id"])
}

/// Items of a list payload
///
/// Accepts a bare array or an envelope holding it under `data` or
/// `results` (`{"results": [...]}`).
/// Anything else is an empty list.
pub fn collection(raw: &Value) -> &[Value] {
    let items = ["data", "results"]
        .iter()
        .find_map(|key| raw.get(*key).filter(|items| items.is_array()))
        .unwrap_or(raw);
    items.as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// Normalizes every element of a list payload
pub fn normalize_list<T>(raw: &Value, normalize: impl Fn(&Value) -> T) -> Vec<T> {
    collection(raw).iter().map(normalize).collect()
}
