//! Key probing for upstream payloads whose field names drift.
//!
//! Providers rename fields, nest them under a currency map, or switch a
//! scalar for an object. Instead of one rigid struct per shape, callers list
//! the candidate locations of a field in order of preference and take the
//! first one that decodes as the wanted type.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Decodes the first candidate key of `object` whose value parses as `T`.
///
/// Missing keys, `null` values and values of the wrong shape are skipped.
pub(crate) fn probe_field<T: DeserializeOwned>(
    object: &Map<String, Value>,
    candidates: &[&str],
) -> Option<T> {
    candidates
        .iter()
        .find_map(|key| decode(object.get(*key)?))
}

/// Like [`probe_field`], with candidates given as JSON pointers
/// (e.g. `"/current_price/usd"`) so nested locations can be probed too.
pub(crate) fn probe_pointer<T: DeserializeOwned>(value: &Value, candidates: &[&str]) -> Option<T> {
    candidates
        .iter()
        .find_map(|pointer| decode(value.pointer(pointer)?))
}

fn decode<T: DeserializeOwned>(value: &Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}
