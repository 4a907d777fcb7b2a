//! Query-string flattening.
//!
//! The query store is a JSON object; the wire wants flat `key=value` pairs.
//! Strings go out verbatim, numbers and booleans as their JSON text, arrays
//! as repeated keys and nested objects as `key[sub]`. Nulls are dropped.

use meridian_core::RawStore;
use serde_json::Value;

/// Flatten a query store into ordered pairs, in store order.
pub fn flatten(store: &RawStore) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(store.len());
    for (key, value) in store.iter() {
        push_value(&mut pairs, key.to_string(), value);
    }
    pairs
}

fn push_value(pairs: &mut Vec<(String, String)>, key: String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                push_value(pairs, key.clone(), item);
            }
        }
        Value::Object(entries) => {
            for (sub, item) in entries {
                push_value(pairs, format!("{key}[{sub}]"), item);
            }
        }
        scalar => {
            if let Some(text) = scalar_text(scalar) {
                pairs.push((key, text));
            }
        }
    }
}

/// Text form of a JSON value as it appears in a query, header or form field.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
