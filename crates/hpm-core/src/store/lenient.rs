//! Field-level fallbacks for reading stored state.
//!
//! Each helper first captures the raw JSON value, then tries to read it as the
//! target type. A value with the wrong shape is replaced by the field's zero
//! value instead of failing the whole record. Sequences and date-keyed maps go
//! one step further and drop only the elements that do not parse.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::warn;

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Read `T`, or `T::default()` when the stored value has the wrong shape.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Value::deserialize(deserializer)?;
    if raw.is_null() {
        return Ok(T::default());
    }
    match serde_json::from_value::<T>(raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!(
                "state: malformed {} field, using default: {}",
                short_type_name::<T>(),
                e
            );
            Ok(T::default())
        }
    }
}

/// Read a list, keeping every element that parses.
pub fn seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Value::deserialize(deserializer)?;
    let items = match raw {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            warn!(
                "state: expected list of {}, found {}; using empty list",
                short_type_name::<T>(),
                json_kind(&other)
            );
            return Ok(Vec::new());
        }
    };

    let total = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if kept.len() < total {
        warn!(
            "state: dropped {} malformed {} entries",
            total - kept.len(),
            short_type_name::<T>()
        );
    }
    Ok(kept)
}

/// Read a string-keyed map, keeping every entry whose key and value parse.
pub fn map<'de, D, K, V>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
where
    D: Deserializer<'de>,
    K: FromStr + Ord,
    V: DeserializeOwned,
{
    let raw = Value::deserialize(deserializer)?;
    let entries = match raw {
        Value::Object(entries) => entries,
        Value::Null => return Ok(BTreeMap::new()),
        other => {
            warn!(
                "state: expected map of {}, found {}; using empty map",
                short_type_name::<V>(),
                json_kind(&other)
            );
            return Ok(BTreeMap::new());
        }
    };

    let total = entries.len();
    let kept: BTreeMap<K, V> = entries
        .into_iter()
        .filter_map(|(key, value)| {
            let key = key.parse::<K>().ok()?;
            let value = serde_json::from_value::<V>(value).ok()?;
            Some((key, value))
        })
        .collect();

    if kept.len() < total {
        warn!(
            "state: dropped {} malformed {} map entries",
            total - kept.len(),
            short_type_name::<V>()
        );
    }
    Ok(kept)
}

/// Dark mode is on unless the record says otherwise.
pub fn dark_mode<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(raw.as_bool().unwrap_or_else(default_dark_mode))
}

pub fn default_dark_mode() -> bool {
    true
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
