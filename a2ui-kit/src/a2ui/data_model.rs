//! A2UI Data Model
//!
//! Each surface owns a tree of JSON values addressed by slash-delimited
//! paths. `dataModelUpdate` messages carry an adjacency-list encoding of a
//! subtree that is decoded and merged in at a path.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// A path-addressable JSON tree.
///
/// # Path Format
///
/// - `` or `/` - root
/// - `/foo` - property "foo"
/// - `/foo/bar` - nested property
/// - `/items/0` - array element at index 0
///
/// # Example
///
/// ```rust,ignore
/// let mut model = DataModel::new();
/// model.merge_at("/user", json!({"name": "Alice"}));
/// assert_eq!(model.get_string("/user/name"), Some("Alice"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataModel {
    /// The root value, always an object
    data: Value,

    /// Bumped on every merge
    version: u64,
}

impl Default for DataModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DataModel {
    /// Create a new empty data model
    pub fn new() -> Self {
        DataModel {
            data: Value::Object(Map::new()),
            version: 0,
        }
    }

    /// Create a data model with initial data. Non-object data is ignored.
    pub fn with_data(data: Value) -> Self {
        match data {
            Value::Object(_) => DataModel { data, version: 0 },
            _ => Self::new(),
        }
    }

    /// Get the current version number
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get the entire data as a Value
    pub fn as_value(&self) -> &Value {
        &self.data
    }

    /// Get a value at the given path. Any missing step yields `None`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.data;
        for segment in parse_path(path) {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Get a string value at the given path
    pub fn get_string(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }

    /// Get a number value at the given path
    pub fn get_number(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(|v| v.as_f64())
    }

    /// Get a boolean value at the given path
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(|v| v.as_bool())
    }

    /// Get an array value at the given path
    pub fn get_array(&self, path: &str) -> Option<&Vec<Value>> {
        self.get(path).and_then(|v| v.as_array())
    }

    /// Merge `value` into the model at `path`.
    ///
    /// At the root the merge is a shallow key-wise assign. Anywhere else the
    /// target is replaced and missing intermediate levels are created as
    /// objects; siblings of the target are left alone.
    pub fn merge_at(&mut self, path: &str, value: Value) {
        let segments = parse_path(path);
        self.version += 1;

        let Some((last, parents)) = segments.split_last() else {
            match value {
                Value::Object(entries) => {
                    if let Value::Object(root) = &mut self.data {
                        root.extend(entries);
                    }
                }
                other => {
                    log::debug!("[A2UI data] Ignoring non-object root merge: {}", other);
                }
            }
            return;
        };

        let mut current = &mut self.data;
        for segment in parents {
            current = child_container(current, segment);
        }

        let index = match &*current {
            Value::Array(items) => last.parse::<usize>().ok().filter(|i| *i <= items.len()),
            _ => None,
        };
        match (current, index) {
            (Value::Array(items), Some(index)) if index == items.len() => items.push(value),
            (Value::Array(items), Some(index)) => items[index] = value,
            (other, _) => {
                ensure_object(other).insert(last.to_string(), value);
            }
        }
    }

    /// Decode `entries` and merge them at `path` (see [`merge_at`](Self::merge_at)).
    pub fn apply_entries(&mut self, path: &str, entries: &[DataEntry]) {
        self.merge_at(path, Value::Object(decode_entries(entries)));
    }
}

/// Split a path into segments; `` and `/` are the root.
fn parse_path(path: &str) -> Vec<&str> {
    if path.is_empty() || path == "/" {
        return vec![];
    }
    path.strip_prefix('/').unwrap_or(path).split('/').collect()
}

/// Step into `segment`, creating an object level when it is missing.
fn child_container<'a>(current: &'a mut Value, segment: &str) -> &'a mut Value {
    let index = match &*current {
        Value::Array(items) => segment.parse::<usize>().ok().filter(|i| *i < items.len()),
        _ => None,
    };
    match (current, index) {
        (Value::Array(items), Some(index)) => &mut items[index],
        (other, _) => ensure_object(other)
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new())),
    }
}

/// Turn `value` into an object in place if it is anything else.
fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        log::debug!("[A2UI data] Replacing non-object value with an object: {}", value);
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}

/// Lenient f64 deserializer: accepts numbers, ignores other types.
pub(crate) fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.and_then(|v| v.as_f64()))
}

/// Lenient number deserializer: keeps the number as written (42 stays an
/// integer), ignores other types.
fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Number>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.and_then(|v| match v {
        Value::Number(n) => Some(n),
        _ => None,
    }))
}

/// Lenient string deserializer: accepts strings, ignores other types.
pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.and_then(|v| match v {
        Value::String(s) => Some(s),
        _ => None,
    }))
}

/// Lenient bool deserializer: accepts booleans, ignores other types.
fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.and_then(|v| v.as_bool()))
}

/// Lenient entry list deserializer: drops elements that are not entries.
pub(crate) fn lenient_entries<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<Vec<DataEntry>>, D::Error> {
    let Some(Value::Array(items)) = Option::<Value>::deserialize(d)? else {
        return Ok(None);
    };
    Ok(Some(
        items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
    ))
}

/// One node of the adjacency-list encoding used by `dataModelUpdate`.
///
/// ```json
/// {"key": "name", "valueString": "Alice"}
/// {"key": "user", "valueMap": [{"key": "age", "valueNumber": 30}]}
/// ```
///
/// LLMs regularly put the wrong type in a value field; such fields are
/// dropped instead of failing the whole update.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub key: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,

    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub value_number: Option<Number>,

    #[serde(default, deserialize_with = "lenient_bool", skip_serializing_if = "Option::is_none")]
    pub value_boolean: Option<bool>,

    /// Nested object
    #[serde(default, deserialize_with = "lenient_entries", skip_serializing_if = "Option::is_none")]
    pub value_map: Option<Vec<DataEntry>>,

    /// List whose elements are keyed entries; each becomes a one-key object
    #[serde(default, deserialize_with = "lenient_entries", skip_serializing_if = "Option::is_none")]
    pub value_list: Option<Vec<DataEntry>>,

    /// List whose elements are bare (unkeyed) values
    #[serde(default, deserialize_with = "lenient_entries", skip_serializing_if = "Option::is_none")]
    pub value_array: Option<Vec<DataEntry>>,
}

impl DataEntry {
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        DataEntry {
            key: Some(key.into()),
            value_string: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn number(key: impl Into<String>, value: impl Into<Number>) -> Self {
        DataEntry {
            key: Some(key.into()),
            value_number: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn map(key: impl Into<String>, entries: Vec<DataEntry>) -> Self {
        DataEntry {
            key: Some(key.into()),
            value_map: Some(entries),
            ..Default::default()
        }
    }

    /// The decoded value, ignoring the key. First populated field wins.
    pub fn value(&self) -> Option<Value> {
        if let Some(s) = &self.value_string {
            return Some(Value::String(s.clone()));
        }
        if let Some(n) = &self.value_number {
            return Some(Value::Number(n.clone()));
        }
        if let Some(b) = self.value_boolean {
            return Some(Value::Bool(b));
        }
        if let Some(entries) = &self.value_map {
            return Some(Value::Object(decode_entries(entries)));
        }
        if let Some(entries) = &self.value_list {
            return Some(Value::Array(
                entries
                    .iter()
                    .map(|entry| Value::Object(decode_entries(std::slice::from_ref(entry))))
                    .collect(),
            ));
        }
        if let Some(entries) = &self.value_array {
            return Some(Value::Array(
                entries.iter().map(|e| e.value().unwrap_or(Value::Null)).collect(),
            ));
        }
        None
    }
}

/// Decode an adjacency list into an object. Entries without a key or
/// without any value field are skipped.
pub fn decode_entries(entries: &[DataEntry]) -> Map<String, Value> {
    let mut map = Map::new();
    for entry in entries {
        let Some(key) = entry.key.as_deref().filter(|k| !k.is_empty()) else {
            continue;
        };
        if let Some(value) = entry.value() {
            map.insert(key.to_string(), value);
        }
    }
    map
}
