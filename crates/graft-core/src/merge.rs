//! Deep merge and the namespaced configuration accumulator

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Deep merge `incoming` into `base`.
///
/// If both values are objects, merge them recursively with `incoming`
/// taking precedence. Otherwise `incoming` replaces `base` wholesale; in
/// particular arrays are replaced, never concatenated.
pub fn deep_merge(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(incoming_map)) => {
            for (key, incoming_val) in incoming_map {
                match base_map.get_mut(key) {
                    Some(base_val) => deep_merge(base_val, incoming_val),
                    None => {
                        base_map.insert(key.clone(), incoming_val.clone());
                    }
                }
            }
        }
        (base, incoming) => {
            *base = incoming.clone();
        }
    }
}

/// The merged configuration, keyed by package namespace.
///
/// Returned to the caller by value; entries may be modified, replaced or
/// nulled out freely afterwards. Namespaces keep the order in which they
/// were first merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedConfig {
    namespaces: Map<String, Value>,
}

impl ResolvedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `value` into the namespace `name`.
    ///
    /// An absent or null namespace starts from an empty object, so the
    /// first contribution for a namespace is copied as-is when it is an
    /// object.
    pub fn merge_namespace(&mut self, name: &str, value: &Value) {
        let slot = self
            .namespaces
            .entry(name.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if slot.is_null() {
            *slot = Value::Object(Map::new());
        }
        deep_merge(slot, value);
    }

    /// Replace the namespace `name` wholesale.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.namespaces.insert(name.into(), value)
    }

    /// Null out a namespace, keeping its key.
    pub fn set_null(&mut self, name: &str) {
        self.namespaces.insert(name.to_string(), Value::Null);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.namespaces.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.namespaces.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.namespaces.get_mut(name)
    }

    /// Look up a value by JSON pointer, where the first segment is the
    /// namespace (e.g. `/cli-package2/Listen/Port`).
    ///
    /// Segments use RFC 6901 escaping, so the scoped namespace `@acme/auth`
    /// is addressed as `/@acme~1auth`.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        let rest = pointer.strip_prefix('/')?;
        let (segment, path) = match rest.find('/') {
            Some(index) => rest.split_at(index),
            None => (rest, ""),
        };
        let namespace = segment.replace("~1", "/").replace("~0", "~");
        self.namespaces.get(&namespace)?.pointer(path)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.namespaces.contains_key(name)
    }

    /// Namespace names in merge order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.namespaces.clone())
    }
}

impl From<Map<String, Value>> for ResolvedConfig {
    fn from(namespaces: Map<String, Value>) -> Self {
        Self { namespaces }
    }
}
