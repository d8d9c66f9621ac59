use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::slice;

/// A node of the structured payload carried by result and async records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Const(String),
    Tuple(Results),
    List(Vec<Value>),
    /// A `name=value` list element, as in `[frame={..},frame={..}]`.
    /// Only ever found directly inside a `List`.
    Keyed(String, Box<Value>),
}

impl Value {
    pub fn as_const(&self) -> Option<&str> {
        match self {
            Value::Const(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&Results> {
        match self {
            Value::Tuple(results) => Some(results),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Field lookup in a tuple, or the payload of a keyed list element
    /// named `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Tuple(results) => results.get(key),
            Value::Keyed(name, inner) if name == key => Some(inner),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_const)
    }

    /// The elements of a list, or the value itself for anything else.
    ///
    /// Fields such as `bkpt` arrive either as a single tuple or as a merged
    /// list of tuples; this lets callers treat both shapes uniformly.
    pub fn items(&self) -> &[Value] {
        match self {
            Value::List(items) => items,
            other => slice::from_ref(other),
        }
    }

    /// For a keyed list element return its payload, otherwise the value
    /// itself.
    pub fn unkeyed(&self) -> &Value {
        match self {
            Value::Keyed(_, inner) => inner,
            other => other,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Const(text) => serializer.serialize_str(text),
            Value::Tuple(results) => results.serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Keyed(name, inner) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(name, inner)?;
                map.end()
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Const(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Const(s)
    }
}

/// Ordered `name -> Value` mapping with unique names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Results {
    entries: Vec<(String, Value)>,
}

impl Results {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_const)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace, keeping the original position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    pub fn value_at_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.entries.get_mut(index).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Results {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut results = Results::new();
        for (k, v) in iter {
            results.insert(k, v);
        }
        results
    }
}

impl Serialize for Results {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
