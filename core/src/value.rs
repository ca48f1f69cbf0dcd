//! Immutable state tree with structural sharing
//!
//! [`Value`] is the state type every reducer in this crate operates on. It
//! mirrors the JSON data model, but containers are held behind [`Arc`] so
//! that cloning a value is O(1) and keeps its identity. Updates build new
//! containers only along the path of the change and reuse every other
//! sub-tree by reference, which lets consumers detect changes with
//! [`Value::same`] instead of a deep comparison.
//!
//! # Example
//!
//! ```
//! use modux_core::Value;
//! use serde_json::json;
//!
//! let state = Value::from(json!({"user": {"name": "Ada"}, "count": 1}));
//! let copy = state.clone();
//!
//! assert!(state.same(&copy));
//! assert_eq!(state.get("count").and_then(Value::as_i64), Some(1));
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Mapping node of a [`Value`] tree
pub type Map = BTreeMap<String, Value>;

/// A node in an immutable, structurally shared state tree
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Absent / null value
    #[default]
    Null,
    /// Boolean leaf
    Bool(bool),
    /// Numeric leaf (integer or float)
    Number(serde_json::Number),
    /// String leaf
    String(Arc<str>),
    /// Ordered list, treated as an opaque value by merges
    Array(Arc<Vec<Value>>),
    /// Keyed mapping, the only node merges recurse into
    Map(Arc<Map>),
}

impl Value {
    /// An empty mapping
    #[must_use]
    pub fn empty_map() -> Self {
        Self::Map(Arc::new(Map::new()))
    }

    /// Build a mapping from an owned [`Map`]
    #[must_use]
    pub fn from_map(map: Map) -> Self {
        Self::Map(Arc::new(map))
    }

    /// Build an array from owned items
    #[must_use]
    pub fn from_vec(items: Vec<Self>) -> Self {
        Self::Array(Arc::new(items))
    }

    /// Reference identity
    ///
    /// Maps and arrays compare by pointer; leaves (strings included) compare
    /// by value since they carry no identity of their own. Two values that are
    /// `same` are always equal, but not the other way round.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Map(a), Self::Map(b)) => Arc::ptr_eq(a, b),
            (Self::Array(a), Self::Array(b)) => Arc::ptr_eq(a, b),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            _ => false,
        }
    }

    /// Short name of the node kind, used in diagnostics
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
        }
    }

    /// Whether this is [`Value::Null`]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this is a mapping
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    /// Borrow the mapping, if this is one
    #[must_use]
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(map) => Some(&**map),
            _ => None,
        }
    }

    /// Borrow the array items, if this is an array
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Borrow the string, if this is a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(&**s),
            _ => None,
        }
    }

    /// Read as `i64`, if this is an integral number
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Read as `f64`, if this is a number
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Read as `bool`, if this is a boolean
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Look up a key of a mapping
    ///
    /// Returns `None` for missing keys and for non-mapping values.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_map().and_then(|map| map.get(key))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serde_json::Value::from(self))
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(Arc::from(s)),
            serde_json::Value::Array(items) => {
                Self::from_vec(items.into_iter().map(Self::from).collect())
            },
            serde_json::Value::Object(map) => Self::from_map(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => Self::Number(n.clone()),
            Value::String(s) => Self::String(s.to_string()),
            Value::Array(items) => Self::Array(items.iter().map(Self::from).collect()),
            Value::Map(map) => Self::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        Self::from(&value)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Self::from_map(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::from_vec(items)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::from_map(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => serializer.collect_seq(items.iter()),
            Self::Map(map) => serializer.collect_map(map.iter()),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}
