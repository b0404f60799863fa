//! Dynamic Value Model
//!
//! Arguments and results cross the method channel as dynamically typed
//! values. `Value` mirrors the host codec's tagged union; JSON is the
//! concrete encoding used by the bundled socket host.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A dynamically typed channel value.
///
/// Variant order matters for decoding: integers that fit in 32 bits decode
/// as `Int`, wider ones as `Long`, anything fractional as `Double`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a field when this value is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }
}

/// Decode a list of channel integers into raw bytes.
///
/// Only 32-bit ints are taken, cast to their low byte the way the host
/// codec does. Anything else is skipped without error; order is kept.
pub fn decode_byte_list(items: &[Value]) -> Vec<u8> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::Int(v) => Some(*v as u8),
            _ => None,
        })
        .collect()
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

/// Build a `Value::Map` from `key => value` pairs.
#[macro_export]
macro_rules! value_map {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut map = ::std::collections::BTreeMap::<String, $crate::domain::value::Value>::new();
        $(map.insert($key.to_string(), $crate::domain::value::Value::from($value));)*
        $crate::domain::value::Value::Map(map)
    }};
}
