use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Key-value mapping stored as a single object. Keys iterate in sorted order.
pub type Mapping = BTreeMap<String, Value>;

/// A dynamic, self-describing value.
///
/// Every payload the store serializes is a `Value`. The variant tag travels
/// with the data, so a reader can check the shape of what it decoded before
/// using it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Map(Mapping),
}

/// The shape (variant) of a [`Value`], used for typed reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    List,
    Map,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Str => write!(f, "str"),
            Self::Bytes => write!(f, "bytes"),
            Self::List => write!(f, "list"),
            Self::Map => write!(f, "map"),
        }
    }
}

impl Value {
    /// The shape of this value.
    pub fn shape(&self) -> Shape {
        match self {
            Self::Null => Shape::Null,
            Self::Bool(_) => Shape::Bool,
            Self::Int(_) => Shape::Int,
            Self::Float(_) => Shape::Float,
            Self::Str(_) => Shape::Str,
            Self::Bytes(_) => Shape::Bytes,
            Self::List(_) => Shape::List,
            Self::Map(_) => Shape::Map,
        }
    }

    /// Return `self` if it has the `expected` shape.
    pub fn expect_shape(self, expected: Shape) -> Result<Self, TypeError> {
        let found = self.shape();
        if found == expected {
            Ok(self)
        } else {
            Err(TypeError::TypeMismatch { expected, found })
        }
    }

    /// Unwrap a mapping, failing with `TypeMismatch` for any other shape.
    pub fn into_map(self) -> Result<Mapping, TypeError> {
        match self {
            Self::Map(map) => Ok(map),
            other => Err(TypeError::TypeMismatch {
                expected: Shape::Map,
                found: other.shape(),
            }),
        }
    }

    /// Look up `key` if this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

impl From<Mapping> for Value {
    fn from(v: Mapping) -> Self {
        Self::Map(v)
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(v: Option<V>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_of_each_variant() {
        assert_eq!(Value::Null.shape(), Shape::Null);
        assert_eq!(Value::from(true).shape(), Shape::Bool);
        assert_eq!(Value::from(1).shape(), Shape::Int);
        assert_eq!(Value::from(1.5).shape(), Shape::Float);
        assert_eq!(Value::from("x").shape(), Shape::Str);
        assert_eq!(Value::from(vec![1u8, 2]).shape(), Shape::Bytes);
        assert_eq!(Value::from(vec![Value::Null]).shape(), Shape::List);
        assert_eq!(Value::from(Mapping::new()).shape(), Shape::Map);
    }

    #[test]
    fn expect_shape_mismatch() {
        let err = Value::List(vec![]).expect_shape(Shape::Map).unwrap_err();
        assert_eq!(
            err,
            TypeError::TypeMismatch {
                expected: Shape::Map,
                found: Shape::List,
            }
        );
        assert!(Value::from(3).expect_shape(Shape::Int).is_ok());
    }

    #[test]
    fn into_map_and_get() {
        let value: Value = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(value.get("a").and_then(Value::as_i64), Some(1));
        assert!(value.get("missing").is_none());

        let map = value.into_map().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "b"]);

        assert!(Value::from("x").into_map().is_err());
    }

    #[test]
    fn option_conversion() {
        assert!(Value::from(None::<i64>).is_null());
        assert_eq!(Value::from(Some("s")).as_str(), Some("s"));
    }

    #[test]
    fn shape_display() {
        assert_eq!(Shape::Map.to_string(), "map");
        assert_eq!(Shape::Bytes.to_string(), "bytes");
    }
}
