//! Runtime values.
//!
//! This module defines the `Value` type which represents a single typed
//! value inside a row. Values double as partition-key components, so they
//! must support equality and hashing across every variant.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::schema::DataType;

/// A single runtime value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL value.
    Null,
    /// Boolean value.
    Boolean(bool),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    BigInt(i64),
    /// 64-bit floating point.
    Double(f64),
    /// String value.
    String(String),
    /// Binary data.
    Bytes(Vec<u8>),
    /// Date (days since epoch).
    Date(i32),
    /// Timestamp (microseconds since epoch).
    Timestamp(i64),
}

impl Value {
    /// Creates a NULL value.
    pub fn null() -> Self {
        Value::Null
    }

    /// Creates a boolean value.
    pub fn boolean(v: bool) -> Self {
        Value::Boolean(v)
    }

    /// Creates an integer value.
    pub fn int(v: i32) -> Self {
        Value::Int(v)
    }

    /// Creates a bigint value.
    pub fn bigint(v: i64) -> Self {
        Value::BigInt(v)
    }

    /// Creates a double value.
    pub fn double(v: f64) -> Self {
        Value::Double(v)
    }

    /// Creates a string value.
    pub fn string(v: impl Into<String>) -> Self {
        Value::String(v.into())
    }

    /// Creates a bytes value.
    pub fn bytes(v: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(v.into())
    }

    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the data type of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Text, // NULL can be any type
            Value::Boolean(_) => DataType::Boolean,
            Value::Int(_) => DataType::Int,
            Value::BigInt(_) => DataType::BigInt,
            Value::Double(_) => DataType::Double,
            Value::String(_) => DataType::Text,
            Value::Bytes(_) => DataType::Blob,
            Value::Date(_) => DataType::Date,
            Value::Timestamp(_) => DataType::Timestamp,
        }
    }
}

// Values are used as partition-key components, which requires Eq + Hash.
// Doubles hash by bit pattern, matching the derived same-variant equality.
impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Boolean(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::BigInt(i) => i.hash(state),
            Value::Double(f) => f.to_bits().hash(state),
            Value::String(s) => s.hash(state),
            Value::Bytes(b) => b.hash(state),
            Value::Date(d) => d.hash(state),
            Value::Timestamp(t) => t.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Value::Int(i) => write!(f, "{}", i),
            Value::BigInt(i) => write!(f, "{}", i),
            Value::Double(v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "{}", s),
            Value::Bytes(b) => {
                write!(f, "0x")?;
                for byte in b {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
            Value::Date(d) => write!(f, "{}", d),
            Value::Timestamp(t) => write!(f, "{}", t),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_value_constructors() {
        assert_eq!(Value::int(42), Value::Int(42));
        assert_eq!(Value::string("x"), Value::String("x".to_string()));
        assert!(Value::null().is_null());
        assert!(!Value::boolean(false).is_null());
    }

    #[test]
    fn test_value_data_type() {
        assert_eq!(Value::int(1).data_type(), DataType::Int);
        assert_eq!(Value::bigint(1).data_type(), DataType::BigInt);
        assert_eq!(Value::string("a").data_type(), DataType::Text);
        assert_eq!(Value::Date(19000).data_type(), DataType::Date);
    }

    #[test]
    fn test_value_equality_is_strict_per_variant() {
        assert_ne!(Value::Int(1), Value::BigInt(1));
        assert_eq!(Value::Int(1), Value::Int(1));
        assert_ne!(Value::Null, Value::Int(0));
    }

    #[test]
    fn test_value_as_map_key() {
        let mut map = HashMap::new();
        map.insert(Value::string("k1"), 1);
        map.insert(Value::double(1.5), 2);
        assert_eq!(map.get(&Value::string("k1")), Some(&1));
        assert_eq!(map.get(&Value::double(1.5)), Some(&2));
        assert_eq!(map.get(&Value::double(2.5)), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::int(7).to_string(), "7");
        assert_eq!(Value::string("hi").to_string(), "hi");
        assert_eq!(Value::bytes(vec![0xab, 0x01]).to_string(), "0xab01");
    }
}
