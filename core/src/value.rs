//! Value types for participant attributes.
//!
//! Values are the atomic data exposed by a participant's attribute view.
//! Economic records only hold numbers and flags, so the set of scalar types
//! is small: Bool, Int and Float, plus Null for absent readings.

use std::collections::BTreeMap;
use std::fmt;

use crate::{CoreError, CoreResult};

/// A value that can be stored in an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/missing value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
}

impl Value {
    /// Get as a number, widening integers to f64.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Type alias for attribute storage.
///
/// Ordered so that rendering and equality checks are deterministic.
pub type Attributes = BTreeMap<String, Value>;

/// Typed lookups over an attribute map.
pub trait AttributesExt {
    /// Read a numeric attribute.
    fn number(&self, name: &str) -> CoreResult<f64>;
}

impl AttributesExt for Attributes {
    fn number(&self, name: &str) -> CoreResult<f64> {
        let value = self
            .get(name)
            .ok_or_else(|| CoreError::attribute_not_found("attributes", name))?;
        value
            .as_number()
            .ok_or_else(|| CoreError::type_mismatch(name, "Float", value.type_name()))
    }
}

/// Helper macro to create attribute maps.
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::Attributes::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut map = $crate::Attributes::new();
            $(
                map.insert($key.to_string(), $crate::Value::from($value));
            )+
            map
        }
    };
}
