//! Attribute values used in unique-index lookups.

use std::fmt;

/// Value of a single entity attribute.
///
/// Rendering through `Display` is the canonical form used inside cache keys,
/// so it must match how the entity exposes the field. An enum attribute
/// renders by its external name, which means `Enum("active")` and
/// `Str("active")` produce the same key segment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AttributeValue {
    Str(String),
    Int(i64),
    Bool(bool),
    /// Enum-like value, carried by its canonical external name.
    Enum(String),
}

impl AttributeValue {
    /// Build an enum value from its external name.
    pub fn enumeration(name: impl Into<String>) -> Self {
        AttributeValue::Enum(name.into())
    }

    /// Compare by canonical rendering.
    ///
    /// Used when a query value is checked against an entity value: a caller
    /// may pass `Str("active")` for an attribute the entity reports as
    /// `Enum("active")`.
    pub fn same_rendering(&self, other: &AttributeValue) -> bool {
        match (self, other) {
            (AttributeValue::Int(a), AttributeValue::Int(b)) => a == b,
            (AttributeValue::Bool(a), AttributeValue::Bool(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Str(s) | AttributeValue::Enum(s) => f.write_str(s),
            AttributeValue::Int(i) => write!(f, "{}", i),
            AttributeValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Str(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Str(v)
    }
}

impl From<&String> for AttributeValue {
    fn from(v: &String) -> Self {
        AttributeValue::Str(v.clone())
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        AttributeValue::Int(i64::from(v))
    }
}

impl From<u32> for AttributeValue {
    fn from(v: u32) -> Self {
        AttributeValue::Int(i64::from(v))
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}
