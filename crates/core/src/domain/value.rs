// Storage-side values

use super::datetime::DateTimeValue;
use std::fmt;

/// A value as seen at the storage boundary.
///
/// Drivers hand back text, numbers, or values they have already
/// materialized as date-times; the application hands in date-times or nulls.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Integer(i64),
    Real(f64),
    Blob(Vec<u8>),
    DateTime(DateTimeValue),
}

impl Value {
    /// Name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Blob(_) => "blob",
            Value::DateTime(_) => "DateTime",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_datetime(self) -> Option<DateTimeValue> {
        match self {
            Value::DateTime(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Text(s) => write!(f, "{}", s),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Blob(b) => write!(f, "<{} bytes>", b.len()),
            Value::DateTime(v) => write!(f, "{}", v),
        }
    }
}

impl From<DateTimeValue> for Value {
    fn from(value: DateTimeValue) -> Self {
        Value::DateTime(value)
    }
}

impl From<Option<DateTimeValue>> for Value {
    fn from(value: Option<DateTimeValue>) -> Self {
        value.map_or(Value::Null, Value::DateTime)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}
