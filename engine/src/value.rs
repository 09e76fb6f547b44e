//! FILENAME: engine/src/value.rs
//! PURPOSE: The runtime object graph handed to the flatten engine.
//! CONTEXT: A `Value` is either absent, a scalar leaf, a sequence, or a
//! record instance. Records carry their type name so the schema registry
//! can be consulted during flattening.

use crate::scalar::Scalar;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A node in the input object graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// The absence of a value (a null field, a missing sequence element).
    Absent,
    Scalar(Scalar),
    Seq(Vec<Value>),
    Record(RecordValue),
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordValue> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }
}

/// An instance of a registered record type: the type name plus a field map.
/// Built with the chainable [`RecordValue::set`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordValue {
    type_name: String,
    fields: HashMap<String, Value>,
}

impl RecordValue {
    pub fn new(type_name: impl Into<String>) -> Self {
        RecordValue {
            type_name: type_name.into(),
            fields: HashMap::new(),
        }
    }

    /// Sets a field value and returns `self` for chaining.
    pub fn set(mut self, identifier: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(identifier.into(), value.into());
        self
    }

    /// The field's value, or None if it was never set.
    /// Unset and explicitly absent fields flatten identically.
    pub fn get(&self, identifier: &str) -> Option<&Value> {
        self.fields.get(identifier)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl From<RecordValue> for Value {
    fn from(record: RecordValue) -> Self {
        Value::Record(record)
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<crate::scalar::RichText> for Value {
    fn from(value: crate::scalar::RichText) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<chrono::DateTime<chrono::Utc>> for Value {
    fn from(value: chrono::DateTime<chrono::Utc>) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<chrono::NaiveDate> for Value {
    fn from(value: chrono::NaiveDate) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<chrono::NaiveDateTime> for Value {
    fn from(value: chrono::NaiveDateTime) -> Self {
        Value::Scalar(value.into())
    }
}

impl From<chrono::DateTime<chrono::FixedOffset>> for Value {
    fn from(value: chrono::DateTime<chrono::FixedOffset>) -> Self {
        Value::Scalar(value.into())
    }
}

/// None becomes Absent; Some converts the inner value.
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => Value::Absent,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }
}
