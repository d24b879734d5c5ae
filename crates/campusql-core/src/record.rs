//! Flat records and their primitive values.

use crate::schema::{Field, FieldType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A primitive record value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Any JSON number
    Number(f64),
    /// Any JSON string
    Text(String),
}

impl Value {
    /// Returns the number if this is a numeric value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    /// Returns the string if this is a textual value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Number(_) => None,
            Value::Text(s) => Some(s),
        }
    }

    /// Whether this value belongs to the given field domain.
    pub fn matches_type(&self, field_type: FieldType) -> bool {
        matches!(
            (self, field_type),
            (Value::Number(_), FieldType::Numeric) | (Value::Text(_), FieldType::Textual)
        )
    }

    /// Hashable identity of the value, used for grouping and distinct counts.
    pub(crate) fn identity(&self) -> ValueIdentity {
        match self {
            // 0.0 and -0.0 compare equal and must land in the same bucket
            Value::Number(n) if *n == 0.0 => ValueIdentity::Number(0),
            Value::Number(n) => ValueIdentity::Number(n.to_bits()),
            Value::Text(s) => ValueIdentity::Text(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ValueIdentity {
    Number(u64),
    Text(String),
}

/// A flat record: storage key to value.
///
/// Entries that are neither numbers nor strings are dropped when a record
/// is decoded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "serde_json::Map<String, serde_json::Value>",
    into = "BTreeMap<String, Value>"
)]
pub struct Record {
    values: HashMap<String, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert under a raw storage key.
    pub fn with(mut self, storage_key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(storage_key.into(), value.into());
        self
    }

    /// Inserts a value under a raw storage key.
    pub fn insert(&mut self, storage_key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(storage_key.into(), value.into());
    }

    /// Looks a field up through its storage key.
    pub fn get(&self, field: Field) -> Option<&Value> {
        self.values.get(field.storage_key())
    }

    /// Looks a raw storage key up.
    pub fn get_raw(&self, storage_key: &str) -> Option<&Value> {
        self.values.get(storage_key)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the record stores nothing.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Record {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        let values = map
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::Number(n) => n.as_f64().map(|n| (key, Value::Number(n))),
                serde_json::Value::String(s) => Some((key, Value::Text(s))),
                _ => None,
            })
            .collect();
        Record { values }
    }
}

impl From<Record> for BTreeMap<String, Value> {
    fn from(record: Record) -> Self {
        record.values.into_iter().collect()
    }
}
