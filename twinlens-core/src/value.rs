//! Typed property values
//!
//! The remote API models a property value as a struct with one nullable
//! field per kind. Here that is a closed tagged union; the externally
//! tagged serde representation matches the wire shape
//! (`{"doubleValue": 1.5}`, `{"stringValue": "x"}`, ...).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single property value of any supported kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    #[serde(rename = "booleanValue")]
    Boolean(bool),
    #[serde(rename = "doubleValue")]
    Double(f64),
    #[serde(rename = "integerValue")]
    Integer(i32),
    #[serde(rename = "longValue")]
    Long(i64),
    #[serde(rename = "stringValue")]
    Str(String),
    #[serde(rename = "listValue")]
    List(Vec<DataValue>),
    #[serde(rename = "mapValue")]
    Map(BTreeMap<String, DataValue>),
}

impl DataValue {
    /// Render the value as a plain string.
    ///
    /// This is the single conversion used by cache keys, identity keys
    /// and the frame layer, so every kind renders the same way
    /// everywhere. Lists and maps render as compact JSON.
    pub fn display_string(&self) -> String {
        match self {
            DataValue::Boolean(v) => v.to_string(),
            DataValue::Double(v) => v.to_string(),
            DataValue::Integer(v) => v.to_string(),
            DataValue::Long(v) => v.to_string(),
            DataValue::Str(v) => v.clone(),
            DataValue::List(v) => serde_json::to_string(v).unwrap_or_default(),
            DataValue::Map(v) => serde_json::to_string(v).unwrap_or_default(),
        }
    }

    /// Return the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for DataValue {
    fn from(v: &str) -> Self {
        DataValue::Str(v.to_string())
    }
}

impl From<String> for DataValue {
    fn from(v: String) -> Self {
        DataValue::Str(v)
    }
}

impl From<bool> for DataValue {
    fn from(v: bool) -> Self {
        DataValue::Boolean(v)
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        DataValue::Double(v)
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        DataValue::Long(v)
    }
}
