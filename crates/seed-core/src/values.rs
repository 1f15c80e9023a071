//! Generated values and rows.
//!
//! `GeneratedValue` is the type-agnostic value produced by the generators.
//! Store implementations convert it to their native parameter types.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use serde_yaml::Value as YamlValue;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Raw generated value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GeneratedValue {
    /// Null value
    Null,

    /// Boolean value
    Bool(bool),

    /// Integer that fits a JavaScript-safe / 64-bit column
    Int(i64),

    /// Integer of a bigint column
    BigInt(i128),

    /// Floating point value
    Float(f64),

    /// Fixed-point decimal rendered with its scale
    Decimal(String),

    /// String value
    String(String),

    /// Binary data
    Bytes(Vec<u8>),

    /// UUID value
    Uuid(Uuid),

    /// Calendar date
    Date(NaiveDate),

    /// Time of day
    Time(NaiveTime),

    /// Timestamp without timezone
    DateTime(NaiveDateTime),

    /// JSON document
    Json(serde_json::Value),

    /// Array of values
    Array(Vec<GeneratedValue>),

    /// Object/map of values
    Object(BTreeMap<String, GeneratedValue>),
}

impl GeneratedValue {
    /// Convert a YAML value (column defaults, refinement literals) to a value.
    pub fn from_yaml(yaml: &YamlValue) -> Self {
        match yaml {
            YamlValue::Null => Self::Null,
            YamlValue::Bool(b) => Self::Bool(*b),
            YamlValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Self::Float(f)
                } else {
                    Self::String(n.to_string())
                }
            }
            YamlValue::String(s) => Self::String(s.clone()),
            YamlValue::Sequence(arr) => Self::Array(arr.iter().map(Self::from_yaml).collect()),
            YamlValue::Mapping(map) => Self::Object(
                map.iter()
                    .filter_map(|(k, v)| Some((k.as_str()?.to_string(), Self::from_yaml(v))))
                    .collect(),
            ),
            YamlValue::Tagged(tagged) => Self::from_yaml(&tagged.value),
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Integer view of the value, if it holds one that fits in an `i128`.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Self::Int(i) => Some(*i as i128),
            Self::BigInt(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Decimal(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as an array.
    pub fn as_array(&self) -> Option<&Vec<GeneratedValue>> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// A stable textual key, used to compare values for uniqueness checks.
    pub fn unique_key(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::BigInt(i) => i.to_string(),
            Self::Float(f) => format!("{f:?}"),
            Self::Decimal(s) | Self::String(s) => format!("{s:?}"),
            Self::Bytes(b) => format!("{b:?}"),
            Self::Uuid(u) => u.to_string(),
            Self::Date(d) => d.to_string(),
            Self::Time(t) => t.to_string(),
            Self::DateTime(dt) => dt.to_string(),
            Self::Json(j) => j.to_string(),
            Self::Array(items) => {
                let keys: Vec<String> = items.iter().map(Self::unique_key).collect();
                format!("[{}]", keys.join(","))
            }
            Self::Object(map) => {
                let keys: Vec<String> = map
                    .iter()
                    .map(|(k, v)| format!("{k}:{}", v.unique_key()))
                    .collect();
                format!("{{{}}}", keys.join(","))
            }
        }
    }
}

impl From<i64> for GeneratedValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for GeneratedValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for GeneratedValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// One generated row: column name -> value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedRow {
    /// Row index within its table (generation order)
    #[serde(skip)]
    pub index: u64,

    /// Column values
    #[serde(flatten)]
    pub fields: BTreeMap<String, GeneratedValue>,
}

impl GeneratedRow {
    /// Create an empty row for the given index.
    pub fn new(index: u64) -> Self {
        Self {
            index,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field insertion.
    pub fn with_field(mut self, name: impl Into<String>, value: GeneratedValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&GeneratedValue> {
        self.fields.get(name)
    }

    /// Set a field value.
    pub fn set(&mut self, name: impl Into<String>, value: GeneratedValue) {
        self.fields.insert(name.into(), value);
    }
}

/// Rows generated for one table, in generation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRows {
    /// Table name
    pub table: String,

    /// Generated rows
    pub rows: Vec<GeneratedRow>,
}
