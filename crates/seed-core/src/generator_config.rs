//! Declarative generator configuration.
//!
//! A `GeneratorConfig` names a generator kind plus its static parameters. It
//! is what users write in refinements and what the column-type dispatch
//! returns; the generator registry turns it into a live generator for a given
//! API version.

use crate::refine::WithCount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical generator kind, the key of the version registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    Default,
    Sequential,
    Int,
    Number,
    Boolean,
    String,
    Uuid,
    FirstName,
    LastName,
    FullName,
    Email,
    PhoneNumber,
    Country,
    City,
    StreetAddress,
    Postcode,
    CompanyName,
    JobTitle,
    LoremIpsum,
    Date,
    Time,
    Timestamp,
    Year,
    Interval,
    Json,
    IpAddress,
    BitString,
    Point,
    Line,
    Vector,
    Enum,
    ValuesFromArray,
    WeightedRandom,
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = serde_yaml::to_string(self).unwrap_or_default();
        write!(f, "{}", name.trim())
    }
}

/// A pool of literal values, optionally split into weighted groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValuePool {
    /// Weighted groups; weights must sum to 1
    Weighted(Vec<WeightedValues>),
    /// Plain list of values
    Plain(Vec<serde_yaml::Value>),
}

/// One weighted group of a [`ValuePool`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedValues {
    /// Share of rows drawn from this group
    pub weight: f64,
    /// Values of the group
    pub values: Vec<serde_yaml::Value>,
}

/// One weighted branch of a `weighted_random` generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedGenerator {
    /// Share of rows produced by this branch
    pub weight: f64,
    /// Generator of the branch
    pub value: GeneratorConfig,
}

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratorConfig {
    /// Constant value (the column default when refined to `false`)
    Default {
        /// Value to emit
        #[serde(default)]
        value: serde_yaml::Value,
    },

    /// Sequential integers, used for integer primary keys
    Sequential {
        /// First value
        #[serde(default = "default_start")]
        start: i64,
    },

    /// Random integers in a range
    Int {
        /// Minimum value (inclusive); defaults to the column width
        #[serde(default)]
        min: Option<i128>,
        /// Maximum value (inclusive); defaults to the column width
        #[serde(default)]
        max: Option<i128>,
        #[serde(default)]
        is_unique: bool,
        #[serde(default)]
        array_size: Option<u32>,
    },

    /// Random fixed-precision numbers in a range
    Number {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
        /// Scaling factor: 100 yields two decimal places
        #[serde(default)]
        precision: Option<u32>,
        #[serde(default)]
        is_unique: bool,
        #[serde(default)]
        array_size: Option<u32>,
    },

    /// Random booleans
    Boolean {
        #[serde(default)]
        array_size: Option<u32>,
    },

    /// Random alphanumeric strings
    String {
        #[serde(default)]
        is_unique: bool,
        #[serde(default)]
        array_size: Option<u32>,
    },

    /// Random (seeded) v4 UUIDs
    Uuid {
        #[serde(default)]
        array_size: Option<u32>,
    },

    FirstName {
        #[serde(default)]
        is_unique: bool,
        #[serde(default)]
        array_size: Option<u32>,
    },

    LastName {
        #[serde(default)]
        is_unique: bool,
        #[serde(default)]
        array_size: Option<u32>,
    },

    FullName {
        #[serde(default)]
        is_unique: bool,
        #[serde(default)]
        array_size: Option<u32>,
    },

    /// Always unique e-mail addresses
    Email {
        #[serde(default)]
        array_size: Option<u32>,
    },

    /// Phone numbers from a template; `#` is replaced by a digit
    PhoneNumber {
        #[serde(default)]
        template: Option<String>,
        #[serde(default)]
        is_unique: bool,
    },

    Country {
        #[serde(default)]
        is_unique: bool,
    },

    City {
        #[serde(default)]
        is_unique: bool,
    },

    StreetAddress {
        #[serde(default)]
        is_unique: bool,
    },

    Postcode {
        #[serde(default)]
        is_unique: bool,
    },

    CompanyName {
        #[serde(default)]
        is_unique: bool,
    },

    JobTitle,

    /// Lorem ipsum paragraphs
    LoremIpsum {
        #[serde(default = "default_sentences")]
        sentences_count: u32,
    },

    /// Dates in a range
    Date {
        #[serde(default)]
        min_date: Option<NaiveDate>,
        #[serde(default)]
        max_date: Option<NaiveDate>,
        #[serde(default)]
        array_size: Option<u32>,
    },

    Time,

    Timestamp,

    Year,

    /// Postgres-style intervals
    Interval {
        #[serde(default)]
        is_unique: bool,
    },

    /// Small JSON records
    Json,

    /// IPv4 addresses
    IpAddress {
        #[serde(default)]
        is_unique: bool,
    },

    /// Bit strings of the column length
    BitString {
        #[serde(default)]
        length: Option<u32>,
        #[serde(default)]
        is_unique: bool,
    },

    /// Points `(x, y)` with integer coordinates in a range
    Point {
        #[serde(default = "default_coord_min")]
        min: i64,
        #[serde(default = "default_coord_max")]
        max: i64,
        #[serde(default)]
        is_unique: bool,
    },

    /// Lines `{a, b, c}` with integer coefficients in a range
    Line {
        #[serde(default = "default_coord_min")]
        min: i64,
        #[serde(default = "default_coord_max")]
        max: i64,
        #[serde(default)]
        is_unique: bool,
    },

    /// Fixed-dimension vectors of scaled numbers
    Vector {
        #[serde(default)]
        dimensions: Option<u32>,
        #[serde(default = "default_coord_min")]
        min: i64,
        #[serde(default = "default_coord_max")]
        max: i64,
        #[serde(default = "default_decimal_places")]
        decimal_places: u32,
        #[serde(default)]
        is_unique: bool,
    },

    /// One of the column's enum values
    Enum {
        values: Vec<String>,
        /// Cap on how many rows may share one value
        #[serde(default)]
        max_repeated_values: Option<WithCount>,
    },

    /// Values drawn from a literal pool
    ValuesFromArray {
        values: ValuePool,
        #[serde(default)]
        is_unique: bool,
        #[serde(default)]
        array_size: Option<u32>,
        /// Cap on how many rows may share one value, drawn per value
        #[serde(default)]
        max_repeated_values: Option<WithCount>,
    },

    /// Weighted mix of other generators
    WeightedRandom {
        entries: Vec<WeightedGenerator>,
    },
}

fn default_start() -> i64 {
    1
}

fn default_sentences() -> u32 {
    1
}

fn default_coord_min() -> i64 {
    -1000
}

fn default_coord_max() -> i64 {
    1000
}

fn default_decimal_places() -> u32 {
    2
}

impl GeneratorConfig {
    /// Registry key of this configuration.
    pub fn kind(&self) -> GeneratorKind {
        match self {
            Self::Default { .. } => GeneratorKind::Default,
            Self::Sequential { .. } => GeneratorKind::Sequential,
            Self::Int { .. } => GeneratorKind::Int,
            Self::Number { .. } => GeneratorKind::Number,
            Self::Boolean { .. } => GeneratorKind::Boolean,
            Self::String { .. } => GeneratorKind::String,
            Self::Uuid { .. } => GeneratorKind::Uuid,
            Self::FirstName { .. } => GeneratorKind::FirstName,
            Self::LastName { .. } => GeneratorKind::LastName,
            Self::FullName { .. } => GeneratorKind::FullName,
            Self::Email { .. } => GeneratorKind::Email,
            Self::PhoneNumber { .. } => GeneratorKind::PhoneNumber,
            Self::Country { .. } => GeneratorKind::Country,
            Self::City { .. } => GeneratorKind::City,
            Self::StreetAddress { .. } => GeneratorKind::StreetAddress,
            Self::Postcode { .. } => GeneratorKind::Postcode,
            Self::CompanyName { .. } => GeneratorKind::CompanyName,
            Self::JobTitle => GeneratorKind::JobTitle,
            Self::LoremIpsum { .. } => GeneratorKind::LoremIpsum,
            Self::Date { .. } => GeneratorKind::Date,
            Self::Time => GeneratorKind::Time,
            Self::Timestamp => GeneratorKind::Timestamp,
            Self::Year => GeneratorKind::Year,
            Self::Interval { .. } => GeneratorKind::Interval,
            Self::Json => GeneratorKind::Json,
            Self::IpAddress { .. } => GeneratorKind::IpAddress,
            Self::BitString { .. } => GeneratorKind::BitString,
            Self::Point { .. } => GeneratorKind::Point,
            Self::Line { .. } => GeneratorKind::Line,
            Self::Vector { .. } => GeneratorKind::Vector,
            Self::Enum { .. } => GeneratorKind::Enum,
            Self::ValuesFromArray { .. } => GeneratorKind::ValuesFromArray,
            Self::WeightedRandom { .. } => GeneratorKind::WeightedRandom,
        }
    }

    /// Whether the user explicitly asked for unique values.
    pub fn requests_unique(&self) -> bool {
        match self {
            Self::Int { is_unique, .. }
            | Self::Number { is_unique, .. }
            | Self::String { is_unique, .. }
            | Self::FirstName { is_unique, .. }
            | Self::LastName { is_unique, .. }
            | Self::FullName { is_unique, .. }
            | Self::PhoneNumber { is_unique, .. }
            | Self::Country { is_unique }
            | Self::City { is_unique }
            | Self::StreetAddress { is_unique }
            | Self::Postcode { is_unique }
            | Self::CompanyName { is_unique }
            | Self::Interval { is_unique }
            | Self::IpAddress { is_unique }
            | Self::BitString { is_unique, .. }
            | Self::Point { is_unique, .. }
            | Self::Line { is_unique, .. }
            | Self::Vector { is_unique, .. }
            | Self::ValuesFromArray { is_unique, .. } => *is_unique,
            _ => false,
        }
    }

    /// Repeat cap of a literal pool.
    pub fn max_repeated_values(&self) -> Option<&WithCount> {
        match self {
            Self::Enum {
                max_repeated_values,
                ..
            }
            | Self::ValuesFromArray {
                max_repeated_values,
                ..
            } => max_repeated_values.as_ref(),
            _ => None,
        }
    }

    /// Explicit array size, for generators that can fill array columns.
    pub fn array_size(&self) -> Option<u32> {
        match self {
            Self::Int { array_size, .. }
            | Self::Number { array_size, .. }
            | Self::Boolean { array_size }
            | Self::String { array_size, .. }
            | Self::Uuid { array_size }
            | Self::FirstName { array_size, .. }
            | Self::LastName { array_size, .. }
            | Self::FullName { array_size, .. }
            | Self::Email { array_size }
            | Self::Date { array_size, .. }
            | Self::ValuesFromArray { array_size, .. } => *array_size,
            _ => None,
        }
    }

    /// Shorthand for a constant null generator.
    pub fn null() -> Self {
        Self::Default {
            value: serde_yaml::Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_config() {
        let config: GeneratorConfig =
            serde_yaml::from_str("{ type: int, min: 1, max: 10, is_unique: true }").unwrap();
        assert_eq!(config.kind(), GeneratorKind::Int);
        assert!(config.requests_unique());
        assert_eq!(config.array_size(), None);
    }

    #[test]
    fn test_parse_weighted_pool() {
        let yaml = r#"
type: values_from_array
values:
  - { weight: 0.7, values: [a, b] }
  - { weight: 0.3, values: [c] }
"#;
        let config: GeneratorConfig = serde_yaml::from_str(yaml).unwrap();
        let GeneratorConfig::ValuesFromArray { values, .. } = config else {
            panic!("Expected ValuesFromArray");
        };
        assert!(matches!(values, ValuePool::Weighted(ref groups) if groups.len() == 2));
    }

    #[test]
    fn test_parse_plain_pool() {
        let config: GeneratorConfig =
            serde_yaml::from_str("{ type: values_from_array, values: [1, 2, 3], array_size: 2 }")
                .unwrap();
        assert_eq!(config.array_size(), Some(2));
        let GeneratorConfig::ValuesFromArray { values, .. } = config else {
            panic!("Expected ValuesFromArray");
        };
        assert!(matches!(values, ValuePool::Plain(ref v) if v.len() == 3));
    }

    #[test]
    fn test_parse_repeat_cap() {
        let config: GeneratorConfig = serde_yaml::from_str(
            "{ type: values_from_array, values: [a, b], max_repeated_values: [{ weight: 0.5, count: 1 }, { weight: 0.5, count: [2, 3] }] }",
        )
        .unwrap();
        assert!(matches!(
            config.max_repeated_values(),
            Some(WithCount::Weighted(branches)) if branches.len() == 2
        ));
        let config: GeneratorConfig =
            serde_yaml::from_str("{ type: enum, values: [x], max_repeated_values: 2 }").unwrap();
        assert_eq!(config.max_repeated_values(), Some(&WithCount::Fixed(2)));
        let config: GeneratorConfig = serde_yaml::from_str("{ type: enum, values: [x] }").unwrap();
        assert_eq!(config.max_repeated_values(), None);
    }

    #[test]
    fn test_defaults() {
        let config: GeneratorConfig = serde_yaml::from_str("{ type: sequential }").unwrap();
        assert_eq!(config, GeneratorConfig::Sequential { start: 1 });
        let config: GeneratorConfig = serde_yaml::from_str("{ type: job_title }").unwrap();
        assert_eq!(config.kind(), GeneratorKind::JobTitle);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(GeneratorKind::FirstName.to_string(), "first_name");
        assert_eq!(GeneratorKind::ValuesFromArray.to_string(), "values_from_array");
    }
}
