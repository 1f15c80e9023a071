//! Column type model shared by dialect adapters, the planner and the generators.
//!
//! A column carries two views of its type:
//!
//! - [`DataType`] - the logical value family (number, bigint, string, ...) that
//!   decides which Rust-side value variant a generator produces.
//! - a wire column type string (`"varchar(256)"`, `"integer[]"`, ...) from which
//!   [`TypeParams`] are parsed.

use serde::{Deserialize, Serialize};

/// Logical value family of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// Fits in an `f64`/`i64` (integers, floats, decimals rendered as numbers)
    Number,
    /// Integer wider than 53 bits
    #[serde(rename = "bigint", alias = "big_int")]
    BigInt,
    /// Text
    String,
    /// Boolean
    Boolean,
    /// Date, time or timestamp
    Date,
    /// JSON document
    Json,
    /// Array of a nested base column
    Array,
    /// Raw bytes
    Buffer,
    /// Anything a dialect adapter could not classify
    Custom,
}

impl DataType {
    /// Whether values of this family are rendered as integers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number | Self::BigInt)
    }
}

/// Identity (auto-increment) metadata of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKind {
    /// `GENERATED ALWAYS AS IDENTITY`: inserting explicit values needs an override
    Always,
    /// `GENERATED BY DEFAULT AS IDENTITY`
    ByDefault,
}

/// Type parameters parsed from a wire column type string.
///
/// `dimensions` counts array nesting (`integer[][]` has 2). `length` covers
/// `varchar(n)`, `char(n)`, `bit(n)`, `vector(n)` and fixed-size arrays
/// (`integer[3]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParams {
    /// Total number of digits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,

    /// Digits after the decimal point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,

    /// Length of strings, bit strings, vectors and fixed-size arrays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,

    /// Array nesting depth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<u32>,

    /// Element type of a vector column (`"real"`, `"halfvec"`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_value_type: Option<String>,
}

impl TypeParams {
    /// Parse type parameters out of a wire column type string.
    ///
    /// ```
    /// use seed_core::TypeParams;
    ///
    /// let params = TypeParams::parse("decimal(10,2)");
    /// assert_eq!(params.precision, Some(10));
    /// assert_eq!(params.scale, Some(2));
    /// ```
    pub fn parse(column_type: &str) -> Self {
        let mut params = TypeParams::default();
        let mut rest = column_type.trim().to_lowercase();

        // Peel array suffixes: "integer[3][]" -> dimensions 2, length 3
        let mut dimensions = 0;
        while rest.ends_with(']') {
            let Some(open) = rest.rfind('[') else {
                break;
            };
            let size = rest[open + 1..rest.len() - 1].trim().to_string();
            if let Ok(size) = size.parse::<u32>() {
                params.length.get_or_insert(size);
            }
            rest.truncate(open);
            dimensions += 1;
        }
        if dimensions > 0 {
            params.dimensions = Some(dimensions);
            return params;
        }

        let base = base_type_name(&rest);
        let args: Vec<u32> = match (rest.find('('), rest.rfind(')')) {
            (Some(open), Some(close)) if close > open => rest[open + 1..close]
                .split(',')
                .filter_map(|part| part.trim().parse::<u32>().ok())
                .collect(),
            _ => Vec::new(),
        };

        match base.as_str() {
            "decimal" | "numeric" | "real" | "double" | "float" | "double precision" => {
                params.precision = args.first().copied();
                params.scale = args.get(1).copied();
            }
            "vector" | "halfvec" | "sparsevec" => {
                params.length = args.first().copied();
                params.vector_value_type = Some(base);
            }
            _ => {
                params.length = args.first().copied();
            }
        }

        params
    }

    /// Whether the column holds arrays.
    pub fn is_array(&self) -> bool {
        self.dimensions.unwrap_or(0) > 0
    }
}

/// Strip type arguments and array suffixes: `"varchar(256)"` -> `"varchar"`.
pub fn base_type_name(column_type: &str) -> String {
    let lowered = column_type.trim().to_lowercase();
    let end = lowered
        .find(['(', '['])
        .unwrap_or(lowered.len());
    lowered[..end].trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        let params = TypeParams::parse("decimal(10,2)");
        assert_eq!(params.precision, Some(10));
        assert_eq!(params.scale, Some(2));
        assert_eq!(params.length, None);
        assert!(!params.is_array());
    }

    #[test]
    fn test_parse_varchar() {
        let params = TypeParams::parse("varchar(256)");
        assert_eq!(params.length, Some(256));
        assert_eq!(params.precision, None);
    }

    #[test]
    fn test_parse_arrays() {
        let params = TypeParams::parse("integer[][]");
        assert_eq!(params.dimensions, Some(2));
        assert_eq!(params.length, None);

        let params = TypeParams::parse("text[4]");
        assert_eq!(params.dimensions, Some(1));
        assert_eq!(params.length, Some(4));
        assert!(params.is_array());
    }

    #[test]
    fn test_parse_vector() {
        let params = TypeParams::parse("vector(3)");
        assert_eq!(params.length, Some(3));
        assert_eq!(params.vector_value_type.as_deref(), Some("vector"));
    }

    #[test]
    fn test_parse_plain() {
        assert_eq!(TypeParams::parse("integer"), TypeParams::default());
    }

    #[test]
    fn test_base_type_name() {
        assert_eq!(base_type_name("VARCHAR(256)"), "varchar");
        assert_eq!(base_type_name("integer[]"), "integer");
        assert_eq!(base_type_name(" text "), "text");
    }

    #[test]
    fn test_data_type_serde() {
        let parsed: DataType = serde_yaml::from_str("bigint").unwrap();
        assert_eq!(parsed, DataType::BigInt);
        let parsed: DataType = serde_yaml::from_str("big_int").unwrap();
        assert_eq!(parsed, DataType::BigInt);
        assert!(DataType::Number.is_numeric());
        assert!(!DataType::String.is_numeric());
    }
}
