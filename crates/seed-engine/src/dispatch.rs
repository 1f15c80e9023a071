//! Column-type to generator dispatch.
//!
//! A [`GeneratorSelector`] maps a column that was neither refined nor a
//! foreign key to a generator configuration. [`DefaultSelector`] covers the
//! neutral data types plus a few name heuristics; dialect crates wrap it with
//! their native type names.

use seed_core::{base_type_name, Column, DataType, GeneratorConfig, Table};

/// Pick a generator for a column; `None` means the type is not supported.
pub trait GeneratorSelector: Send + Sync {
    fn select(&self, table: &Table, column: &Column) -> Option<GeneratorConfig>;
}

/// Whether a wire type holds integers.
pub fn is_integer_type(column_type: &str) -> bool {
    matches!(
        base_type_name(column_type).as_str(),
        "int" | "integer" | "int2" | "int4" | "int8" | "smallint" | "bigint" | "tinyint"
            | "mediumint" | "serial" | "serial2" | "serial4" | "serial8" | "smallserial"
            | "bigserial"
    )
}

/// Whether the database assigns the column's values itself.
pub fn is_auto_increment(column: &Column) -> bool {
    column.identity.is_some() || base_type_name(&column.column_type).contains("serial")
}

/// Specialised generators for well-known column names.
fn by_name(name: &str) -> Option<GeneratorConfig> {
    let name = name.to_lowercase().replace(['-', ' '], "_");
    let config = match name.as_str() {
        n if n.contains("email") => GeneratorConfig::Email { array_size: None },
        "first_name" | "firstname" | "given_name" => GeneratorConfig::FirstName {
            is_unique: false,
            array_size: None,
        },
        "last_name" | "lastname" | "surname" | "family_name" => GeneratorConfig::LastName {
            is_unique: false,
            array_size: None,
        },
        "name" | "full_name" | "fullname" => GeneratorConfig::FullName {
            is_unique: false,
            array_size: None,
        },
        n if n.contains("phone") => GeneratorConfig::PhoneNumber {
            template: None,
            is_unique: false,
        },
        "country" => GeneratorConfig::Country { is_unique: false },
        "city" => GeneratorConfig::City { is_unique: false },
        "address" | "street" | "street_address" => {
            GeneratorConfig::StreetAddress { is_unique: false }
        }
        "postcode" | "postal_code" | "zip" | "zip_code" => {
            GeneratorConfig::Postcode { is_unique: false }
        }
        "company" | "company_name" => GeneratorConfig::CompanyName { is_unique: false },
        "job_title" | "jobtitle" | "position" => GeneratorConfig::JobTitle,
        "description" | "bio" | "content" | "body" => GeneratorConfig::LoremIpsum {
            sentences_count: 2,
        },
        _ => return None,
    };
    Some(config)
}

/// Generator for a type family, looking at the wire type where the family
/// alone is ambiguous.
pub fn by_data_type(data_type: DataType, column_type: &str) -> Option<GeneratorConfig> {
    let base = base_type_name(column_type);
    let config = match data_type {
        DataType::Number if is_integer_type(column_type) => GeneratorConfig::Int {
            min: None,
            max: None,
            is_unique: false,
            array_size: None,
        },
        DataType::Number => GeneratorConfig::Number {
            min: None,
            max: None,
            precision: None,
            is_unique: false,
            array_size: None,
        },
        DataType::BigInt => GeneratorConfig::Int {
            min: None,
            max: None,
            is_unique: false,
            array_size: None,
        },
        DataType::String | DataType::Buffer => GeneratorConfig::String {
            is_unique: false,
            array_size: None,
        },
        DataType::Boolean => GeneratorConfig::Boolean { array_size: None },
        DataType::Date => match base.as_str() {
            "date" => GeneratorConfig::Date {
                min_date: None,
                max_date: None,
                array_size: None,
            },
            "time" => GeneratorConfig::Time,
            "year" => GeneratorConfig::Year,
            "interval" => GeneratorConfig::Interval { is_unique: false },
            _ => GeneratorConfig::Timestamp,
        },
        DataType::Json => GeneratorConfig::Json,
        DataType::Array | DataType::Custom => return None,
    };
    Some(config)
}

/// Dispatch over the neutral data types.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSelector;

impl GeneratorSelector for DefaultSelector {
    fn select(&self, table: &Table, column: &Column) -> Option<GeneratorConfig> {
        if !column.enum_values.is_empty() {
            return Some(GeneratorConfig::Enum {
                values: Vec::new(),
                max_repeated_values: None,
            });
        }
        if column.data_type == DataType::Array {
            // the registry wraps the element generator into an array
            return match &column.base_column {
                Some(base) => self.select(table, base),
                None => by_data_type(DataType::String, &base_type_name(&column.column_type)),
            };
        }
        if column.data_type == DataType::String {
            if let Some(config) = by_name(&column.name) {
                return Some(config);
            }
        }
        by_data_type(column.data_type, &column.column_type)
    }
}
