//! PostgreSQL column-type dispatch.

use seed_core::{base_type_name, Column, DataType, GeneratorConfig, Table};
use seed_engine::{DefaultSelector, GeneratorSelector};

/// Maps PostgreSQL wire types to generators, deferring to
/// [`DefaultSelector`] for everything it does not recognise.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgreSQLSelector;

impl PostgreSQLSelector {
    fn native(column: &Column) -> Option<GeneratorConfig> {
        let config = match base_type_name(&column.column_type).trim() {
            "uuid" => GeneratorConfig::Uuid { array_size: None },
            "inet" | "cidr" => GeneratorConfig::IpAddress { is_unique: false },
            "point" => GeneratorConfig::Point {
                min: -1000,
                max: 1000,
                is_unique: false,
            },
            "line" => GeneratorConfig::Line {
                min: -1000,
                max: 1000,
                is_unique: false,
            },
            "vector" => GeneratorConfig::Vector {
                dimensions: None,
                min: -1000,
                max: 1000,
                decimal_places: 2,
                is_unique: false,
            },
            "bit" | "varbit" | "bit varying" => GeneratorConfig::BitString {
                length: None,
                is_unique: false,
            },
            "interval" => GeneratorConfig::Interval { is_unique: false },
            "json" | "jsonb" => GeneratorConfig::Json,
            "bytea" => GeneratorConfig::String {
                is_unique: false,
                array_size: None,
            },
            _ => return None,
        };
        Some(config)
    }
}

impl GeneratorSelector for PostgreSQLSelector {
    fn select(&self, table: &Table, column: &Column) -> Option<GeneratorConfig> {
        if column.enum_values.is_empty() {
            let element = match (&column.base_column, column.data_type) {
                (Some(base), DataType::Array) => base.as_ref(),
                _ => column,
            };
            if let Some(config) = Self::native(element) {
                return Some(config);
            }
        }
        DefaultSelector.select(table, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seed_core::GeneratorKind;

    fn kind(column: Column) -> Option<GeneratorKind> {
        let table = Table::new("t", vec![column.clone()]);
        PostgreSQLSelector.select(&table, &column).map(|c| c.kind())
    }

    #[test]
    fn test_native_types() {
        assert_eq!(kind(Column::new("id", DataType::String, "uuid")), Some(GeneratorKind::Uuid));
        assert_eq!(kind(Column::new("ip", DataType::String, "inet")), Some(GeneratorKind::IpAddress));
        assert_eq!(kind(Column::new("p", DataType::Json, "point")), Some(GeneratorKind::Point));
        assert_eq!(kind(Column::new("e", DataType::Array, "vector(3)")), Some(GeneratorKind::Vector));
        assert_eq!(kind(Column::new("b", DataType::String, "bit(8)")), Some(GeneratorKind::BitString));
    }

    #[test]
    fn test_array_of_native_elements() {
        let column = Column::new("ids", DataType::Array, "uuid[]")
            .with_base_column(Column::new("ids", DataType::String, "uuid"));
        assert_eq!(kind(column), Some(GeneratorKind::Uuid));
    }

    #[test]
    fn test_falls_back_to_default_dispatch() {
        assert_eq!(
            kind(Column::new("email", DataType::String, "text")),
            Some(GeneratorKind::Email)
        );
        assert_eq!(kind(Column::new("g", DataType::Custom, "geometry")), None);
    }
}
