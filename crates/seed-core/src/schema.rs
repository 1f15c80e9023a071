//! Neutral schema model: tables, columns and foreign-key relations.
//!
//! Dialect adapters build these types from whatever schema format the host
//! uses. The planner only ever looks at this model.
//!
//! ## YAML format
//!
//! ```yaml
//! tables:
//!   - name: users
//!     columns:
//!       - { name: id, data_type: number, column_type: serial, primary: true, not_null: true }
//!       - { name: email, data_type: string, column_type: varchar(256), is_unique: true }
//! relations:
//!   - { table: posts, columns: [author_id], ref_table: users, ref_columns: [id] }
//! ```

use crate::types::{DataType, IdentityKind, TypeParams};
use crate::values::GeneratedValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Table not found in schema
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Column not found in table schema
    #[error("Column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// Relation with mismatched column lists
    #[error("Relation {table} -> {ref_table} has {columns} source columns but {ref_columns} referenced columns")]
    RelationArity {
        table: String,
        ref_table: String,
        columns: usize,
        ref_columns: usize,
    },
}

// ============================================================================
// Columns and Tables
// ============================================================================

/// Column metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Logical value family
    pub data_type: DataType,

    /// Wire column type (`"varchar(256)"`, `"integer[]"`, ...)
    pub column_type: String,

    /// Parameters parsed from the column type
    #[serde(default)]
    pub type_params: TypeParams,

    /// Whether the database supplies a default
    #[serde(default)]
    pub has_default: bool,

    /// Default value, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_yaml::Value>,

    /// Allowed values of an enum column
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,

    /// Single-column unique constraint
    #[serde(default)]
    pub is_unique: bool,

    /// NOT NULL constraint
    #[serde(default)]
    pub not_null: bool,

    /// Part of the primary key
    #[serde(default)]
    pub primary: bool,

    /// Identity metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<IdentityKind>,

    /// Element column of an array column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_column: Option<Box<Column>>,
}

impl Column {
    /// Create a nullable, non-unique column; type params are parsed from `column_type`.
    pub fn new(name: impl Into<String>, data_type: DataType, column_type: impl Into<String>) -> Self {
        let column_type = column_type.into();
        Self {
            name: name.into(),
            data_type,
            type_params: TypeParams::parse(&column_type),
            column_type,
            has_default: false,
            default: None,
            enum_values: Vec::new(),
            is_unique: false,
            not_null: false,
            primary: false,
            identity: None,
            base_column: None,
        }
    }

    /// Mark as primary key (implies not null).
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self.not_null = true;
        self
    }

    /// Mark as NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Mark as unique.
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// Attach a database default.
    pub fn with_default(mut self, value: serde_yaml::Value) -> Self {
        self.has_default = true;
        self.default = Some(value);
        self
    }

    /// Attach enum values.
    pub fn with_enum_values(mut self, values: Vec<String>) -> Self {
        self.enum_values = values;
        self
    }

    /// Attach identity metadata.
    pub fn with_identity(mut self, identity: IdentityKind) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Attach the element column of an array column.
    pub fn with_base_column(mut self, base: Column) -> Self {
        self.base_column = Some(Box::new(base));
        self
    }

    /// Database default as a generated value (null when unknown).
    pub fn default_value(&self) -> GeneratedValue {
        self.default
            .as_ref()
            .map(GeneratedValue::from_yaml)
            .unwrap_or(GeneratedValue::Null)
    }

    /// Whether this column holds arrays.
    pub fn is_array(&self) -> bool {
        self.type_params.is_array()
    }

    /// Whether values must be unique (primary keys are always unique).
    pub fn requires_unique(&self) -> bool {
        self.is_unique || self.primary
    }
}

/// Table metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Table {
    /// Table name
    pub name: String,

    /// Columns in declaration order
    pub columns: Vec<Column>,

    /// Primary key column names
    #[serde(default)]
    pub primary_keys: Vec<String>,

    /// Multi-column unique constraints
    #[serde(default)]
    pub unique_constraints: Vec<Vec<String>>,
}

impl Table {
    /// Create a table; primary keys are collected from the columns.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        let primary_keys = columns
            .iter()
            .filter(|c| c.primary)
            .map(|c| c.name.clone())
            .collect();
        Self {
            name: name.into(),
            columns,
            primary_keys,
            unique_constraints: Vec::new(),
        }
    }

    /// Add a composite unique constraint.
    pub fn with_unique_constraint(mut self, columns: &[&str]) -> Self {
        self.unique_constraints
            .push(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    /// Get a column by name.
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get a mutable column by name.
    pub fn get_column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// All column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Column that identifies a row for keyed updates: the primary key, else
    /// the first unique and not-null column.
    pub fn identifying_column(&self) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.primary)
            .or_else(|| self.columns.iter().find(|c| c.is_unique && c.not_null))
    }
}

// ============================================================================
// Relations
// ============================================================================

/// Directed foreign-key edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relation {
    /// Referencing table
    pub table: String,

    /// Referencing columns
    pub columns: Vec<String>,

    /// Referenced table
    pub ref_table: String,

    /// Referenced columns
    pub ref_columns: Vec<String>,

    /// Set by the relationship analyzer when this edge lies on a cycle
    #[serde(default)]
    pub is_cyclic: bool,
}

impl Relation {
    /// Create a relation.
    pub fn new(
        table: impl Into<String>,
        columns: &[&str],
        ref_table: impl Into<String>,
        ref_columns: &[&str],
    ) -> Self {
        Self {
            table: table.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            ref_table: ref_table.into(),
            ref_columns: ref_columns.iter().map(|c| c.to_string()).collect(),
            is_cyclic: false,
        }
    }

    /// A table referencing itself.
    pub fn is_self_relation(&self) -> bool {
        self.table == self.ref_table
    }

    /// Referenced column for a given source column.
    pub fn ref_column_for(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.ref_columns.get(idx))
            .map(String::as_str)
    }

    /// Stable signature used to seed shared foreign-key generators.
    pub fn signature(&self) -> String {
        format!("{}.{}", self.table, self.columns.join(","))
    }
}

/// Merge declared one-to-many relations into the physical foreign keys.
///
/// Exact duplicates are dropped. A declared relation on the same source
/// columns that points somewhere else conflicts with the physical key; the
/// physical key wins and a warning is emitted.
pub fn merge_relations(physical: Vec<Relation>, declared: Vec<Relation>) -> Vec<Relation> {
    let mut merged = physical;
    for relation in declared {
        let existing = merged
            .iter()
            .find(|r| r.table == relation.table && r.columns == relation.columns);
        match existing {
            Some(r) if r.ref_table == relation.ref_table && r.ref_columns == relation.ref_columns => {}
            Some(r) => {
                warn!(
                    table = %relation.table,
                    columns = ?relation.columns,
                    declared = %relation.ref_table,
                    physical = %r.ref_table,
                    "declared relation conflicts with a foreign key; keeping the foreign key"
                );
            }
            None => merged.push(relation),
        }
    }
    merged
}

// ============================================================================
// Schema
// ============================================================================

/// Tables plus relations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedSchema {
    /// Table definitions
    pub tables: Vec<Table>,

    /// Foreign-key relations
    #[serde(default)]
    pub relations: Vec<Relation>,

    /// Cached table lookup (not serialized)
    #[serde(skip)]
    table_map: HashMap<String, usize>,
}

impl SeedSchema {
    /// Create a schema and validate relation arity.
    pub fn new(tables: Vec<Table>, relations: Vec<Relation>) -> Result<Self, SchemaError> {
        let mut schema = Self {
            tables,
            relations,
            table_map: HashMap::new(),
        };
        schema.build_table_map();
        schema.validate()?;
        Ok(schema)
    }

    /// Load schema from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse schema from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let schema: SeedSchema = serde_yaml::from_str(yaml)?;
        schema.finish()
    }

    /// Rebuild caches and validate after deserialization.
    pub fn finish(mut self) -> Result<Self, SchemaError> {
        for table in &mut self.tables {
            if table.primary_keys.is_empty() {
                table.primary_keys = table
                    .columns
                    .iter()
                    .filter(|c| c.primary)
                    .map(|c| c.name.clone())
                    .collect();
            }
            for column in &mut table.columns {
                if column.type_params == TypeParams::default() {
                    column.type_params = TypeParams::parse(&column.column_type);
                }
            }
        }
        self.build_table_map();
        self.validate()?;
        Ok(self)
    }

    fn build_table_map(&mut self) {
        self.table_map = self
            .tables
            .iter()
            .enumerate()
            .map(|(idx, table)| (table.name.clone(), idx))
            .collect();
    }

    fn validate(&self) -> Result<(), SchemaError> {
        for relation in &self.relations {
            if relation.columns.len() != relation.ref_columns.len() {
                return Err(SchemaError::RelationArity {
                    table: relation.table.clone(),
                    ref_table: relation.ref_table.clone(),
                    columns: relation.columns.len(),
                    ref_columns: relation.ref_columns.len(),
                });
            }
            let table = self
                .get_table(&relation.table)
                .ok_or_else(|| SchemaError::TableNotFound(relation.table.clone()))?;
            for column in &relation.columns {
                if table.get_column(column).is_none() {
                    return Err(SchemaError::ColumnNotFound {
                        table: relation.table.clone(),
                        column: column.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Get a table by name.
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.table_map
            .get(name)
            .and_then(|&idx| self.tables.get(idx))
    }

    /// Get a column of a table.
    pub fn get_column(&self, table: &str, column: &str) -> Result<&Column, SchemaError> {
        let table_schema = self
            .get_table(table)
            .ok_or_else(|| SchemaError::TableNotFound(table.to_string()))?;
        table_schema
            .get_column(column)
            .ok_or_else(|| SchemaError::ColumnNotFound {
                table: table.to_string(),
                column: column.to_string(),
            })
    }

    /// All table names in declaration order.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SCHEMA: &str = r#"
tables:
  - name: users
    columns:
      - { name: id, data_type: number, column_type: serial, primary: true, not_null: true }
      - { name: email, data_type: string, column_type: varchar(256), is_unique: true }
      - { name: tags, data_type: array, column_type: "text[]" }
  - name: posts
    columns:
      - { name: id, data_type: number, column_type: integer, primary: true, not_null: true }
      - { name: author_id, data_type: number, column_type: integer, not_null: true }
relations:
  - { table: posts, columns: [author_id], ref_table: users, ref_columns: [id] }
"#;

    #[test]
    fn test_parse_schema() {
        let schema = SeedSchema::from_yaml(SAMPLE_SCHEMA).unwrap();
        assert_eq!(schema.table_names(), vec!["users", "posts"]);

        let users = schema.get_table("users").unwrap();
        assert_eq!(users.primary_keys, vec!["id".to_string()]);
        let email = users.get_column("email").unwrap();
        assert_eq!(email.type_params.length, Some(256));
        assert!(users.get_column("tags").unwrap().is_array());
        assert_eq!(schema.relations.len(), 1);
        assert!(!schema.relations[0].is_cyclic);
    }

    #[test]
    fn test_column_not_found() {
        let schema = SeedSchema::from_yaml(SAMPLE_SCHEMA).unwrap();
        let result = schema.get_column("users", "nonexistent");
        assert!(matches!(result, Err(SchemaError::ColumnNotFound { .. })));
        let result = schema.get_column("nonexistent", "id");
        assert!(matches!(result, Err(SchemaError::TableNotFound(_))));
    }

    #[test]
    fn test_relation_arity_rejected() {
        let users = Table::new("users", vec![Column::new("id", DataType::Number, "integer")]);
        let posts = Table::new(
            "posts",
            vec![Column::new("author_id", DataType::Number, "integer")],
        );
        let relation = Relation::new("posts", &["author_id"], "users", &["id", "other"]);
        let result = SeedSchema::new(vec![users, posts], vec![relation]);
        assert!(matches!(result, Err(SchemaError::RelationArity { .. })));
    }

    #[test]
    fn test_identifying_column() {
        let table = Table::new(
            "accounts",
            vec![
                Column::new("name", DataType::String, "text"),
                Column::new("code", DataType::String, "text").unique().not_null(),
            ],
        );
        assert_eq!(table.identifying_column().unwrap().name, "code");

        let table = Table::new(
            "loose",
            vec![Column::new("code", DataType::String, "text").unique()],
        );
        assert!(table.identifying_column().is_none());
    }

    #[test]
    fn test_relation_helpers() {
        let relation = Relation::new("orders", &["a", "b"], "items", &["x", "y"]);
        assert_eq!(relation.ref_column_for("b"), Some("y"));
        assert_eq!(relation.ref_column_for("c"), None);
        assert_eq!(relation.signature(), "orders.a,b");
        assert!(!relation.is_self_relation());
    }

    #[test]
    fn test_merge_relations_physical_wins() {
        let physical = vec![Relation::new("posts", &["author_id"], "users", &["id"])];
        let declared = vec![
            Relation::new("posts", &["author_id"], "users", &["id"]),
            Relation::new("posts", &["author_id"], "admins", &["id"]),
            Relation::new("comments", &["post_id"], "posts", &["id"]),
        ];
        let merged = merge_relations(physical, declared);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].ref_table, "users");
        assert_eq!(merged[1].table, "comments");
    }
}
