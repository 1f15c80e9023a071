//! Seed file loading.

use anyhow::Context;
use seed_core::{merge_relations, Refinements, Relation, SchemaError, SeedSchema, Table};
use seed_engine::SeedOptions;
use serde::Deserialize;
use std::path::Path;

/// Schema, refinements and run defaults in one YAML document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedFile {
    /// Seed used when the command line gives none
    #[serde(default)]
    pub seed: Option<i64>,

    /// Global row count
    #[serde(default)]
    pub count: Option<u64>,

    /// Generator API version
    #[serde(default)]
    pub version: Option<u32>,

    pub tables: Vec<Table>,

    /// Physical foreign keys
    #[serde(default)]
    pub relations: Vec<Relation>,

    /// One-to-many relations declared on top of the foreign keys
    #[serde(default)]
    pub declared_relations: Vec<Relation>,

    #[serde(default)]
    pub refine: Refinements,
}

impl SeedFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {path:?}"))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse seed file {path:?}"))
    }

    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Validated schema with declared relations merged in.
    pub fn schema(&self) -> Result<SeedSchema, SchemaError> {
        let relations = merge_relations(self.relations.clone(), self.declared_relations.clone());
        SeedSchema::new(self.tables.clone(), relations)?.finish()
    }

    /// Run options from the file, falling back to the library defaults.
    pub fn options(&self) -> SeedOptions {
        let mut options = SeedOptions::default();
        if let Some(seed) = self.seed {
            options = options.with_seed(seed);
        }
        if let Some(count) = self.count {
            options = options.with_count(count);
        }
        if let Some(version) = self.version {
            options = options.with_version(version);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOG: &str = r#"
seed: 42
count: 3
tables:
  - name: users
    columns:
      - { name: id, data_type: number, column_type: serial, primary: true, not_null: true }
      - { name: email, data_type: string, column_type: "varchar(256)", is_unique: true }
  - name: posts
    columns:
      - { name: id, data_type: number, column_type: serial, primary: true, not_null: true }
      - { name: author_id, data_type: number, column_type: integer }
relations:
  - { table: posts, columns: [author_id], ref_table: users, ref_columns: [id] }
declared_relations:
  - { table: posts, columns: [author_id], ref_table: users, ref_columns: [id] }
refine:
  users:
    count: 5
    with: { posts: 2 }
    columns:
      email: { type: email }
"#;

    #[test]
    fn test_parse_seed_file() {
        let file = SeedFile::from_yaml(BLOG).unwrap();
        let options = file.options();
        assert_eq!(options.seed, 42);
        assert_eq!(options.count, 3);

        let schema = file.schema().unwrap();
        assert_eq!(schema.relations.len(), 1);
        let users = schema.get_table("users").unwrap();
        assert_eq!(users.primary_keys, vec!["id"]);
        assert_eq!(users.get_column("email").unwrap().type_params.length, Some(256));
        assert!(file.refine["users"].columns.contains_key("email"));
    }

    #[test]
    fn test_defaults_without_run_settings() {
        let file = SeedFile::from_yaml("tables: []").unwrap();
        let options = file.options();
        assert_eq!(options, SeedOptions::default());
    }

    #[test]
    fn test_unknown_relation_table_rejected() {
        let file = SeedFile::from_yaml(
            "tables: []\nrelations:\n  - { table: x, columns: [a], ref_table: y, ref_columns: [b] }\n",
        )
        .unwrap();
        assert!(file.schema().is_err());
    }
}
