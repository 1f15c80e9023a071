//! Store write interface and the in-memory store.

use crate::dialect::DialectKind;
use crate::error::SeedError;
use async_trait::async_trait;
use seed_core::{GeneratedRow, Table, TableRows};
use std::collections::BTreeMap;

/// Destination of generated rows.
///
/// The engine awaits every call before producing the next batch; there are
/// never two writes in flight.
#[async_trait]
pub trait SeedStore: Send {
    /// Dialect of the store, which fixes batch limits and sequence handling.
    fn dialect(&self) -> DialectKind;

    /// Insert a batch. `override_identity` asks the store to force explicit
    /// values into identity columns.
    async fn insert(
        &mut self,
        table: &Table,
        rows: &[GeneratedRow],
        override_identity: bool,
    ) -> Result<u64, SeedError>;

    /// Update one row, matched on `key_column`, with the row's other fields.
    async fn update(
        &mut self,
        table: &Table,
        row: &GeneratedRow,
        key_column: &str,
    ) -> Result<u64, SeedError>;

    /// Move the sequence behind `column` past `value`.
    async fn advance_sequence(
        &mut self,
        table: &Table,
        column: &str,
        value: i128,
    ) -> Result<(), SeedError>;
}

/// Keeps every written row in memory, in insertion order.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    dialect: DialectKind,
    tables: Vec<TableRows>,
    sequences: BTreeMap<(String, String), i128>,
    overrides: Vec<String>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_dialect(DialectKind::PostgreSQL)
    }

    /// Store that reports `dialect`, for exercising dialect limits.
    pub fn with_dialect(dialect: DialectKind) -> Self {
        Self {
            dialect,
            tables: Vec::new(),
            sequences: BTreeMap::new(),
            overrides: Vec::new(),
        }
    }

    /// Rows of one table.
    pub fn rows(&self, table: &str) -> Option<&[GeneratedRow]> {
        self.tables
            .iter()
            .find(|t| t.table == table)
            .map(|t| t.rows.as_slice())
    }

    /// Last sequence value recorded for `table.column`.
    pub fn sequence(&self, table: &str, column: &str) -> Option<i128> {
        self.sequences
            .get(&(table.to_string(), column.to_string()))
            .copied()
    }

    /// Tables that were inserted with an identity override.
    pub fn overrides(&self) -> &[String] {
        &self.overrides
    }

    pub fn into_tables(self) -> Vec<TableRows> {
        self.tables
    }

    fn table_mut(&mut self, name: &str) -> &mut TableRows {
        let idx = match self.tables.iter().position(|t| t.table == name) {
            Some(idx) => idx,
            None => {
                self.tables.push(TableRows {
                    table: name.to_string(),
                    rows: Vec::new(),
                });
                self.tables.len() - 1
            }
        };
        &mut self.tables[idx]
    }
}

#[async_trait]
impl SeedStore for MemoryStore {
    fn dialect(&self) -> DialectKind {
        self.dialect
    }

    async fn insert(
        &mut self,
        table: &Table,
        rows: &[GeneratedRow],
        override_identity: bool,
    ) -> Result<u64, SeedError> {
        if override_identity && !self.overrides.contains(&table.name) {
            self.overrides.push(table.name.clone());
        }
        self.table_mut(&table.name).rows.extend_from_slice(rows);
        Ok(rows.len() as u64)
    }

    async fn update(
        &mut self,
        table: &Table,
        row: &GeneratedRow,
        key_column: &str,
    ) -> Result<u64, SeedError> {
        let key = row.get(key_column).ok_or_else(|| {
            SeedError::Config(format!(
                "update of '{}' is missing key column '{key_column}'",
                table.name
            ))
        })?;
        let mut updated = 0;
        for stored in self.table_mut(&table.name).rows.iter_mut() {
            if stored.get(key_column) == Some(key) {
                for (name, value) in &row.fields {
                    stored.set(name.clone(), value.clone());
                }
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn advance_sequence(
        &mut self,
        table: &Table,
        column: &str,
        value: i128,
    ) -> Result<(), SeedError> {
        self.sequences
            .insert((table.name.clone(), column.to_string()), value);
        Ok(())
    }
}
