//! Relationship analysis, generation planning and row production.
//!
//! [`Seeder`] is the entry point. It analyses the foreign-key graph of a
//! [`SeedSchema`], builds a [`SeedPlan`] (fill order, row counts and one
//! generator per column) and produces rows into a [`SeedStore`].
//!
//! # Architecture
//!
//! ```text
//! SeedSchema + Refinements + SeedOptions
//!        │
//!        ▼
//! ┌──────────────────┐     ┌───────────────────────┐
//! │ relations        │────▶│ plan::PlanBuilder     │
//! │  - cycle marking │     │  - column sources     │
//! │  - fill order    │     │  - composite keys     │
//! └──────────────────┘     │  - row counts         │
//!                          └───────────┬───────────┘
//!                                      │
//!                                      ▼
//!                          ┌───────────────────────┐
//!                          │ engine::run           │
//!                          │  - pass 1: inserts    │──▶ SeedStore
//!                          │  - pass 2: updates    │
//!                          └───────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use seed_core::{Column, DataType, SeedSchema, Table};
//! use seed_engine::{SeedOptions, Seeder};
//!
//! # tokio_test::block_on(async {
//! let schema = SeedSchema::new(
//!     vec![Table::new(
//!         "users",
//!         vec![
//!             Column::new("id", DataType::Number, "serial").primary(),
//!             Column::new("email", DataType::String, "text").unique(),
//!         ],
//!     )],
//!     vec![],
//! )
//! .unwrap();
//!
//! let tables = Seeder::new(&schema)
//!     .with_options(SeedOptions::default().with_count(5).with_seed(42))
//!     .generate()
//!     .await
//!     .unwrap();
//! assert_eq!(tables[0].rows.len(), 5);
//! # });
//! ```

pub mod config;
pub mod dialect;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod plan;
pub mod relations;
pub mod store;

pub use config::{SeedContext, SeedOptions, DEFAULT_BATCH_SIZE, DEFAULT_COUNT};
pub use dialect::DialectKind;
pub use dispatch::{DefaultSelector, GeneratorSelector};
pub use engine::{SeedReport, TableMetrics};
pub use error::SeedError;
pub use plan::{PlanBuilder, SeedPlan};
pub use store::{MemoryStore, SeedStore};

use seed_core::{Refinements, SeedSchema, TableRows};

/// Builder for one seeding run.
pub struct Seeder<'a> {
    schema: &'a SeedSchema,
    refinements: Refinements,
    options: SeedOptions,
    selector: Box<dyn GeneratorSelector>,
    tables: Option<Vec<String>>,
}

impl<'a> Seeder<'a> {
    pub fn new(schema: &'a SeedSchema) -> Self {
        Self {
            schema,
            refinements: Refinements::new(),
            options: SeedOptions::default(),
            selector: Box::new(DefaultSelector),
            tables: None,
        }
    }

    pub fn with_refinements(mut self, refinements: Refinements) -> Self {
        self.refinements = refinements;
        self
    }

    pub fn with_options(mut self, options: SeedOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the column-type dispatch, e.g. with a dialect's selector.
    pub fn with_selector(mut self, selector: Box<dyn GeneratorSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// Only generate these tables. Foreign keys into other tables become
    /// null, or fail the run when not-null.
    pub fn with_tables(mut self, tables: Vec<String>) -> Self {
        self.tables = Some(tables);
        self
    }

    pub fn options(&self) -> &SeedOptions {
        &self.options
    }

    /// Build the plan without producing rows.
    pub fn plan(&self) -> Result<SeedPlan, SeedError> {
        let builder = PlanBuilder::new(
            self.schema,
            &self.refinements,
            &self.options,
            self.selector.as_ref(),
        );
        match &self.tables {
            Some(tables) => builder.with_tables(tables).build(),
            None => builder.build(),
        }
    }

    /// Produce all rows in memory, tables in fill order.
    pub async fn generate(&self) -> Result<Vec<TableRows>, SeedError> {
        let plan = self.plan()?;
        let mut store = MemoryStore::new();
        engine::run(&plan, &self.options, &mut store).await?;
        let mut produced = store.into_tables();
        Ok(plan
            .order()
            .into_iter()
            .map(|name| match produced.iter().position(|t| t.table == name) {
                Some(idx) => produced.swap_remove(idx),
                None => TableRows {
                    table: name.to_string(),
                    rows: Vec::new(),
                },
            })
            .collect())
    }

    /// Produce all rows into `store`.
    pub async fn seed(&self, store: &mut dyn SeedStore) -> Result<SeedReport, SeedError> {
        let plan = self.plan()?;
        engine::run(&plan, &self.options, store).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seed_core::{Column, DataType, GeneratedValue, Relation, Table};

    fn schema() -> SeedSchema {
        SeedSchema::new(
            vec![
                Table::new(
                    "orders",
                    vec![
                        Column::new("id", DataType::Number, "serial").primary(),
                        Column::new("customer_id", DataType::Number, "integer"),
                    ],
                ),
                Table::new(
                    "customers",
                    vec![Column::new("id", DataType::Number, "serial").primary()],
                ),
            ],
            vec![Relation::new("orders", &["customer_id"], "customers", &["id"])],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_in_fill_order() {
        let schema = schema();
        let tables = Seeder::new(&schema)
            .with_options(SeedOptions::default().with_count(4))
            .generate()
            .await
            .unwrap();
        let names: Vec<_> = tables.iter().map(|t| t.table.as_str()).collect();
        assert_eq!(names, vec!["customers", "orders"]);
        assert!(tables.iter().all(|t| t.rows.len() == 4));
    }

    #[tokio::test]
    async fn test_filtered_run_nulls_orphan_keys() {
        let schema = schema();
        let tables = Seeder::new(&schema)
            .with_tables(vec!["orders".to_string()])
            .generate()
            .await
            .unwrap();
        assert_eq!(tables.len(), 1);
        assert!(tables[0]
            .rows
            .iter()
            .all(|r| r.get("customer_id") == Some(&GeneratedValue::Null)));
    }

    #[tokio::test]
    async fn test_seed_reports_metrics() {
        let schema = schema();
        let mut store = MemoryStore::new();
        let report = Seeder::new(&schema).seed(&mut store).await.unwrap();
        assert_eq!(report.rows_inserted(), 2 * DEFAULT_COUNT);
        assert_eq!(store.rows("orders").map(<[_]>::len), Some(DEFAULT_COUNT as usize));
    }
}
