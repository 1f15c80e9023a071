//! Core types for the seedforge data generator.
//!
//! This crate provides the neutral model every other seedforge crate works on:
//!
//! - [`Column`], [`Table`], [`Relation`], [`SeedSchema`] - schema metadata
//!   produced by dialect adapters
//! - [`DataType`], [`TypeParams`] - logical type and parsed type parameters
//! - [`GeneratedValue`], [`GeneratedRow`], [`TableRows`] - generated data
//! - [`GeneratorConfig`] - declarative generator configuration
//! - [`Refinements`] - user overrides of counts, ratios and generators
//!
//! # Architecture
//!
//! ```text
//! seed-core (this crate)
//!    │
//!    ├─── seed-generator   (PRNG, value generators, version registry)
//!    │
//!    ├─── seed-engine      (relationship analysis, planning, row production)
//!    │
//!    └─── seed-postgresql  (PostgreSQL store and column dispatch)
//! ```

pub mod generator_config;
pub mod refine;
pub mod schema;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use generator_config::{
    GeneratorConfig, GeneratorKind, ValuePool, WeightedGenerator, WeightedValues,
};
pub use refine::{
    ColumnRefinement, CountChoice, Refinements, TableRefinement, WeightedCount, WithCount,
};
pub use schema::{merge_relations, Column, Relation, SchemaError, SeedSchema, Table};
pub use types::{base_type_name, DataType, IdentityKind, TypeParams};
pub use values::{GeneratedRow, GeneratedValue, TableRows};
