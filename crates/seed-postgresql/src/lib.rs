//! PostgreSQL store for seedforge.
//!
//! [`PostgreSQLStore`] implements the engine's store interface on top of
//! `tokio-postgres`: multi-row INSERT batches (with `OVERRIDING SYSTEM VALUE`
//! for identity columns), keyed UPDATEs for cyclic foreign keys and
//! `setval` calls that move serial sequences past the inserted keys.
//! [`PostgreSQLSelector`] adds generators for PostgreSQL-native types.
//!
//! # Example
//!
//! ```ignore
//! use seed_engine::Seeder;
//! use seed_postgresql::{PostgreSQLSelector, PostgreSQLStore};
//!
//! let mut store = PostgreSQLStore::connect(
//!     "host=localhost user=postgres password=postgres dbname=testdb",
//! ).await?;
//! let report = Seeder::new(&schema)
//!     .with_selector(Box::new(PostgreSQLSelector))
//!     .seed(&mut store)
//!     .await?;
//! ```

pub mod args;
pub mod error;
pub mod insert;
pub mod selector;
pub mod store;

pub use args::PostgreSQLArgs;
pub use error::PostgreSQLStoreError;
pub use selector::PostgreSQLSelector;
pub use store::PostgreSQLStore;
