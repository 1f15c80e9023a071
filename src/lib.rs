//! seedforge
//!
//! Deterministic synthetic data for relational schemas. A seed file describes
//! tables, foreign keys and refinements; the same file and seed always yield
//! the same rows.
//!
//! # CLI Usage
//!
//! ```bash
//! # Generate rows as JSON
//! seedforge generate --seed-file schema.yaml --seed 42 --output rows.json
//!
//! # Populate a PostgreSQL database
//! seedforge populate postgresql \
//!   --seed-file schema.yaml \
//!   --postgresql-connection-string "host=localhost user=postgres dbname=testdb"
//! ```

pub mod args;
pub mod output;
pub mod seed_file;

pub use args::SeedArgs;
pub use output::rows_to_json;
pub use seed_file::SeedFile;
