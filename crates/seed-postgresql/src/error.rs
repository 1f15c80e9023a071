//! Error types for the PostgreSQL store.

use seed_engine::SeedError;
use thiserror::Error;

/// Errors that can occur while writing to PostgreSQL.
#[derive(Error, Debug)]
pub enum PostgreSQLStoreError {
    /// PostgreSQL connection or query error.
    #[error("PostgreSQL error: {0}")]
    PostgreSQL(#[from] tokio_postgres::Error),

    /// A generated value does not fit the column's type.
    #[error("Cannot bind {value} to '{table}.{column}' ({column_type})")]
    Conversion {
        table: String,
        column: String,
        column_type: String,
        value: String,
    },

    /// Row has no value for the update key.
    #[error("Update of '{table}' is missing key column '{column}'")]
    MissingKey { table: String, column: String },
}

impl From<PostgreSQLStoreError> for SeedError {
    fn from(error: PostgreSQLStoreError) -> Self {
        SeedError::store(error)
    }
}
