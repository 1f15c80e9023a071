//! Error types for planning and row production.

use seed_core::SchemaError;
use seed_generator::GeneratorError;
use thiserror::Error;

/// Errors that abort a seeding run.
///
/// Every failure is raised immediately; rows flushed by earlier batches stay
/// in the store.
#[derive(Error, Debug)]
pub enum SeedError {
    /// Invalid options or refinements.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The schema cannot be seeded as declared.
    #[error("Infeasible schema: {0}")]
    Infeasible(String),

    /// A generator rejected the requested count or parameters.
    #[error("{context}: {source}")]
    Capacity {
        context: String,
        #[source]
        source: GeneratorError,
    },

    /// The store failed to write a batch.
    #[error("Store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Schema metadata error.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl From<GeneratorError> for SeedError {
    fn from(source: GeneratorError) -> Self {
        Self::Capacity {
            context: "generator".to_string(),
            source,
        }
    }
}

impl SeedError {
    /// Wrap a store-specific error.
    pub fn store<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store(Box::new(error))
    }

    /// Generator failure attributed to a column.
    pub fn at(table: &str, column: &str) -> impl FnOnce(GeneratorError) -> Self {
        let context = format!("{table}.{column}");
        move |source| Self::Capacity { context, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_context() {
        let err = SeedError::at("users", "email")(GeneratorError::IntervalPoolEmpty);
        assert!(err.to_string().starts_with("users.email: "));
    }

    #[test]
    fn test_store_wraps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
        let err = SeedError::store(io);
        assert_eq!(err.to_string(), "Store error: connection reset");
    }
}
