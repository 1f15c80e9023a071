//! Error types for generator construction, initialization and generation.

use seed_core::GeneratorKind;
use thiserror::Error;

/// Errors raised by value generators and the version registry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneratorError {
    /// `generate` called before `init`
    #[error("{0}: state is not defined, call init() before generate()")]
    NotInitialized(&'static str),

    /// Requested more unique values than the domain holds
    #[error("{generator}: requested {requested} unique values but only {available} exist")]
    Exhausted {
        generator: &'static str,
        requested: u64,
        available: u128,
    },

    /// The interval pool of a unique sampler ran dry
    #[error("unique sampler ran out of values; the requested count was miscounted")]
    IntervalPoolEmpty,

    /// Weights that do not sum to 1
    #[error("weights must sum to 1, got {0}")]
    InvalidWeights(f64),

    /// Value pool too small for a unique and not-null column
    #[error("{generator}: not enough unique values ({available}) to fill {requested} not-null rows")]
    NotEnoughUniqueValues {
        generator: &'static str,
        requested: u64,
        available: u64,
    },

    /// A unique generator asked to repeat values
    #[error("{0}: a unique column cannot repeat values more than once")]
    UniqueWithRepeats(&'static str),

    /// No unique variant registered for a generator
    #[error("generator '{0}' cannot produce unique values")]
    UniqueUnsupported(GeneratorKind),

    /// No implementation at or below the requested API version
    #[error("no implementation of generator '{kind}' for API version {version}")]
    NoImplementation { kind: GeneratorKind, version: u32 },

    /// API version outside the supported range
    #[error("API version {requested} is not supported (supported: 1..={latest})")]
    InvalidVersion { requested: u32, latest: u32 },

    /// Composite unique key that cannot reach the requested count
    #[error("composite unique key ({columns}) can produce at most {available} combinations, {requested} requested")]
    CompositeExhausted {
        columns: String,
        requested: u64,
        available: u128,
    },

    /// Invalid static parameters
    #[error("{generator}: invalid parameters: {message}")]
    InvalidParams {
        generator: &'static str,
        message: String,
    },
}

impl GeneratorError {
    /// Shorthand for [`GeneratorError::InvalidParams`].
    pub fn invalid(generator: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParams {
            generator,
            message: message.into(),
        }
    }
}
