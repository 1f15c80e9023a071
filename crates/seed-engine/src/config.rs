//! Run options and the context threaded through planning and production.

use seed_generator::{column_seed, group_seed, LATEST_API_VERSION};
use serde::{Deserialize, Serialize};

/// Default row count when neither the table nor the options name one.
pub const DEFAULT_COUNT: u64 = 10;

/// Default number of rows per insert batch.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Library-level configuration of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedOptions {
    /// Rows per table unless refined
    #[serde(default = "default_count")]
    pub count: u64,

    /// User seed mixed into every column seed
    #[serde(default)]
    pub seed: i64,

    /// Generator API version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Requested rows per insert; clamped to the store's parameter limit
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_count() -> u64 {
    DEFAULT_COUNT
}

fn default_version() -> u32 {
    LATEST_API_VERSION
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            seed: 0,
            version: LATEST_API_VERSION,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl SeedOptions {
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

/// API version plus seed derivation, shared by the planner and the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedContext {
    pub api_version: u32,
    pub seed: i64,
}

impl SeedContext {
    pub fn new(options: &SeedOptions) -> Self {
        Self {
            api_version: options.version,
            seed: options.seed,
        }
    }

    /// Seed of an ordinary column.
    pub fn column_seed(&self, table: &str, column: &str) -> i64 {
        column_seed(self.seed, table, column)
    }

    /// Seed of a generator shared by several columns (foreign-key groups,
    /// composite unique keys, child ratios).
    pub fn group_seed(&self, key: &str) -> i64 {
        group_seed(self.seed, key)
    }
}
