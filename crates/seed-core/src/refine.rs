//! User refinements: per-table row counts, "with" child ratios and per-column
//! generator overrides.
//!
//! ```yaml
//! users:
//!   count: 5
//!   with:
//!     posts: 2
//!     comments:
//!       - { weight: 0.7, count: [1, 2] }
//!       - { weight: 0.3, count: 5 }
//!   columns:
//!     email: { type: email }
//!     bio: false
//! ```

use crate::generator_config::GeneratorConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Refinements keyed by table name.
pub type Refinements = BTreeMap<String, TableRefinement>;

/// Refinement of one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRefinement {
    /// Row count override
    #[serde(default)]
    pub count: Option<u64>,

    /// Column overrides
    #[serde(default)]
    pub columns: BTreeMap<String, ColumnRefinement>,

    /// Child rows to generate per row of this table
    #[serde(default)]
    pub with: BTreeMap<String, WithCount>,
}

impl TableRefinement {
    /// Builder-style count override.
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// Builder-style column override.
    pub fn with_column(mut self, column: impl Into<String>, refinement: ColumnRefinement) -> Self {
        self.columns.insert(column.into(), refinement);
        self
    }

    /// Builder-style child ratio.
    pub fn with_children(mut self, child: impl Into<String>, count: WithCount) -> Self {
        self.with.insert(child.into(), count);
        self
    }
}

/// Override for one column: `false` disables generation, a generator replaces
/// the dispatched one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRefinement {
    /// Only `false` is meaningful; `true` is rejected by the planner
    Enabled(bool),
    /// Explicit generator
    Generator(GeneratorConfig),
}

impl ColumnRefinement {
    /// Disable the column (insert its default or null).
    pub fn disabled() -> Self {
        Self::Enabled(false)
    }
}

impl From<GeneratorConfig> for ColumnRefinement {
    fn from(config: GeneratorConfig) -> Self {
        Self::Generator(config)
    }
}

/// Child rows per parent row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WithCount {
    /// Same number of children for every parent row
    Fixed(u64),
    /// Count drawn per parent row from a weighted distribution
    Weighted(Vec<WeightedCount>),
}

/// One branch of a weighted child count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedCount {
    /// Share of parent rows using this branch
    pub weight: f64,
    /// Count, or list of counts drawn uniformly
    pub count: CountChoice,
}

/// A single count or a list to draw from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountChoice {
    One(u64),
    Many(Vec<u64>),
}

impl CountChoice {
    /// The candidate counts.
    pub fn values(&self) -> Vec<u64> {
        match self {
            Self::One(n) => vec![*n],
            Self::Many(ns) => ns.clone(),
        }
    }
}
