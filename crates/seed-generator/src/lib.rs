//! Seeded value generators for the seedforge data generator.
//!
//! This crate provides the building blocks the planner wires to columns: a
//! portable PRNG, the `ValueGenerator` lifecycle, one generator per value
//! family and a registry that resolves a `GeneratorConfig` to a versioned
//! implementation. Every generator is deterministic for a given seed.
//!
//! # Architecture
//!
//! ```text
//! GeneratorConfig + GeneratorParams + API version
//!        │
//!        ▼
//! ┌──────────────────────┐
//! │ registry::instantiate│
//! │                      │
//! │  - version selection │
//! │  - unique variants   │
//! │  - array wrapping    │
//! └──────────┬───────────┘
//!            │
//!            ▼
//!   BoxedGenerator ── init(count, seed) ── generate(index) ──▶ GeneratedValue
//! ```
//!
//! # Example
//!
//! ```rust
//! use seed_core::{DataType, GeneratorConfig};
//! use seed_generator::{registry, GeneratorParams, InitOptions};
//!
//! let config = GeneratorConfig::Int {
//!     min: Some(1),
//!     max: Some(100),
//!     is_unique: true,
//!     array_size: None,
//! };
//! let params = GeneratorParams::new(DataType::Number, "integer");
//! let mut generator = registry::instantiate(&config, &params, 2).unwrap();
//! generator.init(InitOptions::new(10, 42)).unwrap();
//! let value = generator.generate(0).unwrap();
//! println!("Generated value: {:?}", value);
//! ```
//!
//! # Uniqueness
//!
//! Unique generators sample without replacement from an index domain
//! ([`unique::IntervalSampler`]) and decode indices into values, so no
//! rejection loop is ever needed. Requesting more values than the domain
//! holds fails at `init` with [`GeneratorError::Exhausted`].

pub mod datasets;
pub mod error;
pub mod generator;
pub mod generators;
pub mod hash;
pub mod prng;
pub mod registry;
pub mod unique;

// Re-exports for convenience
pub use error::GeneratorError;
pub use generator::{BoxedGenerator, GeneratorParams, InitOptions, ValueGenerator};
pub use hash::{column_seed, group_seed, hash_seed_string};
pub use prng::{Prng, PrngState};
pub use registry::{instantiate, LATEST_API_VERSION};
pub use unique::UniqueCapacity;
