//! Individual value generators.
//!
//! Scalar generators live in one module per value family; [`composite`]
//! holds the wrappers layered on top of them (arrays, composite unique keys,
//! self relations). The registry in [`crate::registry`] maps configurations
//! to these types.

pub mod choice;
pub mod composite;
pub mod constant;
pub mod datetime;
pub mod geometry;
pub mod network;
pub mod numeric;
pub mod string;
pub mod template;
pub mod text;
pub mod tokens;

pub use choice::{weighted_indices, ValuesFromArrayGenerator, WeightedRandomGenerator};
pub use composite::{
    ArrayGenerator, CompositeUniqueGenerator, SelfRelationGenerator, DEFAULT_ARRAY_SIZE,
};
pub use constant::{DefaultGenerator, HollowGenerator};
pub use datetime::{
    DateGenerator, IntervalGenerator, TimeGenerator, TimestampGenerator, YearGenerator,
};
pub use geometry::CoordinateGenerator;
pub use network::{BitStringGenerator, IpAddressGenerator};
pub use numeric::{
    BooleanGenerator, IntGenerator, NumberGenerator, SequentialGenerator, UniqueIntGenerator,
    UniqueNumberGenerator,
};
pub use string::{StringGenerator, UniqueStringGenerator, UuidGenerator};
pub use template::TemplateGenerator;
pub use text::{JsonGenerator, LoremIpsumGenerator};
pub use tokens::TokenGenerator;
