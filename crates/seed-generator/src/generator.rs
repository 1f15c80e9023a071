//! The value-generator capability set.
//!
//! Every generator follows the same lifecycle: it is constructed with static
//! parameters, `init` establishes a fresh PRNG stream plus any precomputed
//! index structures, and `generate` is then called once per row (or more for
//! array and composite use). Generators are never shared between columns.

use crate::error::GeneratorError;
use crate::unique::UniqueCapacity;
use seed_core::{Column, DataType, GeneratedValue, TypeParams};
use std::fmt;

/// Arguments of [`ValueGenerator::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitOptions {
    /// Number of values that will be requested
    pub count: u64,
    /// Seed of the PRNG stream
    pub seed: i64,
    /// Skip the up-front exhaustion check; the caller detects exhaustion
    /// incrementally instead
    pub skip_check: bool,
}

impl InitOptions {
    pub fn new(count: u64, seed: i64) -> Self {
        Self {
            count,
            seed,
            skip_check: false,
        }
    }

    pub fn with_skip_check(mut self) -> Self {
        self.skip_check = true;
        self
    }
}

/// Column facts copied into a generator at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorParams {
    pub data_type: DataType,
    pub column_type: String,
    pub type_params: TypeParams,
    pub is_unique: bool,
    pub not_null: bool,
    pub enum_values: Vec<String>,
    /// Element parameters of an array column
    pub element: Option<Box<GeneratorParams>>,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            data_type: DataType::String,
            column_type: "text".to_string(),
            type_params: TypeParams::default(),
            is_unique: false,
            not_null: false,
            enum_values: Vec::new(),
            element: None,
        }
    }
}

impl GeneratorParams {
    /// Parameters of a column. Uniqueness covers primary keys too.
    pub fn for_column(column: &Column) -> Self {
        Self {
            data_type: column.data_type,
            column_type: column.column_type.clone(),
            type_params: column.type_params.clone(),
            is_unique: column.requires_unique(),
            not_null: column.not_null,
            enum_values: column.enum_values.clone(),
            element: column
                .base_column
                .as_ref()
                .map(|base| Box::new(Self::for_column(base))),
        }
    }

    pub fn new(data_type: DataType, column_type: impl Into<String>) -> Self {
        let column_type = column_type.into();
        Self {
            data_type,
            type_params: TypeParams::parse(&column_type),
            column_type,
            ..Self::default()
        }
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Parameters of one array element. Without an explicit base column the
    /// element keeps this column's facts minus one array dimension.
    pub fn element_params(&self) -> Self {
        let mut element = match &self.element {
            Some(element) => (**element).clone(),
            None => {
                let mut element = self.clone();
                element.element = None;
                element.type_params.dimensions = self
                    .type_params
                    .dimensions
                    .and_then(|d| d.checked_sub(1))
                    .filter(|d| *d > 0);
                element.type_params.length = None;
                if element.data_type == DataType::Array {
                    element.data_type = DataType::String;
                }
                element
            }
        };
        element.is_unique = self.is_unique;
        element
    }
}

/// A seeded, stateful value generator.
pub trait ValueGenerator: Send + fmt::Debug {
    /// Short name used in error messages.
    fn name(&self) -> &'static str;

    /// Establish the PRNG stream and precomputed state.
    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError>;

    /// Produce the value for row `index`.
    fn generate(&mut self, index: u64) -> Result<GeneratedValue, GeneratorError>;

    /// Size of the unique-value domain.
    fn max_unique_count(&self) -> UniqueCapacity {
        UniqueCapacity::Unbounded
    }

    /// Whether the generator guarantees distinct values within one `init` scope.
    fn is_unique(&self) -> bool {
        false
    }
}

/// Owned, type-erased generator.
pub type BoxedGenerator = Box<dyn ValueGenerator>;

/// Borrow the state created by `init`, or fail.
pub(crate) fn state_mut<'a, T>(
    state: &'a mut Option<T>,
    name: &'static str,
) -> Result<&'a mut T, GeneratorError> {
    state.as_mut().ok_or(GeneratorError::NotInitialized(name))
}

/// Check the requested count against the domain unless the caller opted out.
pub(crate) fn check_capacity(
    generator: &dyn ValueGenerator,
    options: &InitOptions,
) -> Result<(), GeneratorError> {
    if options.skip_check {
        return Ok(());
    }
    generator
        .max_unique_count()
        .check(generator.name(), options.count)
}
