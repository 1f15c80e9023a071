//! Constant and placeholder generators.

use crate::error::GeneratorError;
use crate::generator::{InitOptions, ValueGenerator};
use seed_core::GeneratedValue;

/// Emits the same value for every row (column defaults, disabled columns).
#[derive(Debug)]
pub struct DefaultGenerator {
    value: GeneratedValue,
    ready: bool,
}

impl DefaultGenerator {
    pub fn new(value: GeneratedValue) -> Self {
        Self {
            value,
            ready: false,
        }
    }
}

impl ValueGenerator for DefaultGenerator {
    fn name(&self) -> &'static str {
        "default"
    }

    fn init(&mut self, _options: InitOptions) -> Result<(), GeneratorError> {
        self.ready = true;
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        if !self.ready {
            return Err(GeneratorError::NotInitialized("default"));
        }
        Ok(self.value.clone())
    }
}

/// Placeholder for a cyclic foreign key deferred to the second pass.
#[derive(Debug, Default)]
pub struct HollowGenerator;

impl ValueGenerator for HollowGenerator {
    fn name(&self) -> &'static str {
        "hollow"
    }

    fn init(&mut self, _options: InitOptions) -> Result<(), GeneratorError> {
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        Ok(GeneratedValue::Null)
    }
}
