//! Digit templates: phone numbers and postcodes. `#` is replaced by a digit.

use crate::error::GeneratorError;
use crate::generator::{check_capacity, state_mut, InitOptions, ValueGenerator};
use crate::prng::Prng;
use crate::unique::{IntervalSampler, UniqueCapacity};
use seed_core::GeneratedValue;

pub const DEFAULT_PHONE_TEMPLATE: &str = "+1 (###) ###-####";
pub const POSTCODE_TEMPLATES: &[&str] = &["#####", "#####-####"];

#[derive(Debug)]
enum TemplateState {
    Random(Prng),
    Unique(Prng, IntervalSampler),
}

#[derive(Debug)]
pub struct TemplateGenerator {
    name: &'static str,
    templates: Vec<String>,
    unique: bool,
    state: Option<TemplateState>,
}

impl TemplateGenerator {
    pub fn new(
        name: &'static str,
        templates: Vec<String>,
        unique: bool,
    ) -> Result<Self, GeneratorError> {
        if templates.is_empty() {
            return Err(GeneratorError::invalid(name, "at least one template is required"));
        }
        Ok(Self {
            name,
            templates,
            unique,
            state: None,
        })
    }

    pub fn phone_number(template: Option<String>, unique: bool) -> Result<Self, GeneratorError> {
        let template = template.unwrap_or_else(|| DEFAULT_PHONE_TEMPLATE.to_string());
        Self::new("phone_number", vec![template], unique)
    }

    pub fn postcode(unique: bool) -> Result<Self, GeneratorError> {
        Self::new(
            "postcode",
            POSTCODE_TEMPLATES.iter().map(|t| t.to_string()).collect(),
            unique,
        )
    }

    fn slots(template: &str) -> u32 {
        template.chars().filter(|c| *c == '#').count() as u32
    }

    fn template_domain(template: &str) -> UniqueCapacity {
        match 10u128.checked_pow(Self::slots(template)) {
            Some(size) => UniqueCapacity::Finite(size),
            None => UniqueCapacity::Unbounded,
        }
    }

    /// Fill `template` with the decimal digits of `value`, most significant first.
    fn fill(template: &str, mut value: u128) -> String {
        let slots = Self::slots(template);
        let mut digits = Vec::with_capacity(slots as usize);
        for _ in 0..slots {
            digits.push(char::from(b'0' + (value % 10) as u8));
            value /= 10;
        }
        template
            .chars()
            .map(|c| if c == '#' { digits.pop().unwrap_or('0') } else { c })
            .collect()
    }
}

impl ValueGenerator for TemplateGenerator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        let prng = Prng::new(options.seed);
        self.state = Some(if self.unique {
            check_capacity(self, &options)?;
            let domain = self.max_unique_count().finite().unwrap_or(i128::MAX as u128);
            TemplateState::Unique(prng, IntervalSampler::indices(domain))
        } else {
            TemplateState::Random(prng)
        });
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let value = match state_mut(&mut self.state, self.name)? {
            TemplateState::Random(prng) => {
                let template = &self.templates[prng.index(self.templates.len())];
                let size = Self::template_domain(template).finite().unwrap_or(u64::MAX as u128);
                Self::fill(template, prng.bigint(0, size as i128 - 1) as u128)
            }
            TemplateState::Unique(prng, sampler) => {
                // templates occupy consecutive blocks of the index domain
                let mut offset = sampler.draw_index(prng)?;
                let mut chosen = None;
                for template in &self.templates {
                    let size = Self::template_domain(template).finite().unwrap_or(u128::MAX);
                    if offset < size {
                        chosen = Some(template);
                        break;
                    }
                    offset -= size;
                }
                let template = chosen.ok_or(GeneratorError::IntervalPoolEmpty)?;
                Self::fill(template, offset)
            }
        };
        Ok(GeneratedValue::String(value))
    }

    fn max_unique_count(&self) -> UniqueCapacity {
        let mut total: u128 = 0;
        for template in &self.templates {
            match Self::template_domain(template) {
                UniqueCapacity::Finite(size) => match total.checked_add(size) {
                    Some(next) => total = next,
                    None => return UniqueCapacity::Unbounded,
                },
                UniqueCapacity::Unbounded => return UniqueCapacity::Unbounded,
            }
        }
        UniqueCapacity::Finite(total)
    }

    fn is_unique(&self) -> bool {
        self.unique
    }
}
