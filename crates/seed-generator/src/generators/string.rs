//! Random strings and UUIDs.

use crate::error::GeneratorError;
use crate::generator::{check_capacity, state_mut, GeneratorParams, InitOptions, ValueGenerator};
use crate::prng::Prng;
use crate::unique::UniqueCapacity;
use seed_core::{DataType, GeneratedValue};

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

const MIN_LENGTH: u32 = 7;
const MAX_LENGTH: u32 = 20;

/// Length bounds of a generated string.
///
/// Version 1 always draws from `[7, 20]`. Version 2 clamps the range to the
/// column's `varchar(n)` length.
fn length_bounds(params: &GeneratorParams, version: u32) -> (u32, u32) {
    match params.type_params.length {
        Some(limit) if version >= 2 => {
            let max = MAX_LENGTH.min(limit).max(1);
            (MIN_LENGTH.min(max), max)
        }
        _ => (MIN_LENGTH, MAX_LENGTH),
    }
}

fn random_chars(prng: &mut Prng, len: usize, out: &mut String) {
    for _ in 0..len {
        out.push(ALPHANUMERIC[prng.index(ALPHANUMERIC.len())] as char);
    }
}

fn string_value(params: &GeneratorParams, value: String) -> GeneratedValue {
    if params.data_type == DataType::Buffer {
        GeneratedValue::Bytes(value.into_bytes())
    } else {
        GeneratedValue::String(value)
    }
}

#[derive(Debug)]
pub struct StringGenerator {
    min_len: u32,
    max_len: u32,
    params: GeneratorParams,
    prng: Option<Prng>,
}

impl StringGenerator {
    pub fn new(params: GeneratorParams, version: u32) -> Self {
        let (min_len, max_len) = length_bounds(&params, version);
        Self {
            min_len,
            max_len,
            params,
            prng: None,
        }
    }
}

impl ValueGenerator for StringGenerator {
    fn name(&self) -> &'static str {
        "string"
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        self.prng = Some(Prng::new(options.seed));
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let prng = state_mut(&mut self.prng, "string")?;
        let len = prng.int(self.min_len as i64, self.max_len as i64) as usize;
        let mut value = String::with_capacity(len);
        random_chars(prng, len, &mut value);
        Ok(string_value(&self.params, value))
    }
}

/// Distinct strings: a random prefix followed by a fixed-width base-36 counter.
///
/// Two strings of the same total length share the suffix position, so distinct
/// counters always yield distinct strings.
#[derive(Debug)]
pub struct UniqueStringGenerator {
    min_len: u32,
    max_len: u32,
    params: GeneratorParams,
    state: Option<UniqueStringState>,
}

#[derive(Debug)]
struct UniqueStringState {
    prng: Prng,
    counter: u64,
    suffix_width: u32,
}

impl UniqueStringGenerator {
    pub fn new(params: GeneratorParams, version: u32) -> Self {
        let (min_len, max_len) = length_bounds(&params, version);
        Self {
            min_len,
            max_len,
            params,
            state: None,
        }
    }
}

fn base36_width(count: u64) -> u32 {
    let mut width = 1;
    let mut capacity: u64 = 36;
    while capacity < count {
        width += 1;
        capacity = capacity.saturating_mul(36);
    }
    width
}

fn push_base36(mut value: u64, width: u32, out: &mut String) {
    let mut digits = vec![b'0'; width as usize];
    for slot in digits.iter_mut().rev() {
        *slot = BASE36[(value % 36) as usize];
        value /= 36;
    }
    out.extend(digits.into_iter().map(char::from));
}

impl ValueGenerator for UniqueStringGenerator {
    fn name(&self) -> &'static str {
        "unique_string"
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        check_capacity(self, &options)?;
        self.state = Some(UniqueStringState {
            prng: Prng::new(options.seed),
            counter: 0,
            suffix_width: base36_width(options.count).min(self.max_len),
        });
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let max_len = self.max_len;
        let min_len = self.min_len;
        let state = state_mut(&mut self.state, "unique_string")?;
        if base36_width(state.counter + 1) > state.suffix_width {
            return Err(GeneratorError::Exhausted {
                generator: "unique_string",
                requested: state.counter + 1,
                available: 36u128.pow(state.suffix_width),
            });
        }
        let lower = min_len.max(state.suffix_width);
        let len = state.prng.int(lower as i64, max_len as i64) as u32;
        let mut value = String::with_capacity(len as usize);
        random_chars(&mut state.prng, (len - state.suffix_width) as usize, &mut value);
        push_base36(state.counter, state.suffix_width, &mut value);
        state.counter += 1;
        Ok(string_value(&self.params, value))
    }

    fn max_unique_count(&self) -> UniqueCapacity {
        UniqueCapacity::Finite(36u128.pow(self.max_len))
    }

    fn is_unique(&self) -> bool {
        true
    }
}

/// Seeded v4 UUIDs.
#[derive(Debug, Default)]
pub struct UuidGenerator {
    prng: Option<Prng>,
}

impl ValueGenerator for UuidGenerator {
    fn name(&self) -> &'static str {
        "uuid"
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        self.prng = Some(Prng::new(options.seed));
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let prng = state_mut(&mut self.prng, "uuid")?;
        let mut bytes = [0u8; 16];
        rand::RngCore::fill_bytes(prng, &mut bytes);
        Ok(GeneratedValue::Uuid(
            uuid::Builder::from_random_bytes(bytes).into_uuid(),
        ))
    }

    fn is_unique(&self) -> bool {
        true
    }
}
