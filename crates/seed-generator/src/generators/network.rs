//! IPv4 addresses and bit strings.

use crate::error::GeneratorError;
use crate::generator::{check_capacity, state_mut, GeneratorParams, InitOptions, ValueGenerator};
use crate::prng::Prng;
use crate::unique::{IntervalSampler, UniqueCapacity};
use seed_core::GeneratedValue;
use std::net::Ipv4Addr;

#[derive(Debug)]
enum DomainState {
    Random(Prng),
    Unique(Prng, IntervalSampler),
}

impl DomainState {
    fn new(seed: i64, unique: bool, domain: u128) -> Self {
        let prng = Prng::new(seed);
        if unique {
            Self::Unique(prng, IntervalSampler::indices(domain))
        } else {
            Self::Random(prng)
        }
    }

    fn draw(&mut self, domain: u128) -> Result<u128, GeneratorError> {
        match self {
            Self::Random(prng) => Ok(prng.bigint(0, domain as i128 - 1) as u128),
            Self::Unique(prng, sampler) => sampler.draw_index(prng),
        }
    }
}

/// IPv4 addresses; the unique domain is the full 2^32 space.
#[derive(Debug)]
pub struct IpAddressGenerator {
    unique: bool,
    state: Option<DomainState>,
}

const IPV4_DOMAIN: u128 = 1 << 32;

impl IpAddressGenerator {
    pub fn new(unique: bool) -> Self {
        Self {
            unique,
            state: None,
        }
    }
}

impl ValueGenerator for IpAddressGenerator {
    fn name(&self) -> &'static str {
        "ip_address"
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        if self.unique {
            check_capacity(self, &options)?;
        }
        self.state = Some(DomainState::new(options.seed, self.unique, IPV4_DOMAIN));
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let state = state_mut(&mut self.state, "ip_address")?;
        let address = Ipv4Addr::from(state.draw(IPV4_DOMAIN)? as u32);
        Ok(GeneratedValue::String(address.to_string()))
    }

    fn max_unique_count(&self) -> UniqueCapacity {
        UniqueCapacity::Finite(IPV4_DOMAIN)
    }

    fn is_unique(&self) -> bool {
        self.unique
    }
}

const DEFAULT_BIT_LENGTH: u32 = 8;
/// Longest bit string whose whole domain fits the sampler.
const MAX_INDEXED_BITS: u32 = 126;

/// Strings of `0`/`1` of the column's `bit(n)` length.
#[derive(Debug)]
pub struct BitStringGenerator {
    length: u32,
    unique: bool,
    state: Option<DomainState>,
}

impl BitStringGenerator {
    pub fn new(
        length: Option<u32>,
        unique: bool,
        params: &GeneratorParams,
    ) -> Result<Self, GeneratorError> {
        let length = length
            .or(params.type_params.length)
            .unwrap_or(DEFAULT_BIT_LENGTH);
        if length == 0 {
            return Err(GeneratorError::invalid("bit_string", "length must be positive"));
        }
        Ok(Self {
            length,
            unique,
            state: None,
        })
    }

    fn indexed_bits(&self) -> u32 {
        self.length.min(MAX_INDEXED_BITS)
    }
}

impl ValueGenerator for BitStringGenerator {
    fn name(&self) -> &'static str {
        "bit_string"
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        if self.unique {
            check_capacity(self, &options)?;
        }
        self.state = Some(DomainState::new(
            options.seed,
            self.unique,
            1u128 << self.indexed_bits(),
        ));
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let bits = self.indexed_bits();
        let length = self.length as usize;
        let state = state_mut(&mut self.state, "bit_string")?;
        let value = state.draw(1u128 << bits)?;
        // bits beyond the indexed width are left-padded with zeros
        Ok(GeneratedValue::String(format!("{value:0>length$b}")))
    }

    fn max_unique_count(&self) -> UniqueCapacity {
        match 1u128.checked_shl(self.length).filter(|_| self.length < 128) {
            Some(size) => UniqueCapacity::Finite(size),
            None => UniqueCapacity::Unbounded,
        }
    }

    fn is_unique(&self) -> bool {
        self.unique
    }
}
