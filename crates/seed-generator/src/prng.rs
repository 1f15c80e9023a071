//! Counter-free xoroshiro128+ core.
//!
//! The core is a pure function over [`PrngState`]: `next_int(state, min, max)`
//! returns the drawn value and the successor state. [`Prng`] wraps a state for
//! the common mutable use and plugs into `rand` through [`RngCore`].
//!
//! Range sampling is implemented here rather than through `rand`'s
//! distributions so the output for a given seed never depends on the `rand`
//! version.

use rand::{Error as RandError, RngCore, SeedableRng};

/// xoroshiro128+ state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrngState {
    s0: u64,
    s1: u64,
}

impl PrngState {
    /// Expand a single integer seed with splitmix64.
    pub fn from_seed(seed: i64) -> Self {
        let mut z = seed as u64;
        let s0 = splitmix64(&mut z);
        let s1 = splitmix64(&mut z);
        if s0 == 0 && s1 == 0 {
            // the all-zero state is a fixed point
            return Self {
                s0: 0x9E37_79B9_7F4A_7C15,
                s1: 1,
            };
        }
        Self { s0, s1 }
    }

    /// Draw 64 raw bits.
    pub fn next_u64(self) -> (u64, Self) {
        let s0 = self.s0;
        let mut s1 = self.s1;
        let result = s0.wrapping_add(s1);
        s1 ^= s0;
        let next = Self {
            s0: s0.rotate_left(24) ^ s1 ^ (s1 << 16),
            s1: s1.rotate_left(37),
        };
        (result, next)
    }
}

fn splitmix64(z: &mut u64) -> u64 {
    *z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut x = *z;
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Uniform integer in `[min, max]`. `min > max` is a caller bug and yields `min`.
pub fn next_int(state: PrngState, min: i64, max: i64) -> (i64, PrngState) {
    if min >= max {
        let (_, next) = state.next_u64();
        return (min, next);
    }
    let span = (max as i128 - min as i128 + 1) as u128;
    if span > u64::MAX as u128 {
        let (raw, next) = state.next_u64();
        return (raw as i64, next);
    }
    let span = span as u64;
    let threshold = span.wrapping_neg() % span;
    let mut state = state;
    loop {
        let (raw, next) = state.next_u64();
        state = next;
        if raw >= threshold {
            return ((min as i128 + (raw % span) as i128) as i64, state);
        }
    }
}

/// Uniform bigint in `[min, max]`.
pub fn next_bigint(state: PrngState, min: i128, max: i128) -> (i128, PrngState) {
    if min >= max {
        let (_, next) = state.next_u64();
        return (min, next);
    }
    let span = max.wrapping_sub(min) as u128;
    let mut state = state;
    if span == u128::MAX {
        let (hi, next) = state.next_u64();
        let (lo, next) = next.next_u64();
        return ((((hi as u128) << 64) | lo as u128) as i128, next);
    }
    let span = span + 1;
    let threshold = span.wrapping_neg() % span;
    loop {
        let (hi, next) = state.next_u64();
        let (lo, next) = next.next_u64();
        state = next;
        let raw = ((hi as u128) << 64) | lo as u128;
        if raw >= threshold {
            return (min.wrapping_add((raw % span) as i128), state);
        }
    }
}

/// Uniform float in `[0, 1)`.
pub fn next_unit_f64(state: PrngState) -> (f64, PrngState) {
    let (raw, next) = state.next_u64();
    ((raw >> 11) as f64 * (1.0 / (1u64 << 53) as f64), next)
}

/// Mutable convenience wrapper over [`PrngState`].
#[derive(Debug, Clone)]
pub struct Prng {
    state: PrngState,
}

impl Prng {
    /// Create a stream from an integer seed.
    pub fn new(seed: i64) -> Self {
        Self {
            state: PrngState::from_seed(seed),
        }
    }

    /// Current state, for callers that thread it explicitly.
    pub fn state(&self) -> PrngState {
        self.state
    }

    /// Uniform integer in `[min, max]`.
    pub fn int(&mut self, min: i64, max: i64) -> i64 {
        let (value, next) = next_int(self.state, min, max);
        self.state = next;
        value
    }

    /// Uniform bigint in `[min, max]`.
    pub fn bigint(&mut self, min: i128, max: i128) -> i128 {
        let (value, next) = next_bigint(self.state, min, max);
        self.state = next;
        value
    }

    /// Uniform index in `[0, len)`; `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.int(0, len.saturating_sub(1) as i64) as usize
    }

    /// Uniform float in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        let (value, next) = next_unit_f64(self.state);
        self.state = next;
        value
    }

    /// Uniform boolean.
    pub fn coin(&mut self) -> bool {
        self.int(0, 1) == 1
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.int(0, i as i64) as usize;
            items.swap(i, j);
        }
    }
}

impl RngCore for Prng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let (value, next) = self.state.next_u64();
        self.state = next;
        value
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = RngCore::next_u64(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RandError> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Prng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(i64::from_le_bytes(seed))
    }
}
