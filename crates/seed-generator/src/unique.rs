//! Building blocks for unique generation.
//!
//! - [`IntervalSampler`]: shrinking-interval sampling over an integer domain
//! - [`mixed_radix_decode`]: index -> Cartesian-product components
//! - [`IndexedRange`]: closed-form arithmetic progression with `at(i)`
//! - [`UniqueCapacity`]: declared size of a generator's unique domain

use crate::error::GeneratorError;
use crate::prng::Prng;

/// Size of a generator's unique-value domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueCapacity {
    Finite(u128),
    Unbounded,
}

impl UniqueCapacity {
    /// Capacity of an inclusive integer range.
    pub fn of_range(min: i128, max: i128) -> Self {
        if max < min {
            return Self::Finite(0);
        }
        match (max.wrapping_sub(min) as u128).checked_add(1) {
            Some(size) => Self::Finite(size),
            None => Self::Unbounded,
        }
    }

    /// Product of several capacities; overflow saturates to `Unbounded`.
    pub fn product(parts: impl IntoIterator<Item = UniqueCapacity>) -> Self {
        let mut total: u128 = 1;
        for part in parts {
            match part {
                Self::Unbounded => return Self::Unbounded,
                Self::Finite(n) => match total.checked_mul(n) {
                    Some(next) => total = next,
                    None => return Self::Unbounded,
                },
            }
        }
        Self::Finite(total)
    }

    /// Finite size, if any.
    pub fn finite(self) -> Option<u128> {
        match self {
            Self::Finite(n) => Some(n),
            Self::Unbounded => None,
        }
    }

    /// Fail with [`GeneratorError::Exhausted`] if `requested` exceeds the domain.
    pub fn check(self, generator: &'static str, requested: u64) -> Result<(), GeneratorError> {
        match self {
            Self::Finite(available) if (requested as u128) > available => {
                Err(GeneratorError::Exhausted {
                    generator,
                    requested,
                    available,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Draws distinct integers from `[min, max]` without replacement.
///
/// Keeps a list of disjoint inclusive intervals. Each draw picks an interval
/// uniformly, draws a value inside it, and splits the interval around the
/// value.
#[derive(Debug, Clone)]
pub struct IntervalSampler {
    intervals: Vec<(i128, i128)>,
    remaining: u128,
}

impl IntervalSampler {
    /// Sampler over `[min, max]`.
    pub fn new(min: i128, max: i128) -> Self {
        let remaining = UniqueCapacity::of_range(min, max)
            .finite()
            .unwrap_or(u128::MAX);
        let intervals = if max < min { Vec::new() } else { vec![(min, max)] };
        Self {
            intervals,
            remaining,
        }
    }

    /// Sampler over the indices `[0, len)`.
    pub fn indices(len: u128) -> Self {
        if len == 0 {
            return Self::new(0, -1);
        }
        Self::new(0, (len - 1).min(i128::MAX as u128) as i128)
    }

    /// Number of values not yet drawn.
    pub fn remaining(&self) -> u128 {
        self.remaining
    }

    /// Draw the next distinct value.
    pub fn draw(&mut self, prng: &mut Prng) -> Result<i128, GeneratorError> {
        if self.intervals.is_empty() {
            return Err(GeneratorError::IntervalPoolEmpty);
        }
        let idx = prng.index(self.intervals.len());
        let (lo, hi) = self.intervals[idx];
        let value = prng.bigint(lo, hi);

        if lo == hi {
            self.intervals.swap_remove(idx);
        } else if value == lo {
            self.intervals[idx] = (lo + 1, hi);
        } else if value == hi {
            self.intervals[idx] = (lo, hi - 1);
        } else {
            self.intervals[idx] = (lo, value - 1);
            self.intervals.push((value + 1, hi));
        }
        self.remaining = self.remaining.saturating_sub(1);
        Ok(value)
    }

    /// Draw the next distinct index, for index-based sampling.
    pub fn draw_index(&mut self, prng: &mut Prng) -> Result<u128, GeneratorError> {
        self.draw(prng).map(|v| v as u128)
    }
}

/// Decode `index` into per-component indices. The last component varies
/// fastest. Radices of zero yield zero components.
pub fn mixed_radix_decode(mut index: u128, radices: &[u128]) -> Vec<u128> {
    let mut parts = vec![0; radices.len()];
    for (slot, radix) in parts.iter_mut().zip(radices).rev() {
        if *radix == 0 {
            continue;
        }
        *slot = index % radix;
        index /= radix;
    }
    parts
}

/// Arithmetic progression `start, start + step, ...` of `len` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedRange {
    pub start: i128,
    pub step: i128,
    pub len: u128,
}

impl IndexedRange {
    /// Every integer in `[min, max]`.
    pub fn inclusive(min: i128, max: i128) -> Self {
        Self {
            start: min,
            step: 1,
            len: UniqueCapacity::of_range(min, max).finite().unwrap_or(u128::MAX),
        }
    }

    /// Element at `index`; callers keep `index < len`.
    pub fn at(&self, index: u128) -> i128 {
        self.start + self.step * index as i128
    }
}
