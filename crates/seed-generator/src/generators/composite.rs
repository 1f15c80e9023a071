//! Wrappers layered over other generators: arrays, composite unique keys and
//! self-referencing foreign keys.

use crate::error::GeneratorError;
use crate::generator::{state_mut, BoxedGenerator, InitOptions, ValueGenerator};
use crate::prng::Prng;
use crate::unique::{mixed_radix_decode, IntervalSampler, UniqueCapacity};
use seed_core::GeneratedValue;

/// Default element count of generated arrays.
pub const DEFAULT_ARRAY_SIZE: u32 = 3;

/// Fixed-length arrays; the base generator serves `count × size` values.
#[derive(Debug)]
pub struct ArrayGenerator {
    base: BoxedGenerator,
    size: u32,
}

impl ArrayGenerator {
    pub fn new(base: BoxedGenerator, size: u32) -> Self {
        Self { base, size }
    }
}

impl ValueGenerator for ArrayGenerator {
    fn name(&self) -> &'static str {
        "array"
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        self.base.init(InitOptions {
            count: options.count.saturating_mul(self.size as u64),
            ..options
        })
    }

    fn generate(&mut self, index: u64) -> Result<GeneratedValue, GeneratorError> {
        let items = (0..self.size)
            .map(|_| self.base.generate(index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(GeneratedValue::Array(items))
    }

    fn max_unique_count(&self) -> UniqueCapacity {
        match self.base.max_unique_count() {
            UniqueCapacity::Finite(n) => UniqueCapacity::Finite(n / self.size.max(1) as u128),
            UniqueCapacity::Unbounded => UniqueCapacity::Unbounded,
        }
    }

    fn is_unique(&self) -> bool {
        self.base.is_unique()
    }
}

/// Smallest `r` with `r^k >= n`.
fn ceil_root(n: u128, k: u32) -> u128 {
    if n <= 1 || k <= 1 {
        return n;
    }
    let mut root = (n as f64).powf(1.0 / k as f64).ceil() as u128;
    let reaches = |r: u128| r.checked_pow(k).map_or(true, |p| p >= n);
    while !reaches(root) {
        root += 1;
    }
    while root > 1 && reaches(root - 1) {
        root -= 1;
    }
    root
}

#[derive(Debug)]
struct CompositeState {
    prng: Prng,
    sampler: IntervalSampler,
    radices: Vec<u128>,
    pools: Vec<Vec<GeneratedValue>>,
}

/// Joint uniqueness over a multi-column unique constraint.
///
/// Each member generator contributes a local pool of distinct values. Pool
/// sizes are balanced as the k-th root of the requested row count, saturating
/// the members with the smallest domains first and spreading the remaining
/// budget across the rest. Rows then take distinct tuples from the Cartesian
/// product of the pools.
#[derive(Debug)]
pub struct CompositeUniqueGenerator {
    columns: Vec<String>,
    members: Vec<BoxedGenerator>,
    state: Option<CompositeState>,
}

impl CompositeUniqueGenerator {
    pub fn new(members: Vec<(String, BoxedGenerator)>) -> Self {
        let (columns, members) = members.into_iter().unzip();
        Self {
            columns,
            members,
            state: None,
        }
    }

    /// Column names in tuple order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Per-member pool sizes whose product reaches `count`.
    fn local_counts(&self, count: u64) -> Result<Vec<u128>, GeneratorError> {
        let capacities: Vec<UniqueCapacity> =
            self.members.iter().map(|m| m.max_unique_count()).collect();
        let mut order: Vec<usize> = (0..self.members.len()).collect();
        order.sort_by_key(|i| capacities[*i].finite().unwrap_or(u128::MAX));

        let mut locals = vec![0u128; self.members.len()];
        let mut remaining = count as u128;
        for (pos, member) in order.iter().enumerate() {
            let left = (order.len() - pos) as u32;
            let mut local = ceil_root(remaining, left);
            if let UniqueCapacity::Finite(cap) = capacities[*member] {
                local = local.min(cap);
            }
            locals[*member] = local;
            if local > 0 {
                remaining = remaining.div_ceil(local);
            }
        }

        let reachable = locals.iter().try_fold(1u128, |acc, l| acc.checked_mul(*l));
        if reachable.is_some_and(|total| total < count as u128) {
            return Err(GeneratorError::CompositeExhausted {
                columns: self.columns.join(","),
                requested: count,
                available: UniqueCapacity::product(capacities)
                    .finite()
                    .unwrap_or(u128::MAX),
            });
        }
        Ok(locals)
    }

    pub fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        let locals = self.local_counts(options.count)?;
        let mut pools = Vec::with_capacity(self.members.len());
        for (idx, (member, local)) in self.members.iter_mut().zip(&locals).enumerate() {
            let local = u64::try_from(*local).unwrap_or(u64::MAX);
            // local_counts already bounded every local by its member's capacity
            member.init(
                InitOptions::new(local, options.seed.wrapping_add(idx as i64)).with_skip_check(),
            )?;
            let pool = (0..local)
                .map(|i| member.generate(i))
                .collect::<Result<Vec<_>, _>>()?;
            pools.push(pool);
        }
        let domain = UniqueCapacity::product(locals.iter().map(|l| UniqueCapacity::Finite(*l)))
            .finite()
            .unwrap_or(i128::MAX as u128);
        self.state = Some(CompositeState {
            prng: Prng::new(options.seed),
            sampler: IntervalSampler::indices(domain),
            radices: locals,
            pools,
        });
        Ok(())
    }

    /// Next distinct tuple, as `(column, value)` pairs.
    pub fn generate_tuple(&mut self) -> Result<Vec<(String, GeneratedValue)>, GeneratorError> {
        let state = state_mut(&mut self.state, "composite_unique")?;
        let index = state.sampler.draw_index(&mut state.prng)?;
        let parts = mixed_radix_decode(index, &state.radices);
        Ok(self
            .columns
            .iter()
            .zip(parts)
            .zip(&state.pools)
            .map(|((column, part), pool)| {
                let value = pool.get(part as usize).cloned().unwrap_or(GeneratedValue::Null);
                (column.clone(), value)
            })
            .collect())
    }
}

#[derive(Debug)]
struct SelfRelationState {
    prng: Prng,
    root_count: usize,
}

/// Self-referencing foreign key shaped as a shallow forest.
///
/// The first 20-40% of rows are roots: null when the column is nullable,
/// otherwise a reference to the row's own key. Every later row references a
/// uniformly chosen root.
#[derive(Debug)]
pub struct SelfRelationGenerator {
    keys: Vec<GeneratedValue>,
    not_null: bool,
    state: Option<SelfRelationState>,
}

impl SelfRelationGenerator {
    /// `keys[i]` is the referenced key of row `i`.
    pub fn new(keys: Vec<GeneratedValue>, not_null: bool) -> Self {
        Self {
            keys,
            not_null,
            state: None,
        }
    }
}

impl ValueGenerator for SelfRelationGenerator {
    fn name(&self) -> &'static str {
        "self_relation"
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        let mut prng = Prng::new(options.seed);
        let share = prng.int(20, 40) as u64;
        let roots = options.count.saturating_mul(share).div_ceil(100).max(1);
        let root_count = (roots as usize).min(self.keys.len());
        if root_count == 0 && options.count > 0 {
            return Err(GeneratorError::invalid(
                "self_relation",
                "no referenced keys to point at",
            ));
        }
        self.state = Some(SelfRelationState { prng, root_count });
        Ok(())
    }

    fn generate(&mut self, index: u64) -> Result<GeneratedValue, GeneratorError> {
        let state = state_mut(&mut self.state, "self_relation")?;
        let index = index as usize;
        if index < state.root_count {
            if !self.not_null {
                return Ok(GeneratedValue::Null);
            }
            return Ok(self.keys[index].clone());
        }
        let root = state.prng.index(state.root_count);
        Ok(self.keys[root].clone())
    }
}
