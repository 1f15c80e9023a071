//! Choice generators: values from a literal pool, enums and weighted mixes.

use crate::error::GeneratorError;
use crate::generator::{state_mut, BoxedGenerator, InitOptions, ValueGenerator};
use crate::hash::hash_seed_string;
use crate::prng::Prng;
use crate::unique::{IntervalSampler, UniqueCapacity};
use seed_core::{GeneratedValue, ValuePool, WithCount};

/// Slots of the precomputed weight pool.
pub const WEIGHT_POOL_SIZE: usize = 100;

/// Allowed distance between the weight sum and 1.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Expand weights into a pool of [`WEIGHT_POOL_SIZE`] entry indices, each
/// entry taking a share of slots proportional to its weight. Drawing
/// uniformly from the pool approximates weighted sampling to about 1%.
pub fn weighted_indices(weights: &[f64]) -> Result<Vec<usize>, GeneratorError> {
    let sum: f64 = weights.iter().sum();
    if weights.is_empty()
        || weights.iter().any(|w| !w.is_finite() || *w < 0.0)
        || (sum - 1.0).abs() > WEIGHT_TOLERANCE
    {
        return Err(GeneratorError::InvalidWeights(sum));
    }

    let mut pool = Vec::with_capacity(WEIGHT_POOL_SIZE);
    let mut cumulative = 0.0;
    for (idx, weight) in weights.iter().enumerate() {
        cumulative += weight;
        let target = ((cumulative * WEIGHT_POOL_SIZE as f64).round() as usize).min(WEIGHT_POOL_SIZE);
        while pool.len() < target {
            pool.push(idx);
        }
    }
    while pool.len() < WEIGHT_POOL_SIZE {
        pool.push(weights.len() - 1);
    }
    Ok(pool)
}

/// Largest count a [`WithCount`] can produce.
pub fn max_count(count: &WithCount) -> u64 {
    match count {
        WithCount::Fixed(n) => *n,
        WithCount::Weighted(branches) => branches
            .iter()
            .filter(|b| b.weight > 0.0)
            .flat_map(|b| b.count.values())
            .max()
            .unwrap_or(0),
    }
}

/// Draws counts from a [`WithCount`]: a branch through the weight pool, then
/// one of the branch's candidate counts uniformly.
#[derive(Debug)]
pub struct CountSampler {
    count: WithCount,
    pool: Vec<usize>,
}

impl CountSampler {
    pub fn new(count: WithCount) -> Result<Self, GeneratorError> {
        let pool = match &count {
            WithCount::Fixed(_) => Vec::new(),
            WithCount::Weighted(branches) => {
                let weights: Vec<f64> = branches.iter().map(|b| b.weight).collect();
                weighted_indices(&weights)?
            }
        };
        Ok(Self { count, pool })
    }

    pub fn draw(&self, prng: &mut Prng) -> u64 {
        match &self.count {
            WithCount::Fixed(n) => *n,
            WithCount::Weighted(branches) => {
                let branch = &branches[self.pool[prng.index(self.pool.len())]];
                let candidates = branch.count.values();
                if candidates.is_empty() {
                    return 0;
                }
                candidates[prng.index(candidates.len())]
            }
        }
    }
}

#[derive(Debug)]
enum ValuesState {
    Random {
        prng: Prng,
        pool: Vec<usize>,
    },
    Unique {
        prng: Prng,
        pool: Vec<usize>,
        samplers: Vec<IntervalSampler>,
        /// Cumulative repeat caps per group, when values are capped
        caps: Option<Vec<Vec<u64>>>,
    },
    Ordered {
        sequence: Vec<(usize, usize)>,
        cursor: usize,
    },
}

/// Values drawn from literal groups.
///
/// A plain pool is a single group. Weighted pools pick a group through the
/// weight pool, then a value inside the group. Repeat counts turn the
/// generator into an ordered slice: value `i` is emitted `repeats[i]` times
/// in a row, which is how child rows are spread across parent rows.
///
/// A repeat cap draws, per value, how many rows may share it. Draws then take
/// slots without replacement, so no value exceeds its cap.
#[derive(Debug)]
pub struct ValuesFromArrayGenerator {
    name: &'static str,
    groups: Vec<Vec<GeneratedValue>>,
    weights: Option<Vec<f64>>,
    repeats: Option<Vec<u64>>,
    max_repeats: Option<WithCount>,
    unique: bool,
    not_null: bool,
    state: Option<ValuesState>,
}

impl ValuesFromArrayGenerator {
    pub fn new(values: Vec<GeneratedValue>) -> Self {
        Self {
            name: "values_from_array",
            groups: vec![values],
            weights: None,
            repeats: None,
            max_repeats: None,
            unique: false,
            not_null: false,
            state: None,
        }
    }

    /// Build from a configured pool.
    pub fn from_pool(pool: &ValuePool) -> Self {
        match pool {
            ValuePool::Plain(values) => {
                Self::new(values.iter().map(GeneratedValue::from_yaml).collect())
            }
            ValuePool::Weighted(groups) => Self {
                groups: groups
                    .iter()
                    .map(|g| g.values.iter().map(GeneratedValue::from_yaml).collect())
                    .collect(),
                weights: Some(groups.iter().map(|g| g.weight).collect()),
                ..Self::new(Vec::new())
            },
        }
    }

    /// One of the column's enum values.
    pub fn enumeration(values: &[String]) -> Self {
        let mut generator = Self::new(values.iter().cloned().map(GeneratedValue::String).collect());
        generator.name = "enum";
        generator
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn not_null(mut self, not_null: bool) -> Self {
        self.not_null = not_null;
        self
    }

    /// Emit value `i` exactly `repeats[i]` times, in order.
    pub fn with_repeats(mut self, repeats: Vec<u64>) -> Self {
        self.repeats = Some(repeats);
        self
    }

    /// Let each value appear in at most a drawn number of rows.
    pub fn with_max_repeats(mut self, cap: WithCount) -> Self {
        self.max_repeats = Some(cap);
        self
    }

    fn total(&self) -> u64 {
        self.groups.iter().map(|g| g.len() as u64).sum()
    }

    fn init_ordered(&self, repeats: &[u64], count: u64) -> Result<ValuesState, GeneratorError> {
        if self.unique && repeats.iter().any(|r| *r > 1) {
            return Err(GeneratorError::UniqueWithRepeats(self.name));
        }
        let flat: Vec<(usize, usize)> = self
            .groups
            .iter()
            .enumerate()
            .flat_map(|(g, values)| (0..values.len()).map(move |v| (g, v)))
            .collect();
        let mut sequence = Vec::new();
        for (slot, times) in flat.iter().zip(repeats) {
            for _ in 0..*times {
                sequence.push(*slot);
            }
        }
        if self.not_null && (sequence.len() as u64) < count {
            return Err(GeneratorError::invalid(
                self.name,
                format!("repeat counts cover {} rows, {count} requested", sequence.len()),
            ));
        }
        Ok(ValuesState::Ordered {
            sequence,
            cursor: 0,
        })
    }

    /// Cumulative per-group caps, drawn from a stream independent of the
    /// value draws.
    fn draw_caps(&self, cap: &WithCount, seed: i64) -> Result<Vec<Vec<u64>>, GeneratorError> {
        let sampler = CountSampler::new(cap.clone())?;
        let mut prng = Prng::new(seed.wrapping_add(hash_seed_string("max_repeated_values")));
        Ok(self
            .groups
            .iter()
            .map(|group| {
                let mut end = 0;
                group
                    .iter()
                    .map(|_| {
                        end += sampler.draw(&mut prng);
                        end
                    })
                    .collect()
            })
            .collect())
    }
}

impl ValueGenerator for ValuesFromArrayGenerator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        if let Some(repeats) = &self.repeats {
            self.state = Some(self.init_ordered(repeats, options.count)?);
            return Ok(());
        }

        let pool = match &self.weights {
            Some(weights) => weighted_indices(weights)?,
            None => vec![0; WEIGHT_POOL_SIZE],
        };
        let prng = Prng::new(options.seed);

        if let Some(cap) = &self.max_repeats {
            if self.unique && max_count(cap) > 1 {
                return Err(GeneratorError::UniqueWithRepeats(self.name));
            }
            let caps = self.draw_caps(cap, options.seed)?;
            let available: u64 = caps.iter().filter_map(|g| g.last()).sum();
            if self.not_null && !options.skip_check && available < options.count {
                return Err(GeneratorError::invalid(
                    self.name,
                    format!("repeat caps allow {available} rows, {} requested", options.count),
                ));
            }
            let samplers = caps
                .iter()
                .map(|g| IntervalSampler::indices(g.last().copied().unwrap_or(0) as u128))
                .collect();
            self.state = Some(ValuesState::Unique {
                prng,
                pool,
                samplers,
                caps: Some(caps),
            });
        } else if self.unique {
            let available = self.total();
            if self.not_null && !options.skip_check && available < options.count {
                return Err(GeneratorError::NotEnoughUniqueValues {
                    generator: self.name,
                    requested: options.count,
                    available,
                });
            }
            let samplers = self
                .groups
                .iter()
                .map(|g| IntervalSampler::indices(g.len() as u128))
                .collect();
            self.state = Some(ValuesState::Unique {
                prng,
                pool,
                samplers,
                caps: None,
            });
        } else {
            if self.total() == 0 && self.not_null {
                return Err(GeneratorError::invalid(self.name, "the value pool is empty"));
            }
            self.state = Some(ValuesState::Random { prng, pool });
        }
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let not_null = self.not_null;
        let groups = &self.groups;
        let slot = match state_mut(&mut self.state, self.name)? {
            ValuesState::Ordered { sequence, cursor } => {
                let slot = sequence.get(*cursor).copied();
                *cursor += 1;
                slot
            }
            ValuesState::Random { prng, pool } => {
                let mut group = pool[prng.index(pool.len())];
                if groups[group].is_empty() {
                    // weighted groups may be empty; fall back to any non-empty one
                    match groups.iter().position(|g| !g.is_empty()) {
                        Some(found) => group = found,
                        None => return Ok(GeneratedValue::Null),
                    }
                }
                Some((group, prng.index(groups[group].len())))
            }
            ValuesState::Unique {
                prng,
                pool,
                samplers,
                caps,
            } => {
                let preferred = pool[prng.index(pool.len())];
                let group = (0..samplers.len())
                    .map(|offset| (preferred + offset) % samplers.len())
                    .find(|g| samplers[*g].remaining() > 0);
                match group {
                    Some(group) => {
                        let drawn = samplers[group].draw_index(prng)?;
                        let value = match caps {
                            // slot -> first value whose cumulative cap exceeds it
                            Some(caps) => {
                                caps[group].partition_point(|end| u128::from(*end) <= drawn)
                            }
                            None => drawn as usize,
                        };
                        Some((group, value))
                    }
                    None if not_null => return Err(GeneratorError::IntervalPoolEmpty),
                    None => None,
                }
            }
        };
        Ok(slot
            .and_then(|(group, value)| groups.get(group)?.get(value).cloned())
            .unwrap_or(GeneratedValue::Null))
    }

    fn max_unique_count(&self) -> UniqueCapacity {
        UniqueCapacity::Finite(self.total() as u128)
    }

    fn is_unique(&self) -> bool {
        self.unique
    }
}

#[derive(Debug)]
struct WeightedState {
    prng: Prng,
    pool: Vec<usize>,
    sequence: Vec<usize>,
    cursor: usize,
}

/// Weighted mix of child generators.
///
/// `init` decides up front which child serves each row, so every child is
/// initialised with the exact number of values it will produce.
#[derive(Debug)]
pub struct WeightedRandomGenerator {
    entries: Vec<(f64, BoxedGenerator)>,
    state: Option<WeightedState>,
}

impl WeightedRandomGenerator {
    pub fn new(entries: Vec<(f64, BoxedGenerator)>) -> Self {
        Self {
            entries,
            state: None,
        }
    }
}

impl ValueGenerator for WeightedRandomGenerator {
    fn name(&self) -> &'static str {
        "weighted_random"
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        let weights: Vec<f64> = self.entries.iter().map(|(w, _)| *w).collect();
        let pool = weighted_indices(&weights)?;
        let mut prng = Prng::new(options.seed);
        let sequence: Vec<usize> = (0..options.count)
            .map(|_| pool[prng.index(pool.len())])
            .collect();

        for (idx, (_, child)) in self.entries.iter_mut().enumerate() {
            let count = sequence.iter().filter(|e| **e == idx).count() as u64;
            child.init(InitOptions {
                count,
                seed: options.seed.wrapping_add(idx as i64 + 1),
                skip_check: options.skip_check,
            })?;
        }

        self.state = Some(WeightedState {
            prng,
            pool,
            sequence,
            cursor: 0,
        });
        Ok(())
    }

    fn generate(&mut self, index: u64) -> Result<GeneratedValue, GeneratorError> {
        let state = state_mut(&mut self.state, "weighted_random")?;
        let entry = match state.sequence.get(state.cursor) {
            Some(entry) => *entry,
            None => state.pool[state.prng.index(state.pool.len())],
        };
        state.cursor += 1;
        match self.entries.get_mut(entry) {
            Some((_, child)) => child.generate(index),
            None => Ok(GeneratedValue::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::numeric::IntGenerator;
    use crate::generator::GeneratorParams;
    use seed_core::DataType;
    use std::collections::{HashMap, HashSet};

    fn strings(values: &[&str]) -> Vec<GeneratedValue> {
        values.iter().map(|v| GeneratedValue::from(*v)).collect()
    }

    #[test]
    fn test_weighted_indices_proportions() {
        let pool = weighted_indices(&[0.7, 0.3]).unwrap();
        assert_eq!(pool.len(), WEIGHT_POOL_SIZE);
        assert_eq!(pool.iter().filter(|i| **i == 0).count(), 70);
        assert_eq!(pool.iter().filter(|i| **i == 1).count(), 30);
    }

    #[test]
    fn test_weighted_indices_tolerance() {
        assert!(weighted_indices(&[0.1, 0.2, 0.7000000001]).is_ok());
        assert!(matches!(
            weighted_indices(&[0.5, 0.6]),
            Err(GeneratorError::InvalidWeights(_))
        ));
        assert!(weighted_indices(&[]).is_err());
    }

    #[test]
    fn test_values_from_plain_pool() {
        let mut generator = ValuesFromArrayGenerator::new(strings(&["a", "b", "c"]));
        generator.init(InitOptions::new(20, 1)).unwrap();
        for i in 0..20 {
            let value = generator.generate(i).unwrap();
            assert!(["a", "b", "c"].contains(&value.as_str().unwrap()));
        }
    }

    #[test]
    fn test_unique_values_not_null_infeasible() {
        let mut generator = ValuesFromArrayGenerator::new(strings(&["a", "b"]))
            .unique(true)
            .not_null(true);
        let err = generator.init(InitOptions::new(3, 1)).unwrap_err();
        assert_eq!(
            err,
            GeneratorError::NotEnoughUniqueValues {
                generator: "values_from_array",
                requested: 3,
                available: 2
            }
        );
    }

    #[test]
    fn test_unique_values_nullable_overflow_is_null() {
        let mut generator = ValuesFromArrayGenerator::new(strings(&["a", "b"])).unique(true);
        generator.init(InitOptions::new(3, 1)).unwrap();
        let values: Vec<GeneratedValue> = (0..3).map(|i| generator.generate(i).unwrap()).collect();
        assert_eq!(values.iter().filter(|v| v.is_null()).count(), 1);
        let distinct: HashSet<String> = values.iter().map(GeneratedValue::unique_key).collect();
        assert_eq!(distinct.len(), 3);
    }

    #[test]
    fn test_weighted_pool_unique() {
        let pool: ValuePool = serde_yaml::from_str(
            "[{ weight: 0.5, values: [a, b] }, { weight: 0.5, values: [c, d, e] }]",
        )
        .unwrap();
        let mut generator = ValuesFromArrayGenerator::from_pool(&pool).unique(true).not_null(true);
        generator.init(InitOptions::new(5, 2)).unwrap();
        let values: HashSet<String> = (0..5)
            .map(|i| generator.generate(i).unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(values.len(), 5);
    }

    #[test]
    fn test_ordered_repeats() {
        let mut generator = ValuesFromArrayGenerator::new(vec![GeneratedValue::Int(1), GeneratedValue::Int(2), GeneratedValue::Int(3)])
            .with_repeats(vec![2, 2, 2]);
        generator.init(InitOptions::new(6, 0)).unwrap();
        let values: Vec<i128> = (0..6)
            .map(|i| generator.generate(i).unwrap().as_i128().unwrap())
            .collect();
        assert_eq!(values, vec![1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn test_unique_with_repeats_rejected() {
        let mut generator = ValuesFromArrayGenerator::new(vec![GeneratedValue::Int(1)])
            .unique(true)
            .with_repeats(vec![2]);
        assert_eq!(
            generator.init(InitOptions::new(2, 0)),
            Err(GeneratorError::UniqueWithRepeats("values_from_array"))
        );
    }

    #[test]
    fn test_repeat_cap_respected() {
        let values: Vec<GeneratedValue> = (0..10).map(GeneratedValue::Int).collect();
        let mut generator = ValuesFromArrayGenerator::new(values)
            .not_null(true)
            .with_max_repeats(WithCount::Fixed(3));
        generator.init(InitOptions::new(30, 5)).unwrap();
        let mut seen: HashMap<i128, usize> = HashMap::new();
        for i in 0..30 {
            *seen.entry(generator.generate(i).unwrap().as_i128().unwrap()).or_default() += 1;
        }
        assert_eq!(seen.len(), 10);
        assert!(seen.values().all(|n| *n == 3));
    }

    #[test]
    fn test_weighted_repeat_cap() {
        let cap: WithCount = serde_yaml::from_str(
            "[{ weight: 0.5, count: 1 }, { weight: 0.5, count: [2, 4] }]",
        )
        .unwrap();
        assert_eq!(max_count(&cap), 4);
        let mut generator = ValuesFromArrayGenerator::new(strings(&["a", "b", "c", "d", "e"]))
            .with_max_repeats(cap);
        generator.init(InitOptions::new(40, 9)).unwrap();
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut nulls = 0;
        for i in 0..40 {
            match generator.generate(i).unwrap() {
                GeneratedValue::Null => nulls += 1,
                value => *seen.entry(value.as_str().unwrap().to_string()).or_default() += 1,
            }
        }
        assert!(seen.values().all(|n| *n <= 4));
        // at most 5 * 4 slots, the rest overflow to null
        assert!(nulls >= 20);
    }

    #[test]
    fn test_capped_draws_are_deterministic() {
        let values: Vec<GeneratedValue> = (0..50).map(GeneratedValue::Int).collect();
        let capped = |cap| {
            let mut generator = ValuesFromArrayGenerator::new(values.clone())
                .with_max_repeats(WithCount::Fixed(cap));
            generator.init(InitOptions::new(5, 11)).unwrap();
            (0..5).map(|i| generator.generate(i).unwrap()).collect::<Vec<_>>()
        };
        let first = capped(2);
        assert_eq!(first.len(), 5);
        assert_eq!(first, capped(2));
    }

    #[test]
    fn test_repeat_cap_too_small_for_not_null() {
        let mut generator = ValuesFromArrayGenerator::new(strings(&["a", "b"]))
            .not_null(true)
            .with_max_repeats(WithCount::Fixed(2));
        assert!(matches!(
            generator.init(InitOptions::new(5, 0)),
            Err(GeneratorError::InvalidParams { .. })
        ));
    }

    #[test]
    fn test_unique_with_repeat_cap_rejected() {
        let mut generator = ValuesFromArrayGenerator::enumeration(&["x".to_string(), "y".to_string()])
            .unique(true)
            .with_max_repeats(WithCount::Fixed(2));
        assert_eq!(
            generator.init(InitOptions::new(2, 0)),
            Err(GeneratorError::UniqueWithRepeats("enum"))
        );

        let mut generator = ValuesFromArrayGenerator::new(strings(&["a", "b"]))
            .unique(true)
            .with_max_repeats(WithCount::Fixed(1));
        generator.init(InitOptions::new(2, 0)).unwrap();
        let values: HashSet<String> = (0..2)
            .map(|i| generator.generate(i).unwrap().unique_key())
            .collect();
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_enum_values() {
        let mut generator =
            ValuesFromArrayGenerator::enumeration(&["red".to_string(), "green".to_string()]);
        assert_eq!(generator.name(), "enum");
        generator.init(InitOptions::new(4, 0)).unwrap();
        let value = generator.generate(0).unwrap();
        assert!(["red", "green"].contains(&value.as_str().unwrap()));
    }

    #[test]
    fn test_weighted_random_children_get_exact_counts() {
        let params = GeneratorParams::new(DataType::Number, "integer");
        let low = IntGenerator::new(Some(0), Some(9), params.clone()).unwrap();
        let high = IntGenerator::new(Some(100), Some(109), params).unwrap();
        let mut generator =
            WeightedRandomGenerator::new(vec![(0.5, Box::new(low)), (0.5, Box::new(high))]);
        generator.init(InitOptions::new(200, 3)).unwrap();
        let values: Vec<i128> = (0..200)
            .map(|i| generator.generate(i).unwrap().as_i128().unwrap())
            .collect();
        let low_count = values.iter().filter(|v| **v < 10).count();
        assert!(low_count > 50 && low_count < 150);
        assert!(values.iter().all(|v| *v < 10 || (100..110).contains(v)));
    }
}
