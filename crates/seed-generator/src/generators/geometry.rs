//! Points, lines and vectors.
//!
//! All three are tuples of integers drawn from an [`IndexedRange`] per
//! component. Vectors divide each component by `10^decimal_places`.

use crate::error::GeneratorError;
use crate::generator::{check_capacity, state_mut, GeneratorParams, InitOptions, ValueGenerator};
use crate::prng::Prng;
use crate::unique::{mixed_radix_decode, IndexedRange, IntervalSampler, UniqueCapacity};
use seed_core::{DataType, GeneratedValue};
use std::collections::BTreeMap;

const DEFAULT_VECTOR_DIMENSIONS: u32 = 3;
const POINT_KEYS: &[&str] = &["x", "y"];
const LINE_KEYS: &[&str] = &["a", "b", "c"];

#[derive(Debug)]
enum CoordinateState {
    Random(Prng),
    Unique(Prng, IntervalSampler),
}

#[derive(Debug)]
pub struct CoordinateGenerator {
    name: &'static str,
    /// Object keys; `None` renders an array
    keys: Option<&'static [&'static str]>,
    components: Vec<IndexedRange>,
    divisor: f64,
    unique: bool,
    state: Option<CoordinateState>,
}

fn checked_range(name: &'static str, min: i64, max: i64) -> Result<IndexedRange, GeneratorError> {
    if min > max {
        return Err(GeneratorError::invalid(name, format!("min {min} is greater than max {max}")));
    }
    Ok(IndexedRange::inclusive(min as i128, max as i128))
}

impl CoordinateGenerator {
    /// `{x, y}`, or `[x, y]` for tuple-mode (array) columns.
    pub fn point(
        min: i64,
        max: i64,
        unique: bool,
        params: &GeneratorParams,
    ) -> Result<Self, GeneratorError> {
        let range = checked_range("point", min, max)?;
        Ok(Self {
            name: "point",
            keys: (params.data_type != DataType::Array).then_some(POINT_KEYS),
            components: vec![range; 2],
            divisor: 1.0,
            unique,
            state: None,
        })
    }

    /// `{a, b, c}` of `ax + by + c = 0`, or `[a, b, c]` for tuple-mode columns.
    pub fn line(
        min: i64,
        max: i64,
        unique: bool,
        params: &GeneratorParams,
    ) -> Result<Self, GeneratorError> {
        let range = checked_range("line", min, max)?;
        Ok(Self {
            name: "line",
            keys: (params.data_type != DataType::Array).then_some(LINE_KEYS),
            components: vec![range; 3],
            divisor: 1.0,
            unique,
            state: None,
        })
    }

    /// Fixed-dimension vector; dimensions default to the column's `vector(n)`.
    pub fn vector(
        dimensions: Option<u32>,
        min: i64,
        max: i64,
        decimal_places: u32,
        unique: bool,
        params: &GeneratorParams,
    ) -> Result<Self, GeneratorError> {
        let dimensions = dimensions
            .or(params.type_params.length)
            .unwrap_or(DEFAULT_VECTOR_DIMENSIONS);
        if dimensions == 0 {
            return Err(GeneratorError::invalid("vector", "dimensions must be positive"));
        }
        if decimal_places > 12 {
            return Err(GeneratorError::invalid("vector", "at most 12 decimal places"));
        }
        let factor = 10i64.pow(decimal_places);
        let range = checked_range(
            "vector",
            min.saturating_mul(factor),
            max.saturating_mul(factor),
        )?;
        Ok(Self {
            name: "vector",
            keys: None,
            components: vec![range; dimensions as usize],
            divisor: factor as f64,
            unique,
            state: None,
        })
    }

    fn radices(&self) -> Vec<u128> {
        self.components.iter().map(|c| c.len).collect()
    }

    fn render(&self, indices: &[u128]) -> GeneratedValue {
        let values = self
            .components
            .iter()
            .zip(indices)
            .map(|(range, index)| GeneratedValue::Float(range.at(*index) as f64 / self.divisor));
        match self.keys {
            Some(keys) => GeneratedValue::Object(
                keys.iter().map(|k| k.to_string()).zip(values).collect::<BTreeMap<_, _>>(),
            ),
            None => GeneratedValue::Array(values.collect()),
        }
    }
}

impl ValueGenerator for CoordinateGenerator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        let prng = Prng::new(options.seed);
        self.state = Some(if self.unique {
            check_capacity(self, &options)?;
            // an unbounded product is sampled over its first i128::MAX indices
            let domain = self.max_unique_count().finite().unwrap_or(i128::MAX as u128);
            CoordinateState::Unique(prng, IntervalSampler::indices(domain))
        } else {
            CoordinateState::Random(prng)
        });
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let radices = self.radices();
        let indices = match state_mut(&mut self.state, self.name)? {
            CoordinateState::Random(prng) => radices
                .iter()
                .map(|len| prng.bigint(0, *len as i128 - 1) as u128)
                .collect::<Vec<_>>(),
            CoordinateState::Unique(prng, sampler) => {
                mixed_radix_decode(sampler.draw_index(prng)?, &radices)
            }
        };
        Ok(self.render(&indices))
    }

    fn max_unique_count(&self) -> UniqueCapacity {
        UniqueCapacity::product(self.radices().into_iter().map(UniqueCapacity::Finite))
    }

    fn is_unique(&self) -> bool {
        self.unique
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_point_object() {
        let params = GeneratorParams::new(DataType::Json, "point");
        let mut generator = CoordinateGenerator::point(-5, 5, false, &params).unwrap();
        generator.init(InitOptions::new(1, 1)).unwrap();
        let GeneratedValue::Object(map) = generator.generate(0).unwrap() else {
            panic!("Expected Object value");
        };
        assert!(map.contains_key("x") && map.contains_key("y"));
    }

    #[test]
    fn test_point_tuple_mode() {
        let params = GeneratorParams::new(DataType::Array, "point");
        let mut generator = CoordinateGenerator::point(-5, 5, false, &params).unwrap();
        generator.init(InitOptions::new(1, 1)).unwrap();
        let value = generator.generate(0).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_unique_points_capacity() {
        let params = GeneratorParams::new(DataType::Json, "point");
        let mut generator = CoordinateGenerator::point(0, 2, true, &params).unwrap();
        assert_eq!(generator.max_unique_count(), UniqueCapacity::Finite(9));
        generator.init(InitOptions::new(9, 3)).unwrap();
        let points: HashSet<String> = (0..9)
            .map(|i| generator.generate(i).unwrap().unique_key())
            .collect();
        assert_eq!(points.len(), 9);
        assert!(generator.init(InitOptions::new(10, 3)).is_err());
    }

    #[test]
    fn test_line_has_three_coefficients() {
        let params = GeneratorParams::new(DataType::Json, "line");
        let mut generator = CoordinateGenerator::line(-10, 10, false, &params).unwrap();
        generator.init(InitOptions::new(1, 2)).unwrap();
        let GeneratedValue::Object(map) = generator.generate(0).unwrap() else {
            panic!("Expected Object value");
        };
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_vector_dimensions_from_column() {
        let params = GeneratorParams::new(DataType::Array, "vector(4)");
        let mut generator = CoordinateGenerator::vector(None, -1, 1, 2, true, &params).unwrap();
        assert_eq!(generator.max_unique_count(), UniqueCapacity::Finite(201u128.pow(4)));
        generator.init(InitOptions::new(10, 6)).unwrap();
        let value = generator.generate(0).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 4);
        for item in items {
            let GeneratedValue::Float(f) = item else {
                panic!("Expected Float value");
            };
            assert!((-1.0..=1.0).contains(f));
        }
    }
}
