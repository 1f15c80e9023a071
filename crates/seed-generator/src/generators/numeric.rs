//! Numeric value generators.

use crate::error::GeneratorError;
use crate::generator::{check_capacity, state_mut, GeneratorParams, InitOptions, ValueGenerator};
use crate::prng::Prng;
use crate::unique::{IntervalSampler, UniqueCapacity};
use seed_core::{base_type_name, DataType, GeneratedValue};

/// Default integer bounds derived from the wire column width.
pub fn integer_bounds(params: &GeneratorParams) -> (i128, i128) {
    let base = base_type_name(&params.column_type);
    match base.as_str() {
        "tinyint" | "int1" => (i8::MIN as i128, i8::MAX as i128),
        "smallint" | "int2" | "smallserial" | "serial2" => (i16::MIN as i128, i16::MAX as i128),
        "mediumint" => (-8_388_608, 8_388_607),
        "bigint" | "int8" | "bigserial" | "serial8" => (i64::MIN as i128, i64::MAX as i128),
        _ if params.data_type == DataType::BigInt => (i64::MIN as i128, i64::MAX as i128),
        _ => (i32::MIN as i128, i32::MAX as i128),
    }
}

fn integer_value(params: &GeneratorParams, value: i128) -> GeneratedValue {
    match i64::try_from(value) {
        Ok(v) if params.data_type != DataType::BigInt => GeneratedValue::Int(v),
        _ => GeneratedValue::BigInt(value),
    }
}

fn resolve_int_range(
    name: &'static str,
    params: &GeneratorParams,
    min: Option<i128>,
    max: Option<i128>,
) -> Result<(i128, i128), GeneratorError> {
    let (default_min, default_max) = integer_bounds(params);
    let min = min.unwrap_or(default_min);
    let max = max.unwrap_or(default_max);
    if min > max {
        return Err(GeneratorError::invalid(name, format!("min {min} is greater than max {max}")));
    }
    Ok((min, max))
}

/// Sequential integers starting at `start`, used for integer primary keys.
#[derive(Debug)]
pub struct SequentialGenerator {
    start: i64,
    params: GeneratorParams,
    next: Option<i64>,
}

impl SequentialGenerator {
    pub fn new(start: i64, params: GeneratorParams) -> Self {
        Self {
            start,
            params,
            next: None,
        }
    }
}

impl ValueGenerator for SequentialGenerator {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn init(&mut self, _options: InitOptions) -> Result<(), GeneratorError> {
        self.next = Some(self.start);
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let next = state_mut(&mut self.next, "sequential")?;
        let value = *next;
        *next = next.wrapping_add(1);
        Ok(integer_value(&self.params, value as i128))
    }

    fn is_unique(&self) -> bool {
        true
    }
}

#[derive(Debug)]
pub struct IntGenerator {
    min: i128,
    max: i128,
    params: GeneratorParams,
    prng: Option<Prng>,
}

impl IntGenerator {
    pub fn new(
        min: Option<i128>,
        max: Option<i128>,
        params: GeneratorParams,
    ) -> Result<Self, GeneratorError> {
        let (min, max) = resolve_int_range("int", &params, min, max)?;
        Ok(Self {
            min,
            max,
            params,
            prng: None,
        })
    }
}

impl ValueGenerator for IntGenerator {
    fn name(&self) -> &'static str {
        "int"
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        self.prng = Some(Prng::new(options.seed));
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let prng = state_mut(&mut self.prng, "int")?;
        let value = prng.bigint(self.min, self.max);
        Ok(integer_value(&self.params, value))
    }
}

/// Distinct integers via shrinking-interval sampling.
#[derive(Debug)]
pub struct UniqueIntGenerator {
    min: i128,
    max: i128,
    params: GeneratorParams,
    state: Option<(Prng, IntervalSampler)>,
}

impl UniqueIntGenerator {
    pub fn new(
        min: Option<i128>,
        max: Option<i128>,
        params: GeneratorParams,
    ) -> Result<Self, GeneratorError> {
        let (min, max) = resolve_int_range("unique_int", &params, min, max)?;
        Ok(Self {
            min,
            max,
            params,
            state: None,
        })
    }
}

impl ValueGenerator for UniqueIntGenerator {
    fn name(&self) -> &'static str {
        "unique_int"
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        check_capacity(self, &options)?;
        self.state = Some((
            Prng::new(options.seed),
            IntervalSampler::new(self.min, self.max),
        ));
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let (prng, sampler) = state_mut(&mut self.state, "unique_int")?;
        let value = sampler.draw(prng)?;
        Ok(integer_value(&self.params, value))
    }

    fn max_unique_count(&self) -> UniqueCapacity {
        UniqueCapacity::of_range(self.min, self.max)
    }

    fn is_unique(&self) -> bool {
        true
    }
}

/// Scaled integer range shared by the fixed-precision number generators.
#[derive(Debug, Clone, Copy)]
struct ScaledRange {
    /// 10^scale
    factor: i128,
    scale: u32,
    min: i128,
    max: i128,
}

impl ScaledRange {
    fn resolve(
        name: &'static str,
        params: &GeneratorParams,
        min: Option<f64>,
        max: Option<f64>,
        precision: Option<u32>,
    ) -> Result<Self, GeneratorError> {
        let factor = match precision {
            Some(0) => return Err(GeneratorError::invalid(name, "precision must be positive")),
            Some(p) => p as i128,
            None => 10i128.pow(params.type_params.scale.unwrap_or(2).min(18)),
        };
        let scale = (factor as f64).log10().round().max(0.0) as u32;

        // numeric(p, s) holds at most p - s integer digits
        let type_bound = params.type_params.precision.map(|p| {
            let int_digits = p.saturating_sub(params.type_params.scale.unwrap_or(0)).min(30);
            10f64.powi(int_digits as i32) - 1.0 / factor as f64
        });
        let bound = type_bound.unwrap_or(1_000_000.0);
        let min = min.unwrap_or(-bound);
        let max = max.unwrap_or(bound);
        if min > max {
            return Err(GeneratorError::invalid(name, format!("min {min} is greater than max {max}")));
        }
        Ok(Self {
            factor,
            scale,
            min: (min * factor as f64).ceil() as i128,
            max: (max * factor as f64).floor() as i128,
        })
    }

    fn value(&self, params: &GeneratorParams, scaled: i128) -> GeneratedValue {
        let value = scaled as f64 / self.factor as f64;
        if params.data_type == DataType::String {
            GeneratedValue::Decimal(format!("{value:.prec$}", prec = self.scale as usize))
        } else {
            GeneratedValue::Float(value)
        }
    }
}

/// Numbers with a fixed number of decimal places.
///
/// `precision` is a scaling factor: 100 yields two decimal places. Decimal
/// columns (string data type) get a decimal string.
#[derive(Debug)]
pub struct NumberGenerator {
    range: ScaledRange,
    params: GeneratorParams,
    prng: Option<Prng>,
}

impl NumberGenerator {
    pub fn new(
        min: Option<f64>,
        max: Option<f64>,
        precision: Option<u32>,
        params: GeneratorParams,
    ) -> Result<Self, GeneratorError> {
        Ok(Self {
            range: ScaledRange::resolve("number", &params, min, max, precision)?,
            params,
            prng: None,
        })
    }
}

impl ValueGenerator for NumberGenerator {
    fn name(&self) -> &'static str {
        "number"
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        self.prng = Some(Prng::new(options.seed));
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let prng = state_mut(&mut self.prng, "number")?;
        let scaled = prng.bigint(self.range.min, self.range.max);
        Ok(self.range.value(&self.params, scaled))
    }
}

#[derive(Debug)]
pub struct UniqueNumberGenerator {
    range: ScaledRange,
    params: GeneratorParams,
    state: Option<(Prng, IntervalSampler)>,
}

impl UniqueNumberGenerator {
    pub fn new(
        min: Option<f64>,
        max: Option<f64>,
        precision: Option<u32>,
        params: GeneratorParams,
    ) -> Result<Self, GeneratorError> {
        Ok(Self {
            range: ScaledRange::resolve("unique_number", &params, min, max, precision)?,
            params,
            state: None,
        })
    }
}

impl ValueGenerator for UniqueNumberGenerator {
    fn name(&self) -> &'static str {
        "unique_number"
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        check_capacity(self, &options)?;
        self.state = Some((
            Prng::new(options.seed),
            IntervalSampler::new(self.range.min, self.range.max),
        ));
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let (prng, sampler) = state_mut(&mut self.state, "unique_number")?;
        let scaled = sampler.draw(prng)?;
        Ok(self.range.value(&self.params, scaled))
    }

    fn max_unique_count(&self) -> UniqueCapacity {
        UniqueCapacity::of_range(self.range.min, self.range.max)
    }

    fn is_unique(&self) -> bool {
        true
    }
}

#[derive(Debug, Default)]
pub struct BooleanGenerator {
    prng: Option<Prng>,
}

impl ValueGenerator for BooleanGenerator {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        self.prng = Some(Prng::new(options.seed));
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let prng = state_mut(&mut self.prng, "boolean")?;
        Ok(GeneratedValue::Bool(prng.coin()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn int_params(column_type: &str) -> GeneratorParams {
        GeneratorParams::new(DataType::Number, column_type)
    }

    #[test]
    fn test_sequential_counts_from_start() {
        let mut generator = SequentialGenerator::new(1, int_params("serial"));
        generator.init(InitOptions::new(3, 0)).unwrap();
        let values: Vec<_> = (0..3).map(|i| generator.generate(i).unwrap()).collect();
        assert_eq!(
            values,
            vec![GeneratedValue::Int(1), GeneratedValue::Int(2), GeneratedValue::Int(3)]
        );
    }

    #[test]
    fn test_generate_before_init_fails() {
        let mut generator = IntGenerator::new(None, None, int_params("integer")).unwrap();
        assert_eq!(
            generator.generate(0),
            Err(GeneratorError::NotInitialized("int"))
        );
    }

    #[test]
    fn test_int_column_width_bounds() {
        assert_eq!(integer_bounds(&int_params("smallint")), (-32768, 32767));
        assert_eq!(
            integer_bounds(&GeneratorParams::new(DataType::BigInt, "bigint")),
            (i64::MIN as i128, i64::MAX as i128)
        );
    }

    #[test]
    fn test_int_range() {
        let mut generator = IntGenerator::new(Some(10), Some(20), int_params("integer")).unwrap();
        generator.init(InitOptions::new(100, 42)).unwrap();
        for i in 0..100 {
            let value = generator.generate(i).unwrap().as_i128().unwrap();
            assert!((10..=20).contains(&value));
        }
    }

    #[test]
    fn test_bigint_column_yields_bigint() {
        let params = GeneratorParams::new(DataType::BigInt, "bigint");
        let mut generator = IntGenerator::new(None, None, params).unwrap();
        generator.init(InitOptions::new(1, 1)).unwrap();
        assert!(matches!(generator.generate(0).unwrap(), GeneratedValue::BigInt(_)));
    }

    #[test]
    fn test_unique_int_covers_domain() {
        let mut generator =
            UniqueIntGenerator::new(Some(1), Some(50), int_params("integer")).unwrap();
        generator.init(InitOptions::new(50, 7)).unwrap();
        let values: HashSet<i128> = (0..50)
            .map(|i| generator.generate(i).unwrap().as_i128().unwrap())
            .collect();
        assert_eq!(values.len(), 50);
    }

    #[test]
    fn test_unique_int_exhaustion() {
        let mut generator =
            UniqueIntGenerator::new(Some(1), Some(5), int_params("integer")).unwrap();
        let err = generator.init(InitOptions::new(6, 0)).unwrap_err();
        assert!(matches!(err, GeneratorError::Exhausted { available: 5, .. }));
        // skip_check defers the failure to the draw that runs dry
        generator.init(InitOptions::new(6, 0).with_skip_check()).unwrap();
        for i in 0..5 {
            generator.generate(i).unwrap();
        }
        assert_eq!(generator.generate(5), Err(GeneratorError::IntervalPoolEmpty));
    }

    #[test]
    fn test_invalid_range() {
        assert!(IntGenerator::new(Some(5), Some(1), int_params("integer")).is_err());
    }

    #[test]
    fn test_number_decimal_places() {
        let params = GeneratorParams::new(DataType::String, "numeric(6,2)");
        let mut generator = NumberGenerator::new(None, None, None, params).unwrap();
        generator.init(InitOptions::new(50, 3)).unwrap();
        for i in 0..50 {
            let value = generator.generate(i).unwrap();
            let text = value.as_str().unwrap().to_string();
            let (int_part, frac) = text.split_once('.').unwrap();
            assert_eq!(frac.len(), 2);
            assert!(int_part.trim_start_matches('-').len() <= 4);
        }
    }

    #[test]
    fn test_unique_number() {
        let params = GeneratorParams::new(DataType::Number, "real");
        let mut generator =
            UniqueNumberGenerator::new(Some(0.0), Some(1.0), Some(100), params).unwrap();
        assert_eq!(generator.max_unique_count(), UniqueCapacity::Finite(101));
        generator.init(InitOptions::new(101, 9)).unwrap();
        let values: HashSet<String> = (0..101)
            .map(|i| generator.generate(i).unwrap().unique_key())
            .collect();
        assert_eq!(values.len(), 101);
    }

    #[test]
    fn test_boolean() {
        let mut generator = BooleanGenerator::default();
        generator.init(InitOptions::new(10, 1)).unwrap();
        assert!(matches!(generator.generate(0).unwrap(), GeneratedValue::Bool(_)));
    }
}
