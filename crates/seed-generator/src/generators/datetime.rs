//! Dates, times, timestamps, years and intervals.

use crate::error::GeneratorError;
use crate::generator::{check_capacity, state_mut, GeneratorParams, InitOptions, ValueGenerator};
use crate::prng::Prng;
use crate::unique::{mixed_radix_decode, IntervalSampler, UniqueCapacity};
use chrono::{Duration, NaiveDate, NaiveTime};
use seed_core::{DataType, GeneratedValue};

const SECONDS_PER_DAY: i64 = 86_400;

fn default_min_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default()
}

fn default_max_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default()
}

/// Days in `[min_date, max_date]`.
#[derive(Debug)]
pub struct DateGenerator {
    min_date: NaiveDate,
    span_days: i64,
    params: GeneratorParams,
    prng: Option<Prng>,
}

impl DateGenerator {
    pub fn new(
        min_date: Option<NaiveDate>,
        max_date: Option<NaiveDate>,
        params: GeneratorParams,
    ) -> Result<Self, GeneratorError> {
        let min_date = min_date.unwrap_or_else(default_min_date);
        let max_date = max_date.unwrap_or_else(default_max_date);
        if min_date > max_date {
            return Err(GeneratorError::invalid(
                "date",
                format!("min_date {min_date} is after max_date {max_date}"),
            ));
        }
        Ok(Self {
            min_date,
            span_days: (max_date - min_date).num_days(),
            params,
            prng: None,
        })
    }
}

impl ValueGenerator for DateGenerator {
    fn name(&self) -> &'static str {
        "date"
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        self.prng = Some(Prng::new(options.seed));
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let prng = state_mut(&mut self.prng, "date")?;
        let date = self.min_date + Duration::days(prng.int(0, self.span_days));
        Ok(if self.params.data_type == DataType::String {
            GeneratedValue::String(date.format("%Y-%m-%d").to_string())
        } else {
            GeneratedValue::Date(date)
        })
    }
}

#[derive(Debug)]
pub struct TimeGenerator {
    params: GeneratorParams,
    prng: Option<Prng>,
}

impl TimeGenerator {
    pub fn new(params: GeneratorParams) -> Self {
        Self { params, prng: None }
    }
}

impl ValueGenerator for TimeGenerator {
    fn name(&self) -> &'static str {
        "time"
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        self.prng = Some(Prng::new(options.seed));
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let prng = state_mut(&mut self.prng, "time")?;
        let seconds = prng.int(0, SECONDS_PER_DAY - 1) as u32;
        let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).unwrap_or_default();
        Ok(if self.params.data_type == DataType::String {
            GeneratedValue::String(time.format("%H:%M:%S").to_string())
        } else {
            GeneratedValue::Time(time)
        })
    }
}

/// Second-precision timestamps over the default date range.
#[derive(Debug)]
pub struct TimestampGenerator {
    params: GeneratorParams,
    prng: Option<Prng>,
}

impl TimestampGenerator {
    pub fn new(params: GeneratorParams) -> Self {
        Self { params, prng: None }
    }
}

impl ValueGenerator for TimestampGenerator {
    fn name(&self) -> &'static str {
        "timestamp"
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        self.prng = Some(Prng::new(options.seed));
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let prng = state_mut(&mut self.prng, "timestamp")?;
        let start = default_min_date().and_time(NaiveTime::default());
        let span = (default_max_date() - default_min_date()).num_days() * SECONDS_PER_DAY
            + SECONDS_PER_DAY
            - 1;
        let timestamp = start + Duration::seconds(prng.int(0, span));
        Ok(if self.params.data_type == DataType::String {
            GeneratedValue::String(timestamp.format("%Y-%m-%d %H:%M:%S").to_string())
        } else {
            GeneratedValue::DateTime(timestamp)
        })
    }
}

/// Years in the MySQL `YEAR` range.
#[derive(Debug, Default)]
pub struct YearGenerator {
    prng: Option<Prng>,
}

impl ValueGenerator for YearGenerator {
    fn name(&self) -> &'static str {
        "year"
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        self.prng = Some(Prng::new(options.seed));
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let prng = state_mut(&mut self.prng, "year")?;
        Ok(GeneratedValue::Int(prng.int(1901, 2155)))
    }
}

/// Interval components and their radices: years, months, days, hours,
/// minutes, seconds and (version 1 only) milliseconds.
const INTERVAL_UNITS: &[(&str, u128)] = &[
    ("years", 10),
    ("months", 12),
    ("days", 31),
    ("hours", 24),
    ("minutes", 60),
    ("seconds", 60),
];
const MILLIS_RADIX: u128 = 1000;

#[derive(Debug)]
enum IntervalState {
    Random(Prng),
    Unique(Prng, IntervalSampler),
}

/// PostgreSQL-style intervals (`"1 years 2 months ... 5 seconds"`).
///
/// Version 1 renders fractional seconds; version 2 does not.
#[derive(Debug)]
pub struct IntervalGenerator {
    fractional_seconds: bool,
    unique: bool,
    state: Option<IntervalState>,
}

impl IntervalGenerator {
    pub fn new(version: u32, unique: bool) -> Self {
        Self {
            fractional_seconds: version < 2,
            unique,
            state: None,
        }
    }

    fn radices(&self) -> Vec<u128> {
        let mut radices: Vec<u128> = INTERVAL_UNITS.iter().map(|(_, radix)| *radix).collect();
        if self.fractional_seconds {
            radices.push(MILLIS_RADIX);
        }
        radices
    }

    fn render(&self, parts: &[u128]) -> String {
        let mut pieces: Vec<String> = INTERVAL_UNITS
            .iter()
            .zip(parts)
            .take(INTERVAL_UNITS.len() - 1)
            .map(|((unit, _), value)| format!("{value} {unit}"))
            .collect();
        let seconds = parts.get(INTERVAL_UNITS.len() - 1).copied().unwrap_or(0);
        match parts.get(INTERVAL_UNITS.len()) {
            Some(millis) if self.fractional_seconds => {
                pieces.push(format!("{seconds}.{millis:03} seconds"))
            }
            _ => pieces.push(format!("{seconds} seconds")),
        }
        pieces.join(" ")
    }
}

impl ValueGenerator for IntervalGenerator {
    fn name(&self) -> &'static str {
        "interval"
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        let prng = Prng::new(options.seed);
        self.state = Some(if self.unique {
            check_capacity(self, &options)?;
            let domain = UniqueCapacity::product(
                self.radices().into_iter().map(UniqueCapacity::Finite),
            );
            IntervalState::Unique(prng, IntervalSampler::indices(domain.finite().unwrap_or(0)))
        } else {
            IntervalState::Random(prng)
        });
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let radices = self.radices();
        let parts = match state_mut(&mut self.state, "interval")? {
            IntervalState::Random(prng) => radices
                .iter()
                .map(|radix| prng.bigint(0, *radix as i128 - 1) as u128)
                .collect::<Vec<_>>(),
            IntervalState::Unique(prng, sampler) => {
                mixed_radix_decode(sampler.draw_index(prng)?, &radices)
            }
        };
        Ok(GeneratedValue::String(self.render(&parts)))
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
    fn test_date_range() {
        let min = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let max = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let params = GeneratorParams::new(DataType::Date, "date");
        let mut generator = DateGenerator::new(Some(min), Some(max), params).unwrap();
        generator.init(InitOptions::new(50, 1)).unwrap();
        for i in 0..50 {
            let GeneratedValue::Date(date) = generator.generate(i).unwrap() else {
                panic!("Expected Date value");
            };
            assert!(date >= min && date <= max);
        }
    }

    #[test]
    fn test_date_as_string() {
        let params = GeneratorParams::new(DataType::String, "date");
        let mut generator = DateGenerator::new(None, None, params).unwrap();
        generator.init(InitOptions::new(1, 1)).unwrap();
        let value = generator.generate(0).unwrap();
        assert!(NaiveDate::parse_from_str(value.as_str().unwrap(), "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_invalid_date_range() {
        let min = NaiveDate::from_ymd_opt(2024, 2, 1);
        let max = NaiveDate::from_ymd_opt(2024, 1, 1);
        let params = GeneratorParams::new(DataType::Date, "date");
        assert!(DateGenerator::new(min, max, params).is_err());
    }

    #[test]
    fn test_year_range() {
        let mut generator = YearGenerator::default();
        generator.init(InitOptions::new(20, 3)).unwrap();
        for i in 0..20 {
            let year = generator.generate(i).unwrap().as_i128().unwrap();
            assert!((1901..=2155).contains(&year));
        }
    }

    #[test]
    fn test_interval_versions() {
        let mut v1 = IntervalGenerator::new(1, false);
        v1.init(InitOptions::new(1, 5)).unwrap();
        let text = v1.generate(0).unwrap().as_str().unwrap().to_string();
        assert!(text.contains('.'));

        let mut v2 = IntervalGenerator::new(2, false);
        v2.init(InitOptions::new(1, 5)).unwrap();
        let text = v2.generate(0).unwrap().as_str().unwrap().to_string();
        assert!(!text.contains('.'));
        assert!(text.ends_with(" seconds"));
        assert_eq!(text.split(' ').count(), 12);
    }

    #[test]
    fn test_unique_intervals() {
        let mut generator = IntervalGenerator::new(2, true);
        assert_eq!(
            generator.max_unique_count(),
            UniqueCapacity::Finite(10 * 12 * 31 * 24 * 60 * 60)
        );
        generator.init(InitOptions::new(200, 8)).unwrap();
        let values: HashSet<String> = (0..200)
            .map(|i| generator.generate(i).unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(values.len(), 200);
    }
}
