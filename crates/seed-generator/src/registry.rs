//! Generator versioning registry.
//!
//! Every generator kind maps to one or more implementations tagged with the
//! API version that introduced them. [`select`] picks the highest version not
//! above the requested API version, so corrected algorithms can ship without
//! changing the output of callers pinned to an older version.
//!
//! | kind              | versions | unique                 |
//! |-------------------|----------|------------------------|
//! | `string`          | 1, 2     | `unique_string` (1, 2) |
//! | `interval`        | 1, 2     | same generator         |
//! | everything else   | 1        | see [`UniqueSupport`]  |

use crate::error::GeneratorError;
use crate::generator::{BoxedGenerator, GeneratorParams};
use crate::generators::*;
use seed_core::{GeneratedValue, GeneratorConfig, GeneratorKind};

/// Newest API version.
pub const LATEST_API_VERSION: u32 = 2;

/// Constructor of a registered implementation.
pub type BuildFn =
    fn(&GeneratorConfig, &GeneratorParams, u32) -> Result<BoxedGenerator, GeneratorError>;

/// How an implementation serves unique columns.
#[derive(Clone, Copy)]
pub enum UniqueSupport {
    /// A dedicated unique variant replaces the generator
    Variant(BuildFn),
    /// The generator is unique by construction
    Inherent,
    /// No unique form exists
    Unsupported,
}

/// One registered implementation.
#[derive(Clone, Copy)]
pub struct RegistryEntry {
    pub kind: GeneratorKind,
    pub version: u32,
    pub build: BuildFn,
    pub unique: UniqueSupport,
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("kind", &self.kind)
            .field("version", &self.version)
            .field("unique", &self.supports_unique())
            .finish()
    }
}

impl RegistryEntry {
    const fn new(kind: GeneratorKind, version: u32, build: BuildFn, unique: UniqueSupport) -> Self {
        Self {
            kind,
            version,
            build,
            unique,
        }
    }

    pub fn supports_unique(&self) -> bool {
        !matches!(self.unique, UniqueSupport::Unsupported)
    }
}

use GeneratorKind as K;
use UniqueSupport::{Inherent, Unsupported, Variant};

static REGISTRY: &[RegistryEntry] = &[
    RegistryEntry::new(K::Default, 1, build_default, Unsupported),
    RegistryEntry::new(K::Sequential, 1, build_sequential, Inherent),
    RegistryEntry::new(K::Int, 1, build_int, Variant(build_unique_int)),
    RegistryEntry::new(K::Number, 1, build_number, Variant(build_unique_number)),
    RegistryEntry::new(K::Boolean, 1, build_boolean, Unsupported),
    RegistryEntry::new(K::String, 1, build_string, Variant(build_unique_string)),
    RegistryEntry::new(K::String, 2, build_string, Variant(build_unique_string)),
    RegistryEntry::new(K::Uuid, 1, build_uuid, Inherent),
    RegistryEntry::new(K::FirstName, 1, build_tokens, Variant(build_tokens)),
    RegistryEntry::new(K::LastName, 1, build_tokens, Variant(build_tokens)),
    RegistryEntry::new(K::FullName, 1, build_tokens, Variant(build_tokens)),
    RegistryEntry::new(K::Email, 1, build_tokens, Inherent),
    RegistryEntry::new(K::PhoneNumber, 1, build_template, Variant(build_template)),
    RegistryEntry::new(K::Country, 1, build_tokens, Variant(build_tokens)),
    RegistryEntry::new(K::City, 1, build_tokens, Variant(build_tokens)),
    RegistryEntry::new(K::StreetAddress, 1, build_tokens, Variant(build_tokens)),
    RegistryEntry::new(K::Postcode, 1, build_template, Variant(build_template)),
    RegistryEntry::new(K::CompanyName, 1, build_tokens, Variant(build_tokens)),
    RegistryEntry::new(K::JobTitle, 1, build_tokens, Unsupported),
    RegistryEntry::new(K::LoremIpsum, 1, build_text, Unsupported),
    RegistryEntry::new(K::Date, 1, build_datetime, Unsupported),
    RegistryEntry::new(K::Time, 1, build_datetime, Unsupported),
    RegistryEntry::new(K::Timestamp, 1, build_datetime, Unsupported),
    RegistryEntry::new(K::Year, 1, build_datetime, Unsupported),
    RegistryEntry::new(K::Interval, 1, build_interval, Variant(build_interval)),
    RegistryEntry::new(K::Interval, 2, build_interval, Variant(build_interval)),
    RegistryEntry::new(K::Json, 1, build_text, Unsupported),
    RegistryEntry::new(K::IpAddress, 1, build_network, Variant(build_network)),
    RegistryEntry::new(K::BitString, 1, build_network, Variant(build_network)),
    RegistryEntry::new(K::Point, 1, build_geometry, Variant(build_geometry)),
    RegistryEntry::new(K::Line, 1, build_geometry, Variant(build_geometry)),
    RegistryEntry::new(K::Vector, 1, build_geometry, Variant(build_geometry)),
    RegistryEntry::new(K::Enum, 1, build_choice, Variant(build_choice)),
    RegistryEntry::new(K::ValuesFromArray, 1, build_choice, Variant(build_choice)),
    RegistryEntry::new(K::WeightedRandom, 1, build_weighted_random, Unsupported),
];

/// Every registered implementation, in registration order.
pub fn entries() -> &'static [RegistryEntry] {
    REGISTRY
}

/// Reject API versions outside `1..=LATEST_API_VERSION`.
pub fn validate_api_version(version: u32) -> Result<(), GeneratorError> {
    if version == 0 || version > LATEST_API_VERSION {
        return Err(GeneratorError::InvalidVersion {
            requested: version,
            latest: LATEST_API_VERSION,
        });
    }
    Ok(())
}

/// Highest-versioned implementation of `kind` not above `version`.
pub fn select(kind: GeneratorKind, version: u32) -> Result<&'static RegistryEntry, GeneratorError> {
    REGISTRY
        .iter()
        .filter(|entry| entry.kind == kind && entry.version <= version)
        .max_by_key(|entry| entry.version)
        .ok_or(GeneratorError::NoImplementation { kind, version })
}

/// Whether the newest implementation of `kind` can produce unique values.
pub fn supports_unique(kind: GeneratorKind) -> bool {
    select(kind, LATEST_API_VERSION).is_ok_and(RegistryEntry::supports_unique)
}

/// Turn a configuration into a live generator for `version`.
///
/// Array columns are wrapped in an [`ArrayGenerator`] whose element generator
/// is resolved again through the registry with the element's parameters. Unique columns get the
/// registered unique form or fail with [`GeneratorError::UniqueUnsupported`].
pub fn instantiate(
    config: &GeneratorConfig,
    params: &GeneratorParams,
    version: u32,
) -> Result<BoxedGenerator, GeneratorError> {
    validate_api_version(version)?;

    let wraps_arrays = !matches!(
        config.kind(),
        GeneratorKind::Default | GeneratorKind::WeightedRandom
    );
    if wraps_arrays && params.type_params.is_array() {
        let size = config
            .array_size()
            .or(params.type_params.length)
            .unwrap_or(DEFAULT_ARRAY_SIZE);
        let element = params.element_params();
        let base = instantiate(config, &element, version)?;
        return Ok(Box::new(ArrayGenerator::new(base, size)));
    }

    let entry = select(config.kind(), version)?;
    let unique = params.is_unique || config.requests_unique();
    let params = GeneratorParams {
        is_unique: unique,
        ..params.clone()
    };
    if !unique {
        return (entry.build)(config, &params, version);
    }
    match entry.unique {
        Variant(build) => build(config, &params, version),
        Inherent => (entry.build)(config, &params, version),
        Unsupported => Err(GeneratorError::UniqueUnsupported(entry.kind)),
    }
}

fn mismatch(kind: &'static str) -> GeneratorError {
    GeneratorError::invalid(kind, "configuration does not match the registered generator")
}

fn build_default(
    config: &GeneratorConfig,
    _params: &GeneratorParams,
    _version: u32,
) -> Result<BoxedGenerator, GeneratorError> {
    match config {
        GeneratorConfig::Default { value } => Ok(Box::new(DefaultGenerator::new(
            GeneratedValue::from_yaml(value),
        ))),
        _ => Err(mismatch("default")),
    }
}

fn build_sequential(
    config: &GeneratorConfig,
    params: &GeneratorParams,
    _version: u32,
) -> Result<BoxedGenerator, GeneratorError> {
    match config {
        GeneratorConfig::Sequential { start } => {
            Ok(Box::new(SequentialGenerator::new(*start, params.clone())))
        }
        _ => Err(mismatch("sequential")),
    }
}

fn build_int(
    config: &GeneratorConfig,
    params: &GeneratorParams,
    _version: u32,
) -> Result<BoxedGenerator, GeneratorError> {
    match config {
        GeneratorConfig::Int { min, max, .. } => {
            Ok(Box::new(IntGenerator::new(*min, *max, params.clone())?))
        }
        _ => Err(mismatch("int")),
    }
}

fn build_unique_int(
    config: &GeneratorConfig,
    params: &GeneratorParams,
    _version: u32,
) -> Result<BoxedGenerator, GeneratorError> {
    match config {
        GeneratorConfig::Int { min, max, .. } => {
            Ok(Box::new(UniqueIntGenerator::new(*min, *max, params.clone())?))
        }
        _ => Err(mismatch("unique_int")),
    }
}

fn build_number(
    config: &GeneratorConfig,
    params: &GeneratorParams,
    _version: u32,
) -> Result<BoxedGenerator, GeneratorError> {
    match config {
        GeneratorConfig::Number {
            min,
            max,
            precision,
            ..
        } => Ok(Box::new(NumberGenerator::new(
            *min,
            *max,
            *precision,
            params.clone(),
        )?)),
        _ => Err(mismatch("number")),
    }
}

fn build_unique_number(
    config: &GeneratorConfig,
    params: &GeneratorParams,
    _version: u32,
) -> Result<BoxedGenerator, GeneratorError> {
    match config {
        GeneratorConfig::Number {
            min,
            max,
            precision,
            ..
        } => Ok(Box::new(UniqueNumberGenerator::new(
            *min,
            *max,
            *precision,
            params.clone(),
        )?)),
        _ => Err(mismatch("unique_number")),
    }
}

fn build_boolean(
    _config: &GeneratorConfig,
    _params: &GeneratorParams,
    _version: u32,
) -> Result<BoxedGenerator, GeneratorError> {
    Ok(Box::new(BooleanGenerator::default()))
}

fn build_string(
    _config: &GeneratorConfig,
    params: &GeneratorParams,
    version: u32,
) -> Result<BoxedGenerator, GeneratorError> {
    Ok(Box::new(StringGenerator::new(params.clone(), version)))
}

fn build_unique_string(
    _config: &GeneratorConfig,
    params: &GeneratorParams,
    version: u32,
) -> Result<BoxedGenerator, GeneratorError> {
    Ok(Box::new(UniqueStringGenerator::new(params.clone(), version)))
}

fn build_uuid(
    _config: &GeneratorConfig,
    _params: &GeneratorParams,
    _version: u32,
) -> Result<BoxedGenerator, GeneratorError> {
    Ok(Box::new(UuidGenerator::default()))
}

fn build_tokens(
    config: &GeneratorConfig,
    params: &GeneratorParams,
    _version: u32,
) -> Result<BoxedGenerator, GeneratorError> {
    let unique = params.is_unique;
    let generator = match config {
        GeneratorConfig::FirstName { .. } => TokenGenerator::first_name(unique),
        GeneratorConfig::LastName { .. } => TokenGenerator::last_name(unique),
        GeneratorConfig::FullName { .. } => TokenGenerator::full_name(unique),
        GeneratorConfig::Email { .. } => TokenGenerator::email(),
        GeneratorConfig::Country { .. } => TokenGenerator::country(unique),
        GeneratorConfig::City { .. } => TokenGenerator::city(unique),
        GeneratorConfig::StreetAddress { .. } => TokenGenerator::street_address(unique),
        GeneratorConfig::CompanyName { .. } => TokenGenerator::company_name(unique),
        GeneratorConfig::JobTitle => TokenGenerator::job_title(),
        _ => return Err(mismatch("tokens")),
    };
    Ok(Box::new(generator))
}

fn build_template(
    config: &GeneratorConfig,
    params: &GeneratorParams,
    _version: u32,
) -> Result<BoxedGenerator, GeneratorError> {
    match config {
        GeneratorConfig::PhoneNumber { template, .. } => Ok(Box::new(
            TemplateGenerator::phone_number(template.clone(), params.is_unique)?,
        )),
        GeneratorConfig::Postcode { .. } => {
            Ok(Box::new(TemplateGenerator::postcode(params.is_unique)?))
        }
        _ => Err(mismatch("template")),
    }
}

fn build_text(
    config: &GeneratorConfig,
    _params: &GeneratorParams,
    _version: u32,
) -> Result<BoxedGenerator, GeneratorError> {
    match config {
        GeneratorConfig::LoremIpsum { sentences_count } => {
            Ok(Box::new(LoremIpsumGenerator::new(*sentences_count)))
        }
        GeneratorConfig::Json => Ok(Box::new(JsonGenerator::default())),
        _ => Err(mismatch("text")),
    }
}

fn build_datetime(
    config: &GeneratorConfig,
    params: &GeneratorParams,
    _version: u32,
) -> Result<BoxedGenerator, GeneratorError> {
    match config {
        GeneratorConfig::Date {
            min_date, max_date, ..
        } => Ok(Box::new(DateGenerator::new(
            *min_date,
            *max_date,
            params.clone(),
        )?)),
        GeneratorConfig::Time => Ok(Box::new(TimeGenerator::new(params.clone()))),
        GeneratorConfig::Timestamp => Ok(Box::new(TimestampGenerator::new(params.clone()))),
        GeneratorConfig::Year => Ok(Box::new(YearGenerator::default())),
        _ => Err(mismatch("datetime")),
    }
}

fn build_interval(
    _config: &GeneratorConfig,
    params: &GeneratorParams,
    version: u32,
) -> Result<BoxedGenerator, GeneratorError> {
    Ok(Box::new(IntervalGenerator::new(version, params.is_unique)))
}

fn build_network(
    config: &GeneratorConfig,
    params: &GeneratorParams,
    _version: u32,
) -> Result<BoxedGenerator, GeneratorError> {
    match config {
        GeneratorConfig::IpAddress { .. } => {
            Ok(Box::new(IpAddressGenerator::new(params.is_unique)))
        }
        GeneratorConfig::BitString { length, .. } => Ok(Box::new(BitStringGenerator::new(
            *length,
            params.is_unique,
            params,
        )?)),
        _ => Err(mismatch("network")),
    }
}

fn build_geometry(
    config: &GeneratorConfig,
    params: &GeneratorParams,
    _version: u32,
) -> Result<BoxedGenerator, GeneratorError> {
    let unique = params.is_unique;
    let generator = match config {
        GeneratorConfig::Point { min, max, .. } => {
            CoordinateGenerator::point(*min, *max, unique, params)?
        }
        GeneratorConfig::Line { min, max, .. } => {
            CoordinateGenerator::line(*min, *max, unique, params)?
        }
        GeneratorConfig::Vector {
            dimensions,
            min,
            max,
            decimal_places,
            ..
        } => CoordinateGenerator::vector(*dimensions, *min, *max, *decimal_places, unique, params)?,
        _ => return Err(mismatch("geometry")),
    };
    Ok(Box::new(generator))
}

fn build_choice(
    config: &GeneratorConfig,
    params: &GeneratorParams,
    _version: u32,
) -> Result<BoxedGenerator, GeneratorError> {
    let generator = match config {
        GeneratorConfig::Enum { values, .. } if values.is_empty() => {
            ValuesFromArrayGenerator::enumeration(&params.enum_values)
        }
        GeneratorConfig::Enum { values, .. } => ValuesFromArrayGenerator::enumeration(values),
        GeneratorConfig::ValuesFromArray { values, .. } => {
            ValuesFromArrayGenerator::from_pool(values)
        }
        _ => return Err(mismatch("choice")),
    };
    let mut generator = generator
        .unique(params.is_unique)
        .not_null(params.not_null);
    if let Some(cap) = config.max_repeated_values() {
        generator = generator.with_max_repeats(cap.clone());
    }
    Ok(Box::new(generator))
}

fn build_weighted_random(
    config: &GeneratorConfig,
    params: &GeneratorParams,
    version: u32,
) -> Result<BoxedGenerator, GeneratorError> {
    let GeneratorConfig::WeightedRandom { entries } = config else {
        return Err(mismatch("weighted_random"));
    };
    let children = entries
        .iter()
        .map(|entry| Ok((entry.weight, instantiate(&entry.value, params, version)?)))
        .collect::<Result<Vec<_>, GeneratorError>>()?;
    Ok(Box::new(WeightedRandomGenerator::new(children)))
}
