//! Word-list generators: names, e-mails, places, companies and job titles.
//!
//! Each value is a template filled with one token per part. Parts are bundled
//! word lists or integer ranges. Non-unique generation draws each part
//! independently; unique generation draws a distinct index over the Cartesian
//! product of the parts and decodes it mixed-radix.

use crate::datasets;
use crate::error::GeneratorError;
use crate::generator::{check_capacity, state_mut, InitOptions, ValueGenerator};
use crate::prng::Prng;
use crate::unique::{mixed_radix_decode, IndexedRange, IntervalSampler, UniqueCapacity};
use seed_core::GeneratedValue;

/// One component of a token template.
#[derive(Debug, Clone, Copy)]
pub enum TokenPart {
    Words(&'static [&'static str]),
    Range(IndexedRange),
}

impl TokenPart {
    fn len(&self) -> u128 {
        match self {
            Self::Words(words) => words.len() as u128,
            Self::Range(range) => range.len,
        }
    }

    fn render(&self, index: u128, out: &mut String) {
        match self {
            Self::Words(words) => out.push_str(words[index as usize]),
            Self::Range(range) => out.push_str(&range.at(index).to_string()),
        }
    }
}

#[derive(Debug)]
enum TokenState {
    Random(Prng),
    Unique(Prng, IntervalSampler),
}

/// Template filled from token parts; each `{}` takes the next part.
#[derive(Debug)]
pub struct TokenGenerator {
    name: &'static str,
    template: &'static str,
    parts: Vec<TokenPart>,
    lowercase: bool,
    unique: bool,
    state: Option<TokenState>,
}

impl TokenGenerator {
    pub fn new(name: &'static str, template: &'static str, parts: Vec<TokenPart>) -> Self {
        Self {
            name,
            template,
            parts,
            lowercase: false,
            unique: false,
            state: None,
        }
    }

    pub fn lowercase(mut self) -> Self {
        self.lowercase = true;
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn first_name(unique: bool) -> Self {
        Self::new("first_name", "{}", vec![TokenPart::Words(datasets::FIRST_NAMES)]).unique(unique)
    }

    pub fn last_name(unique: bool) -> Self {
        Self::new("last_name", "{}", vec![TokenPart::Words(datasets::LAST_NAMES)]).unique(unique)
    }

    pub fn full_name(unique: bool) -> Self {
        Self::new(
            "full_name",
            "{} {}",
            vec![
                TokenPart::Words(datasets::FIRST_NAMES),
                TokenPart::Words(datasets::LAST_NAMES),
            ],
        )
        .unique(unique)
    }

    /// E-mail addresses are always unique.
    pub fn email() -> Self {
        Self::new(
            "email",
            "{}.{}{}@{}",
            vec![
                TokenPart::Words(datasets::FIRST_NAMES),
                TokenPart::Words(datasets::LAST_NAMES),
                TokenPart::Range(IndexedRange::inclusive(1, 999)),
                TokenPart::Words(datasets::EMAIL_DOMAINS),
            ],
        )
        .lowercase()
        .unique(true)
    }

    pub fn country(unique: bool) -> Self {
        Self::new("country", "{}", vec![TokenPart::Words(datasets::COUNTRIES)]).unique(unique)
    }

    pub fn city(unique: bool) -> Self {
        Self::new("city", "{}", vec![TokenPart::Words(datasets::CITIES)]).unique(unique)
    }

    pub fn street_address(unique: bool) -> Self {
        Self::new(
            "street_address",
            "{} {} {}",
            vec![
                TokenPart::Range(IndexedRange::inclusive(1, 9999)),
                TokenPart::Words(datasets::STREET_NAMES),
                TokenPart::Words(datasets::STREET_SUFFIXES),
            ],
        )
        .unique(unique)
    }

    pub fn company_name(unique: bool) -> Self {
        Self::new(
            "company_name",
            "{} {}",
            vec![
                TokenPart::Words(datasets::LAST_NAMES),
                TokenPart::Words(datasets::COMPANY_SUFFIXES),
            ],
        )
        .unique(unique)
    }

    pub fn job_title() -> Self {
        Self::new(
            "job_title",
            "{} {} {}",
            vec![
                TokenPart::Words(datasets::JOB_LEVELS),
                TokenPart::Words(datasets::JOB_AREAS),
                TokenPart::Words(datasets::JOB_TYPES),
            ],
        )
    }

    fn radices(&self) -> Vec<u128> {
        self.parts.iter().map(TokenPart::len).collect()
    }

    fn render(&self, indices: &[u128]) -> String {
        let mut out = String::new();
        let mut pieces = self.template.split("{}");
        if let Some(head) = pieces.next() {
            out.push_str(head);
        }
        for (piece, (part, index)) in pieces.zip(self.parts.iter().zip(indices)) {
            part.render(*index, &mut out);
            out.push_str(piece);
        }
        if self.lowercase {
            out = out.to_lowercase();
        }
        out
    }
}

impl ValueGenerator for TokenGenerator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        let prng = Prng::new(options.seed);
        self.state = Some(if self.unique {
            check_capacity(self, &options)?;
            let domain = self.max_unique_count().finite().unwrap_or(i128::MAX as u128);
            TokenState::Unique(prng, IntervalSampler::indices(domain))
        } else {
            TokenState::Random(prng)
        });
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let radices = self.radices();
        let indices = match state_mut(&mut self.state, self.name)? {
            TokenState::Random(prng) => radices
                .iter()
                .map(|len| prng.bigint(0, *len as i128 - 1) as u128)
                .collect::<Vec<_>>(),
            TokenState::Unique(prng, sampler) => {
                mixed_radix_decode(sampler.draw_index(prng)?, &radices)
            }
        };
        Ok(GeneratedValue::String(self.render(&indices)))
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

    fn collect(generator: &mut TokenGenerator, count: u64, seed: i64) -> Vec<String> {
        generator.init(InitOptions::new(count, seed)).unwrap();
        (0..count)
            .map(|i| generator.generate(i).unwrap().as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_first_name_from_list() {
        let mut generator = TokenGenerator::first_name(false);
        for name in collect(&mut generator, 20, 1) {
            assert!(datasets::FIRST_NAMES.contains(&name.as_str()));
        }
    }

    #[test]
    fn test_unique_first_names_exhaust_list() {
        let total = datasets::FIRST_NAMES.len() as u64;
        let mut generator = TokenGenerator::first_name(true);
        let names: HashSet<String> = collect(&mut generator, total, 3).into_iter().collect();
        assert_eq!(names.len() as u64, total);

        let err = TokenGenerator::first_name(true)
            .init(InitOptions::new(total + 1, 3))
            .unwrap_err();
        assert!(matches!(err, GeneratorError::Exhausted { generator: "first_name", .. }));
    }

    #[test]
    fn test_email_format_and_uniqueness() {
        let mut generator = TokenGenerator::email();
        let emails = collect(&mut generator, 500, 9);
        let distinct: HashSet<&String> = emails.iter().collect();
        assert_eq!(distinct.len(), 500);
        for email in &emails {
            let (local, domain) = email.split_once('@').unwrap();
            assert!(local.contains('.'));
            assert!(datasets::EMAIL_DOMAINS.contains(&domain));
            assert_eq!(email, &email.to_lowercase());
        }
    }

    #[test]
    fn test_street_address_shape() {
        let mut generator = TokenGenerator::street_address(true);
        for address in collect(&mut generator, 10, 2) {
            let parts: Vec<&str> = address.split(' ').collect();
            assert_eq!(parts.len(), 3);
            let number: i64 = parts[0].parse().unwrap();
            assert!((1..=9999).contains(&number));
        }
    }

    #[test]
    fn test_job_title_is_not_unique() {
        let generator = TokenGenerator::job_title();
        assert!(!generator.is_unique());
        assert_eq!(generator.max_unique_count(), UniqueCapacity::Finite(8 * 10 * 10));
    }
}
