//! Lorem ipsum paragraphs and small JSON records.

use crate::datasets;
use crate::error::GeneratorError;
use crate::generator::{state_mut, InitOptions, ValueGenerator};
use crate::prng::Prng;
use seed_core::GeneratedValue;
use serde_json::json;

#[derive(Debug)]
pub struct LoremIpsumGenerator {
    sentences: u32,
    prng: Option<Prng>,
}

impl LoremIpsumGenerator {
    pub fn new(sentences: u32) -> Self {
        Self {
            sentences: sentences.max(1),
            prng: None,
        }
    }
}

fn sentence(prng: &mut Prng) -> String {
    let words = prng.int(5, 12) as usize;
    let mut text = String::new();
    for i in 0..words {
        let word = datasets::LOREM_WORDS[prng.index(datasets::LOREM_WORDS.len())];
        if i == 0 {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                text.extend(first.to_uppercase());
                text.push_str(chars.as_str());
            }
        } else {
            text.push(' ');
            text.push_str(word);
        }
    }
    text.push('.');
    text
}

impl ValueGenerator for LoremIpsumGenerator {
    fn name(&self) -> &'static str {
        "lorem_ipsum"
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        self.prng = Some(Prng::new(options.seed));
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let sentences = self.sentences;
        let prng = state_mut(&mut self.prng, "lorem_ipsum")?;
        let text: Vec<String> = (0..sentences).map(|_| sentence(prng)).collect();
        Ok(GeneratedValue::String(text.join(" ")))
    }
}

/// JSON records shaped like a small person profile.
#[derive(Debug, Default)]
pub struct JsonGenerator {
    prng: Option<Prng>,
}

fn pick(prng: &mut Prng, words: &'static [&'static str]) -> &'static str {
    words[prng.index(words.len())]
}

impl ValueGenerator for JsonGenerator {
    fn name(&self) -> &'static str {
        "json"
    }

    fn init(&mut self, options: InitOptions) -> Result<(), GeneratorError> {
        self.prng = Some(Prng::new(options.seed));
        Ok(())
    }

    fn generate(&mut self, _index: u64) -> Result<GeneratedValue, GeneratorError> {
        let prng = state_mut(&mut self.prng, "json")?;
        let first = pick(prng, datasets::FIRST_NAMES);
        let last = pick(prng, datasets::LAST_NAMES);
        let visited = prng.int(0, 3);
        let countries: Vec<&str> = (0..visited)
            .map(|_| pick(prng, datasets::COUNTRIES))
            .collect();
        let record = json!({
            "name": format!("{first} {last}"),
            "email": format!(
                "{}.{}@{}",
                first.to_lowercase(),
                last.to_lowercase(),
                pick(prng, datasets::EMAIL_DOMAINS)
            ),
            "age": prng.int(18, 80),
            "isActive": prng.coin(),
            "jobTitle": format!(
                "{} {} {}",
                pick(prng, datasets::JOB_LEVELS),
                pick(prng, datasets::JOB_AREAS),
                pick(prng, datasets::JOB_TYPES)
            ),
            "visitedCountries": countries,
        });
        Ok(GeneratedValue::Json(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lorem_sentences() {
        let mut generator = LoremIpsumGenerator::new(3);
        generator.init(InitOptions::new(1, 1)).unwrap();
        let text = generator.generate(0).unwrap();
        let text = text.as_str().unwrap();
        assert_eq!(text.matches('.').count(), 3);
        assert!(text.chars().next().unwrap().is_uppercase());
    }

    #[test]
    fn test_json_record_shape() {
        let mut generator = JsonGenerator::default();
        generator.init(InitOptions::new(1, 4)).unwrap();
        let GeneratedValue::Json(record) = generator.generate(0).unwrap() else {
            panic!("Expected Json value");
        };
        assert!(record["name"].is_string());
        assert!(record["age"].as_i64().is_some_and(|age| (18..=80).contains(&age)));
        assert!(record["visitedCountries"].is_array());
    }
}
