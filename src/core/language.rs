/// The language facade: syllables, words, sentences, text, names and
/// text-to-gibberish conversion for one language definition.
///
/// Built via `Language::builder()`. Definitions are merged over the
/// bundled Gibberish default and validated once, at build time.
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::core::pattern::{PatternError, PatternGenerator};
use crate::core::sampler::{pick, SamplerError};
use crate::core::syllable::{Syllable, SyllableError, SyllableGenerator};
use crate::core::text::{self, COMMA_CHANCE, DEFAULT_MAX_LENGTH, TERMINAL_MARKS};
use crate::core::word::{Word, WordAssembler, WordError};
use crate::languages;
use crate::schema::ruleset::{merge, LanguageDef, LanguageOverride, PatternRules, RulesetError};

#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("ruleset error: {0}")]
    Ruleset(#[from] RulesetError),
    #[error("syllable error: {0}")]
    Syllable(#[from] SyllableError),
    #[error("word error: {0}")]
    Word(#[from] WordError),
    #[error("pattern error: {0}")]
    Pattern(#[from] PatternError),
    #[error("sampling failed: {0}")]
    Sampler(#[from] SamplerError),
    #[error("language '{0}' has no pattern rules")]
    PatternUnavailable(String),
    #[error("language '{0}' has no name rules")]
    NamesUnavailable(String),
    #[error("unknown name type: {0}")]
    UnknownNameType(String),
}

/// A validated language definition plus the random source driving it.
pub struct Language {
    def: LanguageDef,
    rng: StdRng,
}

/// Builder for constructing a `Language`.
pub struct LanguageBuilder {
    base: Option<LanguageDef>,
    overrides: Vec<LanguageOverride>,
    seed: Option<u64>,
}

impl Language {
    pub fn builder() -> LanguageBuilder {
        LanguageBuilder {
            base: None,
            overrides: Vec::new(),
            seed: None,
        }
    }

    /// Validate `def` as-is and seed from entropy.
    pub fn new(def: LanguageDef) -> Result<Language, LanguageError> {
        Language::builder().base(def).build()
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn id(&self) -> &str {
        &self.def.id
    }

    pub fn desc(&self) -> &str {
        &self.def.desc
    }

    pub fn definition(&self) -> &LanguageDef {
        &self.def
    }

    pub fn syllable(&mut self) -> Result<Syllable, LanguageError> {
        Ok(SyllableGenerator::new(&self.def.phonology).syllable(&mut self.rng)?)
    }

    /// A word of `length` syllables, or a random length up to the
    /// language's maximum.
    pub fn word(&mut self, length: Option<usize>) -> Result<Word, LanguageError> {
        Ok(WordAssembler::new(&self.def.phonology).assemble(length, &mut self.rng)?)
    }

    /// A sentence of `length` words (1..=10 when `None`): first word
    /// capitalized, occasional commas, and a random terminal mark.
    pub fn sentence(&mut self, length: Option<usize>) -> Result<String, LanguageError> {
        let length = self.length_or_default(length);
        let assembler = WordAssembler::new(&self.def.phonology);
        let mut words = Vec::with_capacity(length);
        for i in 0..length {
            let word = assembler.assemble(None, &mut self.rng)?.to_string();
            let mut word = if i == 0 { text::capitalize(&word) } else { word };
            if i + 1 < length && self.rng.gen_bool(COMMA_CHANCE) {
                word.push(',');
            }
            words.push(word);
        }
        let mark = pick(TERMINAL_MARKS, &mut self.rng)?;
        Ok(format!("{}{}", words.join(" "), mark))
    }

    /// `length` sentences (1..=10 when `None`) joined by single spaces.
    pub fn text(&mut self, length: Option<usize>) -> Result<String, LanguageError> {
        let length = self.length_or_default(length);
        let sentences = (0..length)
            .map(|_| self.sentence(None))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sentences.join(" "))
    }

    /// Replace `input` with gibberish of the same shape: as many sentences,
    /// each with as many words. The content of `input` is otherwise ignored.
    pub fn convert(&mut self, input: &str) -> Result<String, LanguageError> {
        let shape = text::sentence_shape(input);
        debug!("converting text of shape {:?}", shape);
        let sentences = shape
            .into_iter()
            .map(|words| self.sentence(Some(words)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sentences.join(" "))
    }

    /// A pattern-mode syllable for `pattern`, or a random configured pattern.
    pub fn syllable_simple(&mut self, pattern: Option<&str>) -> Result<String, LanguageError> {
        let rules = pattern_rules(&self.def)?;
        Ok(PatternGenerator::new(rules).syllable(pattern, &mut self.rng)?)
    }

    /// A pattern-mode word of `length` syllables (1 or 2 when `None`).
    pub fn word_simple(&mut self, length: Option<usize>) -> Result<String, LanguageError> {
        let rules = pattern_rules(&self.def)?;
        Ok(PatternGenerator::new(rules).word(length, &mut self.rng)?)
    }

    /// A capitalized first name of the given type, or of a random type.
    pub fn first_name(&mut self, name_type: Option<&str>) -> Result<String, LanguageError> {
        let name_type = self.resolve_name_type(name_type)?;
        self.first_name_of(&name_type)
    }

    /// `"<First> <Last> (<type>)"`, the surname drawn as a pattern-mode word.
    pub fn full_name(&mut self, name_type: Option<&str>) -> Result<String, LanguageError> {
        let name_type = self.resolve_name_type(name_type)?;
        let first = self.first_name_of(&name_type)?;
        let last = text::capitalize(&self.word_simple(None)?);
        Ok(format!("{} {} ({})", first, last, name_type))
    }

    /// Name types this language can generate, in sorted order.
    pub fn name_types(&self) -> Vec<&str> {
        self.def
            .names
            .as_ref()
            .map(|names| names.first_names.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn first_name_of(&mut self, name_type: &str) -> Result<String, LanguageError> {
        let names = self
            .def
            .names
            .as_ref()
            .ok_or_else(|| LanguageError::NamesUnavailable(self.def.id.clone()))?;
        let patterns = names
            .first_names
            .get(name_type)
            .ok_or_else(|| LanguageError::UnknownNameType(name_type.to_string()))?;
        let pattern = pick(patterns, &mut self.rng)?;
        let rules = pattern_rules(&self.def)?;
        let name = PatternGenerator::new(rules).syllable(Some(pattern.as_str()), &mut self.rng)?;
        Ok(text::capitalize(&name))
    }

    fn resolve_name_type(&mut self, name_type: Option<&str>) -> Result<String, LanguageError> {
        if let Some(name_type) = name_type {
            return Ok(name_type.to_string());
        }
        let names = self
            .def
            .names
            .as_ref()
            .ok_or_else(|| LanguageError::NamesUnavailable(self.def.id.clone()))?;
        let types: Vec<&String> = names.first_names.keys().collect();
        if types.is_empty() {
            return Err(LanguageError::NamesUnavailable(self.def.id.clone()));
        }
        Ok(pick(&types, &mut self.rng)?.to_string())
    }

    fn length_or_default(&mut self, length: Option<usize>) -> usize {
        length
            .unwrap_or_else(|| self.rng.gen_range(1..=DEFAULT_MAX_LENGTH))
            .max(1)
    }
}

fn pattern_rules(def: &LanguageDef) -> Result<&PatternRules, LanguageError> {
    def.pattern
        .as_ref()
        .ok_or_else(|| LanguageError::PatternUnavailable(def.id.clone()))
}

impl LanguageBuilder {
    /// Use `def` as the base instead of the bundled Gibberish default.
    pub fn base(mut self, def: LanguageDef) -> Self {
        self.base = Some(def);
        self
    }

    /// Merge a partial definition over the base. Later overrides win.
    pub fn with_overrides(mut self, over: LanguageOverride) -> Self {
        self.overrides.push(over);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<Language, LanguageError> {
        let base = match self.base {
            Some(def) => def,
            None => languages::gibberish()?,
        };
        let def = self.overrides.into_iter().fold(base, merge);
        def.validate()?;

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!("built language {} ({})", def.name, def.id);
        Ok(Language { def, rng })
    }
}
