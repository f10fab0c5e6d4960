/// Pattern mode — fills pattern strings such as `"CVC"` by replacing each
/// character with a draw from the matching flat inventory category.
///
/// Used for names and short simple words; no phonotactic slots or
/// constraints apply here.
use rand::Rng;
use thiserror::Error;

use crate::core::sampler::{pick, SamplerError};
use crate::schema::ruleset::PatternRules;

#[derive(Debug, Error, PartialEq)]
pub enum PatternError {
    #[error("pattern '{pattern}' uses unknown category '{symbol}'")]
    UnknownSymbol { pattern: String, symbol: char },
    #[error("no patterns configured")]
    NoPatterns,
    #[error("sampling failed: {0}")]
    Sampler(#[from] SamplerError),
}

#[derive(Debug, Clone, Copy)]
pub struct PatternGenerator<'a> {
    rules: &'a PatternRules,
}

impl<'a> PatternGenerator<'a> {
    pub fn new(rules: &'a PatternRules) -> Self {
        Self { rules }
    }

    /// Fill `pattern`, or a random configured pattern when `None`.
    pub fn syllable<R: Rng + ?Sized>(
        &self,
        pattern: Option<&str>,
        rng: &mut R,
    ) -> Result<String, PatternError> {
        let pattern = match pattern {
            Some(p) => p,
            None => pick(&self.rules.patterns, rng)
                .map_err(|_| PatternError::NoPatterns)?
                .as_str(),
        };
        let mut out = String::new();
        for symbol in pattern.chars() {
            let options =
                self.rules
                    .category(symbol)
                    .ok_or_else(|| PatternError::UnknownSymbol {
                        pattern: pattern.to_string(),
                        symbol,
                    })?;
            out.push_str(pick(options, rng)?);
        }
        Ok(out)
    }

    /// Concatenate `length` random-pattern syllables; 1 or 2 when `None`.
    pub fn word<R: Rng + ?Sized>(
        &self,
        length: Option<usize>,
        rng: &mut R,
    ) -> Result<String, PatternError> {
        let length = length.unwrap_or_else(|| rng.gen_range(1..=2)).max(1);
        let mut out = String::new();
        for _ in 0..length {
            out.push_str(&self.syllable(None, rng)?);
        }
        Ok(out)
    }
}
