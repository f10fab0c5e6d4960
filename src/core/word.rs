/// Word assembly — composes syllables and repairs sequences that violate
/// the ruleset's constraints by regenerating the offending parts.
use log::{debug, warn};
use rand::Rng;
use std::fmt;
use thiserror::Error;

use crate::core::sampler::{pick, resample_until, SamplerError};
use crate::core::syllable::{Element, ElementName, Syllable, SyllableError, SyllableGenerator};
use crate::schema::ruleset::{Constraints, PhonologyRules};

#[derive(Debug, Error)]
pub enum WordError {
    #[error("constraint '{constraint}' still violated at syllable {index} after {attempts} attempts")]
    ConstraintUnsatisfiable {
        constraint: String,
        index: usize,
        attempts: u32,
    },
    #[error("a word needs at least one syllable")]
    NoSyllables,
    #[error("syllable error: {0}")]
    Syllable(#[from] SyllableError),
    #[error("sampling failed: {0}")]
    Sampler(#[from] SamplerError),
}

/// An ordered sequence of syllables whose constraints have been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    syllables: Vec<Syllable>,
}

impl Word {
    pub fn syllables(&self) -> &[Syllable] {
        &self.syllables
    }

    /// Number of syllables.
    pub fn len(&self) -> usize {
        self.syllables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.syllables.is_empty()
    }

    /// One string per syllable.
    pub fn to_array(&self) -> Vec<String> {
        self.syllables.iter().map(Syllable::to_string).collect()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for syllable in &self.syllables {
            write!(f, "{}", syllable)?;
        }
        Ok(())
    }
}

/// Builds words from a ruleset.
#[derive(Debug, Clone, Copy)]
pub struct WordAssembler<'a> {
    generator: SyllableGenerator<'a>,
}

impl<'a> WordAssembler<'a> {
    pub fn new(rules: &'a PhonologyRules) -> Self {
        Self {
            generator: SyllableGenerator::new(rules),
        }
    }

    fn rules(&self) -> &'a PhonologyRules {
        self.generator.rules()
    }

    /// Generate a word of `length` syllables, or a random length in
    /// `1..=max_word_length` when `None`. Explicit lengths are clamped to
    /// that range.
    pub fn assemble<R: Rng + ?Sized>(
        &self,
        length: Option<usize>,
        rng: &mut R,
    ) -> Result<Word, WordError> {
        let max = self.rules().other.max_word_length.max(1);
        let length = match length {
            Some(n) => n.clamp(1, max),
            None => rng.gen_range(1..=max),
        };
        let syllables = (0..length)
            .map(|_| self.generator.syllable(rng))
            .collect::<Result<Vec<_>, _>>()?;
        self.assemble_from(syllables, rng)
    }

    /// Resolve constraints over caller-supplied syllables.
    pub fn assemble_from<R: Rng + ?Sized>(
        &self,
        mut syllables: Vec<Syllable>,
        rng: &mut R,
    ) -> Result<Word, WordError> {
        if syllables.is_empty() {
            return Err(WordError::NoSyllables);
        }
        let constraints = &self.rules().constraints;
        if constraints.invalid_coda_onset_pairs.is_some() {
            self.repair_pairs(&mut syllables, rng)?;
        }
        if constraints.has_legacy_flags() {
            self.repair_legacy(&mut syllables, rng)?;
        }
        if !constraints.prevent_double.is_empty() {
            self.repair_doubles(&mut syllables, rng)?;
        }
        self.enforce_boundaries(&mut syllables, rng)?;
        Ok(Word { syllables })
    }

    /// Retype onsets that form a forbidden coda/onset pair with the
    /// preceding coda. Rules are applied in declared order; a pair is swept
    /// again until no rule fires.
    fn repair_pairs<R: Rng + ?Sized>(
        &self,
        syllables: &mut [Syllable],
        rng: &mut R,
    ) -> Result<(), WordError> {
        let Some(rules) = &self.rules().constraints.invalid_coda_onset_pairs else {
            return Ok(());
        };
        let max_attempts = self.rules().config.max_repair_attempts;

        for i in 1..syllables.len() {
            let (head, tail) = syllables.split_at_mut(i);
            let prev = &head[i - 1];
            let cur = &mut tail[0];

            let mut sweeps = 0;
            'sweep: loop {
                let violated = rules
                    .iter()
                    .any(|rule| rule.matches(&prev.coda.slot, &cur.onset.slot));
                if !violated {
                    break;
                }
                if sweeps == max_attempts {
                    return Err(WordError::ConstraintUnsatisfiable {
                        constraint: "invalid_coda_onset_pairs".to_string(),
                        index: i,
                        attempts: sweeps,
                    });
                }
                sweeps += 1;
                for rule in rules {
                    if !rule.matches(&prev.coda.slot, &cur.onset.slot) {
                        continue;
                    }
                    if !self
                        .generator
                        .change_element_type(cur, ElementName::Onset, rng)?
                    {
                        warn!("constraint {} cannot be repaired at syllable {}", rule, i);
                        break 'sweep;
                    }
                    debug!("enforcing constraint {} at syllable {} => {:?}", rule, i, cur.onset.text);
                }
            }
        }
        Ok(())
    }

    /// Flag-style constraints: no liquid or glide onset after a filled
    /// coda, and no empty onset after an empty coda. Offending onsets are
    /// redrawn until every active flag is satisfied.
    fn repair_legacy<R: Rng + ?Sized>(
        &self,
        syllables: &mut [Syllable],
        rng: &mut R,
    ) -> Result<(), WordError> {
        let constraints = &self.rules().constraints;
        let max_attempts = self.rules().config.max_repair_attempts;

        for i in 1..syllables.len() {
            let (head, tail) = syllables.split_at_mut(i);
            let prev = &head[i - 1];
            let cur = &mut tail[0];

            if legacy_ok(constraints, &prev.coda, &cur.onset) {
                continue;
            }
            let onset = resample_until(
                max_attempts,
                || self.generator.generate_onset(None, rng),
                |onset| legacy_ok(constraints, &prev.coda, onset),
            )?
            .ok_or_else(|| WordError::ConstraintUnsatisfiable {
                constraint: "legacy onset flags".to_string(),
                index: i,
                attempts: max_attempts,
            })?;
            debug!(
                "enforcing legacy constraint at syllable {}: {} => {}",
                i, cur.onset.slot, onset.slot
            );
            cur.onset = onset;
        }
        Ok(())
    }

    /// Redraw onsets (keeping their slot) that repeat a forbidden text
    /// closing the previous syllable.
    fn repair_doubles<R: Rng + ?Sized>(
        &self,
        syllables: &mut [Syllable],
        rng: &mut R,
    ) -> Result<(), WordError> {
        let forbidden = &self.rules().constraints.prevent_double;
        let max_attempts = self.rules().config.max_repair_attempts;
        let is_double =
            |coda: &Element, onset: &Element| coda.text == onset.text && forbidden.contains(&onset.text);

        for i in 1..syllables.len() {
            let (head, tail) = syllables.split_at_mut(i);
            let prev = &head[i - 1];
            let cur = &mut tail[0];

            if !is_double(&prev.coda, &cur.onset) {
                continue;
            }
            let slot = cur.onset.slot.clone();
            let onset = resample_until(
                max_attempts,
                || self.generator.generate_onset(Some(&slot), rng),
                |onset| !is_double(&prev.coda, onset),
            )?
            .ok_or_else(|| WordError::ConstraintUnsatisfiable {
                constraint: format!("prevent_double({})", cur.onset.text),
                index: i,
                attempts: max_attempts,
            })?;
            debug!(
                "enforcing prevent_double at syllable {}: {:?} => {:?}",
                i, cur.onset.text, onset.text
            );
            cur.onset = onset;
        }
        Ok(())
    }

    /// Apply word-initial and word-final allow/deny lists. Only the text is
    /// replaced; the element keeps the slot it was drawn from.
    fn enforce_boundaries<R: Rng + ?Sized>(
        &self,
        syllables: &mut [Syllable],
        rng: &mut R,
    ) -> Result<(), WordError> {
        let rules = self.rules();
        let phonotactics = &rules.phonotactics;
        let constraints = &rules.constraints;

        if let Some(first) = syllables.first_mut() {
            self.enforce_boundary(
                &mut first.onset,
                &phonotactics.word_inits,
                &constraints.prevent_inits,
                phonotactics.fallback_init.as_deref(),
                "word-initial",
                rng,
            )?;
        }
        if let Some(last) = syllables.last_mut() {
            self.enforce_boundary(
                &mut last.coda,
                &phonotactics.word_finals,
                &constraints.prevent_finals,
                phonotactics.fallback_final.as_deref(),
                "word-final",
                rng,
            )?;
        }
        Ok(())
    }

    fn enforce_boundary<R: Rng + ?Sized>(
        &self,
        element: &mut Element,
        allowed: &[String],
        prevented: &[String],
        fallback: Option<&str>,
        position: &str,
        rng: &mut R,
    ) -> Result<(), WordError> {
        if !allowed.is_empty() && !allowed.contains(&element.text) {
            let text = pick(allowed, rng)?;
            debug!("enforcing {} allow-list: {:?} => {:?}", position, element.text, text);
            element.text = text.clone();
        } else if prevented.contains(&element.text) {
            let candidates: Vec<&String> = self
                .rules()
                .inventory
                .lookup(&element.slot)
                .unwrap_or_default()
                .iter()
                .filter(|text| !prevented.contains(*text))
                .collect();
            let text = if candidates.is_empty() {
                warn!(
                    "no permitted {} text in {}, falling back to {:?}",
                    position,
                    element.slot,
                    fallback.unwrap_or_default()
                );
                fallback.unwrap_or_default().to_string()
            } else {
                (*pick(&candidates, rng)?).clone()
            };
            debug!("enforcing {} deny-list: {:?} => {:?}", position, element.text, text);
            element.text = text;
        }
        Ok(())
    }
}

/// Whether `onset` may follow `coda` under the flag-style constraints.
fn legacy_ok(constraints: &Constraints, coda: &Element, onset: &Element) -> bool {
    let subcategory = onset.slot.subcategory();
    if !coda.slot.is_empty() {
        if constraints.no_liquid_after_coda && subcategory == Some("liquids") {
            return false;
        }
        if constraints.no_glide_after_coda && subcategory == Some("glides") {
            return false;
        }
    } else if constraints.no_double_nucleus && onset.slot.is_empty() {
        return false;
    }
    true
}
