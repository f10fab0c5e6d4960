/// Syllable generation — onset, nucleus and coda drawn from a phonology
/// ruleset, each carrying the slot option it was drawn from.
use log::{debug, warn};
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::core::sampler::{pick, pick_biased, SamplerError};
use crate::schema::ruleset::PhonologyRules;
use crate::schema::slot::SlotOption;

#[derive(Debug, Error, PartialEq)]
pub enum SyllableError {
    #[error("invalid element name '{0}': expected onset, nucleus or coda")]
    InvalidElement(String),
    #[error("slot option {0} does not resolve to any inventory entry")]
    UnresolvedSlot(SlotOption),
    #[error("nucleus text must not be empty")]
    EmptyNucleus,
    #[error("sampling failed: {0}")]
    Sampler(#[from] SamplerError),
}

/// The three parts of a syllable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementName {
    Onset,
    Nucleus,
    Coda,
}

impl ElementName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Onset => "onset",
            Self::Nucleus => "nucleus",
            Self::Coda => "coda",
        }
    }
}

impl FromStr for ElementName {
    type Err = SyllableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "onset" => Ok(Self::Onset),
            "nucleus" => Ok(Self::Nucleus),
            "coda" => Ok(Self::Coda),
            other => Err(SyllableError::InvalidElement(other.to_string())),
        }
    }
}

impl fmt::Display for ElementName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One syllable part: the slot option it was drawn from and its surface text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub slot: SlotOption,
    pub text: String,
}

impl Element {
    pub fn new(slot: SlotOption, text: &str) -> Self {
        Self {
            slot,
            text: text.to_string(),
        }
    }

    pub fn empty() -> Self {
        Self {
            slot: SlotOption::Empty,
            text: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syllable {
    pub onset: Element,
    pub nucleus: Element,
    pub coda: Element,
}

impl Syllable {
    pub fn element(&self, name: ElementName) -> &Element {
        match name {
            ElementName::Onset => &self.onset,
            ElementName::Nucleus => &self.nucleus,
            ElementName::Coda => &self.coda,
        }
    }

    pub fn element_mut(&mut self, name: ElementName) -> &mut Element {
        match name {
            ElementName::Onset => &mut self.onset,
            ElementName::Nucleus => &mut self.nucleus,
            ElementName::Coda => &mut self.coda,
        }
    }

    /// The onset, nucleus and coda texts in order.
    pub fn to_array(&self) -> [&str; 3] {
        [&self.onset.text, &self.nucleus.text, &self.coda.text]
    }
}

impl fmt::Display for Syllable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.onset.text, self.nucleus.text, self.coda.text)
    }
}

/// Explicit elements for a controlled syllable; `None` parts are generated.
#[derive(Debug, Clone, Default)]
pub struct SyllableElements {
    pub onset: Option<Element>,
    pub nucleus: Option<Element>,
    pub coda: Option<Element>,
}

/// Draws syllables and individual syllable parts from a ruleset.
#[derive(Debug, Clone, Copy)]
pub struct SyllableGenerator<'a> {
    rules: &'a PhonologyRules,
}

impl<'a> SyllableGenerator<'a> {
    pub fn new(rules: &'a PhonologyRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'a PhonologyRules {
        self.rules
    }

    /// The phonotactics list feeding the given syllable part.
    pub fn options(&self, name: ElementName) -> &'a [SlotOption] {
        let phonotactics = &self.rules.phonotactics;
        match name {
            ElementName::Onset => &phonotactics.onsets,
            ElementName::Nucleus => &phonotactics.nuclei,
            ElementName::Coda => &phonotactics.codas,
        }
    }

    /// Generate one syllable part.
    ///
    /// An `explicit` slot option is used as-is when it appears in the
    /// part's phonotactics list; otherwise an option is drawn with the
    /// configured bias.
    pub fn generate_element<R: Rng + ?Sized>(
        &self,
        name: ElementName,
        explicit: Option<&SlotOption>,
        rng: &mut R,
    ) -> Result<Element, SyllableError> {
        let options = self.options(name);
        let slot = match explicit {
            Some(slot) if options.contains(slot) => slot,
            _ => pick_biased(options, self.rules.config.effective_bias(), rng)?,
        };
        self.resolve(name, slot, rng)
    }

    pub fn generate_onset<R: Rng + ?Sized>(
        &self,
        explicit: Option<&SlotOption>,
        rng: &mut R,
    ) -> Result<Element, SyllableError> {
        self.generate_element(ElementName::Onset, explicit, rng)
    }

    pub fn generate_nucleus<R: Rng + ?Sized>(
        &self,
        explicit: Option<&SlotOption>,
        rng: &mut R,
    ) -> Result<Element, SyllableError> {
        self.generate_element(ElementName::Nucleus, explicit, rng)
    }

    pub fn generate_coda<R: Rng + ?Sized>(
        &self,
        explicit: Option<&SlotOption>,
        rng: &mut R,
    ) -> Result<Element, SyllableError> {
        self.generate_element(ElementName::Coda, explicit, rng)
    }

    /// Turn a slot option into an element by drawing its surface text.
    fn resolve<R: Rng + ?Sized>(
        &self,
        name: ElementName,
        slot: &SlotOption,
        rng: &mut R,
    ) -> Result<Element, SyllableError> {
        if slot.is_empty() {
            if name == ElementName::Nucleus {
                return Err(SyllableError::EmptyNucleus);
            }
            return Ok(Element::empty());
        }
        let texts = self
            .rules
            .inventory
            .lookup(slot)
            .ok_or_else(|| SyllableError::UnresolvedSlot(slot.clone()))?;
        let text = pick(texts, rng)?;
        if name == ElementName::Nucleus && text.is_empty() {
            return Err(SyllableError::EmptyNucleus);
        }
        Ok(Element::new(slot.clone(), text))
    }

    pub fn syllable<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Syllable, SyllableError> {
        self.syllable_with(SyllableElements::default(), rng)
    }

    /// Build a syllable from any supplied elements, generating the rest.
    pub fn syllable_with<R: Rng + ?Sized>(
        &self,
        elements: SyllableElements,
        rng: &mut R,
    ) -> Result<Syllable, SyllableError> {
        let onset = match elements.onset {
            Some(e) => e,
            None => self.generate_onset(None, rng)?,
        };
        let nucleus = match elements.nucleus {
            Some(e) if e.text.is_empty() => return Err(SyllableError::EmptyNucleus),
            Some(e) => e,
            None => self.generate_nucleus(None, rng)?,
        };
        let coda = match elements.coda {
            Some(e) => e,
            None => self.generate_coda(None, rng)?,
        };
        Ok(Syllable {
            onset,
            nucleus,
            coda,
        })
    }

    /// Redraw all three parts independently.
    pub fn regenerate<R: Rng + ?Sized>(
        &self,
        syllable: &mut Syllable,
        rng: &mut R,
    ) -> Result<(), SyllableError> {
        *syllable = self.syllable(rng)?;
        Ok(())
    }

    /// Redraw one part, choosing uniformly among the options whose
    /// subcategory differs from the current one.
    ///
    /// Returns `false` without touching the syllable when no such option
    /// exists.
    pub fn change_element_type<R: Rng + ?Sized>(
        &self,
        syllable: &mut Syllable,
        name: ElementName,
        rng: &mut R,
    ) -> Result<bool, SyllableError> {
        let current = syllable.element(name).slot.subcategory();
        let alternatives: Vec<&SlotOption> = self
            .options(name)
            .iter()
            .filter(|slot| slot.subcategory() != current)
            .collect();
        if alternatives.is_empty() {
            warn!(
                "cannot retype {}: no alternative to {}",
                name,
                syllable.element(name).slot
            );
            return Ok(false);
        }
        let slot = *pick(&alternatives, rng)?;
        let element = self.resolve(name, slot, rng)?;
        debug!(
            "retyped {} {} -> {} ({:?})",
            name,
            syllable.element(name).slot,
            element.slot,
            element.text
        );
        *syllable.element_mut(name) = element;
        Ok(true)
    }

    /// Like [`SyllableGenerator::change_element_type`], taking the part by name.
    pub fn change_element_type_named<R: Rng + ?Sized>(
        &self,
        syllable: &mut Syllable,
        name: &str,
        rng: &mut R,
    ) -> Result<bool, SyllableError> {
        let name: ElementName = name.parse()?;
        self.change_element_type(syllable, name, rng)
    }
}
