/// Language definitions — phonology rulesets, pattern-mode inventories,
/// name rules, loading, validation and partial-override merging.
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use super::slot::{CodaOnsetRule, SlotOption, SlotPattern};

#[derive(Debug, Error)]
pub enum RulesetError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("{list} references unknown inventory entry {slot}")]
    UnknownSlot { list: &'static str, slot: SlotOption },
    #[error("{list} references inventory entry {slot}, which has no entries")]
    EmptySlot { list: &'static str, slot: SlotOption },
    #[error("nuclei must not contain the empty slot or empty text")]
    EmptyNucleus,
    #[error("constraint rule {rule} references unknown category '{category}'")]
    UnknownConstraintCategory { rule: String, category: String },
    #[error("constraint rule {rule} references unknown subcategory '{category}.{subcategory}'")]
    UnknownConstraintSubcategory {
        rule: String,
        category: String,
        subcategory: String,
    },
    #[error("max_word_length must be at least 1")]
    ZeroWordLength,
    #[error("pattern '{pattern}' uses unknown category '{symbol}'")]
    UnknownPatternSymbol { pattern: String, symbol: char },
    #[error("pattern category '{0}' has no entries")]
    EmptyPatternCategory(String),
    #[error("name type '{0}' has no patterns")]
    EmptyNameType(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Sound inventory: category → subcategory → ordered surface strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(pub FxHashMap<String, FxHashMap<String, Vec<String>>>);

impl Inventory {
    /// Surface strings for a filled slot. `None` for the empty slot or a
    /// dangling reference.
    pub fn lookup(&self, slot: &SlotOption) -> Option<&[String]> {
        match slot {
            SlotOption::Empty => None,
            SlotOption::Filled {
                category,
                subcategory,
            } => self
                .0
                .get(category)
                .and_then(|subs| subs.get(subcategory))
                .map(Vec::as_slice),
        }
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.0.contains_key(category)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Slot-option tables for each syllable part, plus word-boundary allow-lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Phonotactics {
    #[serde(default)]
    pub onsets: Vec<SlotOption>,
    #[serde(default)]
    pub nuclei: Vec<SlotOption>,
    #[serde(default)]
    pub codas: Vec<SlotOption>,
    /// If non-empty, a word's first onset text must be one of these.
    #[serde(default)]
    pub word_inits: Vec<String>,
    /// If non-empty, a word's last coda text must be one of these.
    #[serde(default)]
    pub word_finals: Vec<String>,
    #[serde(default)]
    pub fallback_init: Option<String>,
    #[serde(default)]
    pub fallback_final: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default)]
    pub no_liquid_after_coda: bool,
    #[serde(default)]
    pub no_glide_after_coda: bool,
    #[serde(default)]
    pub no_double_nucleus: bool,
    #[serde(default)]
    pub invalid_coda_onset_pairs: Option<Vec<CodaOnsetRule>>,
    /// Texts that may not close one syllable and open the next.
    #[serde(default)]
    pub prevent_double: Vec<String>,
    #[serde(default)]
    pub prevent_inits: Vec<String>,
    #[serde(default)]
    pub prevent_finals: Vec<String>,
}

impl Constraints {
    /// True when any of the flag-style constraints is switched on.
    pub fn has_legacy_flags(&self) -> bool {
        self.no_liquid_after_coda || self.no_glide_after_coda || self.no_double_nucleus
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherSettings {
    /// Inclusive upper bound on syllables per word.
    pub max_word_length: usize,
}

impl Default for OtherSettings {
    fn default() -> Self {
        Self { max_word_length: 5 }
    }
}

/// Sampling knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Bias exponent for slot-option selection. 1.0 is uniform; larger
    /// values favour earlier options.
    #[serde(default = "default_adjust_types")]
    pub adjust_types: f64,
    /// Cap on every resample-until-valid loop in word assembly.
    #[serde(default = "default_max_repair_attempts")]
    pub max_repair_attempts: u32,
}

fn default_adjust_types() -> f64 {
    1.0
}

fn default_max_repair_attempts() -> u32 {
    100
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            adjust_types: default_adjust_types(),
            max_repair_attempts: default_max_repair_attempts(),
        }
    }
}

impl GenerationConfig {
    /// The bias exponent actually used for sampling: non-positive or NaN
    /// values fall back to uniform.
    pub fn effective_bias(&self) -> f64 {
        if self.adjust_types.is_nan() || self.adjust_types <= 0.0 {
            1.0
        } else {
            self.adjust_types
        }
    }
}

/// The full phonological ruleset driving syllable and word generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhonologyRules {
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub phonotactics: Phonotactics,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub other: OtherSettings,
    #[serde(default)]
    pub config: GenerationConfig,
}

impl PhonologyRules {
    /// Check that every slot option resolves to a non-empty inventory
    /// list and every constraint rule names a known category.
    pub fn validate(&self) -> Result<(), RulesetError> {
        if self.inventory.is_empty() {
            return Err(RulesetError::Missing("phonology.inventory"));
        }
        let lists: [(&'static str, &'static str, &[SlotOption]); 3] = [
            ("onsets", "phonology.phonotactics.onsets", &self.phonotactics.onsets),
            ("nuclei", "phonology.phonotactics.nuclei", &self.phonotactics.nuclei),
            ("codas", "phonology.phonotactics.codas", &self.phonotactics.codas),
        ];
        for (list, path, slots) in lists {
            if slots.is_empty() {
                return Err(RulesetError::Missing(path));
            }
            for slot in slots {
                if slot.is_empty() {
                    if list == "nuclei" {
                        return Err(RulesetError::EmptyNucleus);
                    }
                    continue;
                }
                match self.inventory.lookup(slot) {
                    None => {
                        return Err(RulesetError::UnknownSlot {
                            list,
                            slot: slot.clone(),
                        })
                    }
                    Some([]) => {
                        return Err(RulesetError::EmptySlot {
                            list,
                            slot: slot.clone(),
                        })
                    }
                    Some(texts) if list == "nuclei" && texts.iter().any(String::is_empty) => {
                        return Err(RulesetError::EmptyNucleus)
                    }
                    Some(_) => {}
                }
            }
        }

        if let Some(rules) = &self.constraints.invalid_coda_onset_pairs {
            for rule in rules {
                self.validate_pattern(rule, &rule.0)?;
                self.validate_pattern(rule, &rule.1)?;
            }
        }

        if self.other.max_word_length == 0 {
            return Err(RulesetError::ZeroWordLength);
        }
        Ok(())
    }

    fn validate_pattern(
        &self,
        rule: &CodaOnsetRule,
        pattern: &SlotPattern,
    ) -> Result<(), RulesetError> {
        let (category, subcategory) = match pattern {
            SlotPattern::Null => return Ok(()),
            SlotPattern::AnyIn { category } => (category, None),
            SlotPattern::Exact {
                category,
                subcategory,
            } => (category, Some(subcategory)),
        };
        let Some(subs) = self.inventory.0.get(category) else {
            return Err(RulesetError::UnknownConstraintCategory {
                rule: rule.to_string(),
                category: category.clone(),
            });
        };
        if let Some(subcategory) = subcategory {
            if !subs.contains_key(subcategory) {
                return Err(RulesetError::UnknownConstraintSubcategory {
                    rule: rule.to_string(),
                    category: category.clone(),
                    subcategory: subcategory.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Flat inventory for pattern mode: each single-character key maps to the
/// strings that may replace it, e.g. `"C": ["b", "d"]` for pattern `"CVC"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternRules {
    pub inventory: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl PatternRules {
    pub fn category(&self, symbol: char) -> Option<&[String]> {
        let mut buf = [0u8; 4];
        self.inventory
            .get(symbol.encode_utf8(&mut buf) as &str)
            .map(Vec::as_slice)
    }

    /// Validate a single pattern string against the inventory.
    pub fn validate_pattern(&self, pattern: &str) -> Result<(), RulesetError> {
        for symbol in pattern.chars() {
            match self.category(symbol) {
                None => {
                    return Err(RulesetError::UnknownPatternSymbol {
                        pattern: pattern.to_string(),
                        symbol,
                    })
                }
                Some([]) => return Err(RulesetError::EmptyPatternCategory(symbol.to_string())),
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), RulesetError> {
        if self.patterns.is_empty() {
            return Err(RulesetError::Missing("pattern.patterns"));
        }
        for pattern in &self.patterns {
            self.validate_pattern(pattern)?;
        }
        Ok(())
    }
}

/// Name patterns keyed by name type ("male", "female", "neutral", ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NameRules {
    pub first_names: BTreeMap<String, Vec<String>>,
}

/// A complete language: identity, phonology, and the optional pattern-mode
/// and name rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageDef {
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub phonology: PhonologyRules,
    #[serde(default)]
    pub pattern: Option<PatternRules>,
    #[serde(default)]
    pub names: Option<NameRules>,
}

impl LanguageDef {
    /// Load a language definition from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<LanguageDef, RulesetError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a language definition from a RON string. The result is not
    /// validated; call [`LanguageDef::validate`].
    pub fn parse_ron(input: &str) -> Result<LanguageDef, RulesetError> {
        Ok(ron::from_str(input)?)
    }

    pub fn validate(&self) -> Result<(), RulesetError> {
        self.phonology.validate()?;
        if let Some(pattern) = &self.pattern {
            pattern.validate()?;
        }
        if let Some(names) = &self.names {
            let pattern = self.pattern.as_ref().ok_or(RulesetError::Missing("pattern"))?;
            for (name_type, patterns) in &names.first_names {
                if patterns.is_empty() {
                    return Err(RulesetError::EmptyNameType(name_type.clone()));
                }
                for p in patterns {
                    pattern.validate_pattern(p)?;
                }
            }
        }
        Ok(())
    }
}

/// Section-level overrides for the phonology block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhonologyOverride {
    #[serde(default)]
    pub inventory: Option<Inventory>,
    #[serde(default)]
    pub phonotactics: Option<Phonotactics>,
    #[serde(default)]
    pub constraints: Option<Constraints>,
    #[serde(default)]
    pub other: Option<OtherSettings>,
    #[serde(default)]
    pub config: Option<GenerationConfig>,
}

/// A partial language definition. Every present section replaces the
/// corresponding section of the base it is merged onto.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageOverride {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub phonology: Option<PhonologyOverride>,
    #[serde(default)]
    pub pattern: Option<PatternRules>,
    #[serde(default)]
    pub names: Option<NameRules>,
}

impl LanguageOverride {
    pub fn load_from_ron(path: &Path) -> Result<LanguageOverride, RulesetError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<LanguageOverride, RulesetError> {
        Ok(ron::from_str(input)?)
    }
}

impl From<LanguageDef> for LanguageOverride {
    fn from(def: LanguageDef) -> Self {
        Self {
            name: Some(def.name),
            id: Some(def.id),
            desc: Some(def.desc),
            phonology: Some(PhonologyOverride {
                inventory: Some(def.phonology.inventory),
                phonotactics: Some(def.phonology.phonotactics),
                constraints: Some(def.phonology.constraints),
                other: Some(def.phonology.other),
                config: Some(def.phonology.config),
            }),
            pattern: def.pattern,
            names: def.names,
        }
    }
}

/// Merge `over` onto `base`, replacing whole sections that `over` provides.
pub fn merge(base: LanguageDef, over: LanguageOverride) -> LanguageDef {
    let mut phonology = base.phonology;
    if let Some(p) = over.phonology {
        if let Some(inventory) = p.inventory {
            phonology.inventory = inventory;
        }
        if let Some(phonotactics) = p.phonotactics {
            phonology.phonotactics = phonotactics;
        }
        if let Some(constraints) = p.constraints {
            phonology.constraints = constraints;
        }
        if let Some(other) = p.other {
            phonology.other = other;
        }
        if let Some(config) = p.config {
            phonology.config = config;
        }
    }

    LanguageDef {
        name: over.name.unwrap_or(base.name),
        id: over.id.unwrap_or(base.id),
        desc: over.desc.unwrap_or(base.desc),
        phonology,
        pattern: over.pattern.or(base.pattern),
        names: over.names.or(base.names),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_ron() -> &'static str {
        r#"#![enable(implicit_some)]
        (
            name: "Mini",
            id: "MINI",
            phonology: (
                inventory: {
                    "vowels": { "low": ["a", "o"], "mid": [] },
                    "consonants": { "nasals": ["m", "n"], "liquids": ["bl"] },
                },
                phonotactics: (
                    onsets: [[], ["consonants", "liquids"]],
                    nuclei: [["vowels", "low"]],
                    codas: [[], ["consonants", "nasals"]],
                ),
                constraints: (
                    invalid_coda_onset_pairs: [
                        (["consonants", "ANY"], ["consonants", "liquids"]),
                    ],
                ),
                other: (max_word_length: 3),
            ),
            pattern: (
                inventory: { "C": ["b", "d"], "V": ["a"] },
                patterns: ["CVC"],
            ),
            names: (first_names: { "neutral": ["CV"] }),
        )"#
    }

    fn minimal() -> LanguageDef {
        LanguageDef::parse_ron(minimal_ron()).unwrap()
    }

    #[test]
    fn parse_minimal_definition() {
        let def = minimal();
        assert_eq!(def.id, "MINI");
        assert_eq!(def.phonology.phonotactics.onsets.len(), 2);
        assert_eq!(def.phonology.other.max_word_length, 3);
        assert_eq!(def.phonology.config, GenerationConfig::default());
        assert!(def.validate().is_ok());
    }

    #[test]
    fn lookup_resolves_filled_slots() {
        let def = minimal();
        let inv = &def.phonology.inventory;
        assert_eq!(
            inv.lookup(&SlotOption::filled("consonants", "nasals")),
            Some(&["m".to_string(), "n".to_string()][..])
        );
        assert_eq!(inv.lookup(&SlotOption::Empty), None);
        assert_eq!(inv.lookup(&SlotOption::filled("consonants", "glides")), None);
    }

    #[test]
    fn empty_unreferenced_subcategory_is_allowed() {
        // "vowels.mid" is empty but never referenced by a slot option.
        assert!(minimal().validate().is_ok());
    }

    #[test]
    fn missing_inventory_fails() {
        let mut def = minimal();
        def.phonology.inventory = Inventory::default();
        assert!(matches!(
            def.validate(),
            Err(RulesetError::Missing("phonology.inventory"))
        ));
    }

    #[test]
    fn missing_phonotactics_fails() {
        let mut def = minimal();
        def.phonology.phonotactics.nuclei.clear();
        assert!(matches!(
            def.validate(),
            Err(RulesetError::Missing("phonology.phonotactics.nuclei"))
        ));
    }

    #[test]
    fn dangling_slot_fails() {
        let mut def = minimal();
        def.phonology
            .phonotactics
            .onsets
            .push(SlotOption::filled("consonants", "glides"));
        assert!(matches!(
            def.validate(),
            Err(RulesetError::UnknownSlot { list: "onsets", .. })
        ));
    }

    #[test]
    fn referenced_empty_subcategory_fails() {
        let mut def = minimal();
        def.phonology
            .phonotactics
            .nuclei
            .push(SlotOption::filled("vowels", "mid"));
        assert!(matches!(
            def.validate(),
            Err(RulesetError::EmptySlot { list: "nuclei", .. })
        ));
    }

    #[test]
    fn empty_nucleus_fails() {
        let mut def = minimal();
        def.phonology.phonotactics.nuclei.push(SlotOption::Empty);
        assert!(matches!(def.validate(), Err(RulesetError::EmptyNucleus)));
    }

    #[test]
    fn unknown_constraint_category_fails() {
        let mut def = minimal();
        def.phonology.constraints.invalid_coda_onset_pairs = Some(vec![CodaOnsetRule(
            SlotPattern::AnyIn {
                category: "clicks".to_string(),
            },
            SlotPattern::Null,
        )]);
        assert!(matches!(
            def.validate(),
            Err(RulesetError::UnknownConstraintCategory { .. })
        ));
    }

    #[test]
    fn zero_word_length_fails() {
        let mut def = minimal();
        def.phonology.other.max_word_length = 0;
        assert!(matches!(def.validate(), Err(RulesetError::ZeroWordLength)));
    }

    #[test]
    fn unknown_pattern_symbol_fails() {
        let mut def = minimal();
        if let Some(names) = def.names.as_mut() {
            names
                .first_names
                .insert("male".to_string(), vec!["CXV".to_string()]);
        }
        assert!(matches!(
            def.validate(),
            Err(RulesetError::UnknownPatternSymbol { symbol: 'X', .. })
        ));
    }

    #[test]
    fn names_without_pattern_fails() {
        let mut def = minimal();
        def.pattern = None;
        assert!(matches!(def.validate(), Err(RulesetError::Missing("pattern"))));
    }

    #[test]
    fn effective_bias_falls_back_to_uniform() {
        let mut config = GenerationConfig::default();
        assert_eq!(config.effective_bias(), 1.0);
        config.adjust_types = -2.0;
        assert_eq!(config.effective_bias(), 1.0);
        config.adjust_types = f64::NAN;
        assert_eq!(config.effective_bias(), 1.0);
        config.adjust_types = 3.0;
        assert_eq!(config.effective_bias(), 3.0);
    }

    #[test]
    fn merge_replaces_present_sections_only() {
        let base = minimal();
        let over = LanguageOverride::parse_ron(
            r#"#![enable(implicit_some)]
            (
                name: "Override",
                phonology: (other: (max_word_length: 7)),
            )"#,
        )
        .unwrap();

        let merged = merge(base.clone(), over);
        assert_eq!(merged.name, "Override");
        assert_eq!(merged.id, "MINI");
        assert_eq!(merged.phonology.other.max_word_length, 7);
        assert_eq!(merged.phonology.inventory, base.phonology.inventory);
        assert_eq!(merged.pattern, base.pattern);
    }

    #[test]
    fn merge_full_override_is_identity_on_override() {
        let base = minimal();
        let mut other = minimal();
        other.id = "OTHER".to_string();
        let merged = merge(base, LanguageOverride::from(other.clone()));
        assert_eq!(merged, other);
    }

    #[test]
    fn ron_round_trip() {
        let def = minimal();
        let serialized = ron::to_string(&def).unwrap();
        let deserialized: LanguageDef = ron::from_str(&serialized).unwrap();
        assert_eq!(deserialized, def);
    }
}
