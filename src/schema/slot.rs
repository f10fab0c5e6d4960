/// Slot options and constraint patterns — the typed references that tie
/// phonotactic rules to inventory entries.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Subcategory wildcard accepted on either side of a coda/onset rule.
pub const ANY: &str = "ANY";
/// Subcategory marker that matches only the empty slot.
pub const NULL: &str = "NULL";

/// One entry of a phonotactics list: either no segment at all, or a
/// `(category, subcategory)` reference into the inventory.
///
/// In RON this is written as `[]` or `["consonants", "liquids"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub enum SlotOption {
    Empty,
    Filled {
        category: String,
        subcategory: String,
    },
}

impl SlotOption {
    pub fn filled(category: &str, subcategory: &str) -> Self {
        Self::Filled {
            category: category.to_string(),
            subcategory: subcategory.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Filled { category, .. } => Some(category),
        }
    }

    pub fn subcategory(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Filled { subcategory, .. } => Some(subcategory),
        }
    }
}

impl TryFrom<Vec<String>> for SlotOption {
    type Error = String;

    fn try_from(parts: Vec<String>) -> Result<Self, Self::Error> {
        let mut parts = parts.into_iter();
        match (parts.next(), parts.next(), parts.next()) {
            (None, _, _) => Ok(Self::Empty),
            (Some(category), Some(subcategory), None) => Ok(Self::Filled {
                category,
                subcategory,
            }),
            _ => Err("slot option must be [] or [category, subcategory]".to_string()),
        }
    }
}

impl From<SlotOption> for Vec<String> {
    fn from(slot: SlotOption) -> Self {
        match slot {
            SlotOption::Empty => Vec::new(),
            SlotOption::Filled {
                category,
                subcategory,
            } => vec![category, subcategory],
        }
    }
}

impl fmt::Display for SlotOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "[]"),
            Self::Filled {
                category,
                subcategory,
            } => write!(f, "{}.{}", category, subcategory),
        }
    }
}

/// One side of an `invalid_coda_onset_pairs` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub enum SlotPattern {
    /// `[category, subcategory]`: matches exactly that slot.
    Exact { category: String, subcategory: String },
    /// `[category, "ANY"]`: matches every filled slot within `category`.
    AnyIn { category: String },
    /// `[category, "NULL"]`: matches only the empty slot.
    Null,
}

impl SlotPattern {
    pub fn matches(&self, slot: &SlotOption) -> bool {
        match (self, slot) {
            (Self::Null, SlotOption::Empty) => true,
            (Self::AnyIn { category }, SlotOption::Filled { category: c, .. }) => category == c,
            (
                Self::Exact {
                    category,
                    subcategory,
                },
                SlotOption::Filled {
                    category: c,
                    subcategory: s,
                },
            ) => category == c && subcategory == s,
            _ => false,
        }
    }
}

impl TryFrom<Vec<String>> for SlotPattern {
    type Error = String;

    fn try_from(parts: Vec<String>) -> Result<Self, Self::Error> {
        let mut parts = parts.into_iter();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(sub), None) if sub == NULL => Ok(Self::Null),
            (Some(category), Some(sub), None) if sub == ANY => Ok(Self::AnyIn { category }),
            (Some(category), Some(subcategory), None) => Ok(Self::Exact {
                category,
                subcategory,
            }),
            _ => Err("constraint slot must be [category, subcategory|ANY|NULL]".to_string()),
        }
    }
}

impl From<SlotPattern> for Vec<String> {
    fn from(pattern: SlotPattern) -> Self {
        match pattern {
            SlotPattern::Exact {
                category,
                subcategory,
            } => vec![category, subcategory],
            SlotPattern::AnyIn { category } => vec![category, ANY.to_string()],
            // The category of a NULL side is never consulted.
            SlotPattern::Null => vec![String::new(), NULL.to_string()],
        }
    }
}

impl fmt::Display for SlotPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact {
                category,
                subcategory,
            } => write!(f, "{}.{}", category, subcategory),
            Self::AnyIn { category } => write!(f, "{}.{}", category, ANY),
            Self::Null => write!(f, "{}", NULL),
        }
    }
}

/// A forbidden `(coda, onset)` adjacency across a syllable boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodaOnsetRule(pub SlotPattern, pub SlotPattern);

impl CodaOnsetRule {
    pub fn matches(&self, coda: &SlotOption, onset: &SlotOption) -> bool {
        self.0.matches(coda) && self.1.matches(onset)
    }
}

impl fmt::Display for CodaOnsetRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}", self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_slot_options_from_ron() {
        let slots: Vec<SlotOption> =
            ron::from_str(r#"[[], ["consonants", "liquids"]]"#).unwrap();
        assert_eq!(slots[0], SlotOption::Empty);
        assert_eq!(slots[1], SlotOption::filled("consonants", "liquids"));
    }

    #[test]
    fn reject_malformed_slot() {
        assert!(ron::from_str::<SlotOption>(r#"["consonants"]"#).is_err());
        assert!(ron::from_str::<SlotOption>(r#"["a", "b", "c"]"#).is_err());
    }

    #[test]
    fn slot_accessors() {
        let slot = SlotOption::filled("vowels", "low");
        assert_eq!(slot.category(), Some("vowels"));
        assert_eq!(slot.subcategory(), Some("low"));
        assert!(!slot.is_empty());
        assert_eq!(SlotOption::Empty.subcategory(), None);
        assert_eq!(slot.to_string(), "vowels.low");
    }

    #[test]
    fn any_matches_within_category_only() {
        let any = SlotPattern::AnyIn {
            category: "consonants".to_string(),
        };
        assert!(any.matches(&SlotOption::filled("consonants", "nasals")));
        assert!(!any.matches(&SlotOption::filled("vowels", "low")));
        assert!(!any.matches(&SlotOption::Empty));
    }

    #[test]
    fn null_matches_only_empty() {
        let null: SlotPattern = ron::from_str(r#"["consonants", "NULL"]"#).unwrap();
        assert_eq!(null, SlotPattern::Null);
        assert!(null.matches(&SlotOption::Empty));
        assert!(!null.matches(&SlotOption::filled("consonants", "nasals")));
    }

    #[test]
    fn coda_onset_rule_matching() {
        let rule: CodaOnsetRule =
            ron::from_str(r#"(["consonants", "ANY"], ["consonants", "liquids"])"#).unwrap();
        let nasal = SlotOption::filled("consonants", "nasals");
        let liquid = SlotOption::filled("consonants", "liquids");
        assert!(rule.matches(&nasal, &liquid));
        assert!(!rule.matches(&SlotOption::Empty, &liquid));
        assert!(!rule.matches(&nasal, &nasal));
    }
}
