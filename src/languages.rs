/// Bundled example languages and the info lookup.
use log::warn;

use crate::schema::ruleset::{LanguageDef, RulesetError};

pub const SYNTAX_ERROR: &str = "ERROR: Syntax error.";
pub const LANGUAGE_NOT_FOUND: &str = "ERROR: Language not found.";

/// A language definition shipped with the crate.
#[derive(Debug, Clone, Copy)]
pub struct BundledLanguage {
    pub key: &'static str,
    pub id: &'static str,
    source: &'static str,
}

impl BundledLanguage {
    pub fn load(&self) -> Result<LanguageDef, RulesetError> {
        LanguageDef::parse_ron(self.source)
    }
}

pub const BUNDLED: &[BundledLanguage] = &[
    BundledLanguage {
        key: "Gibberish",
        id: "GIB",
        source: include_str!("../lang_data/gibberish.ron"),
    },
    BundledLanguage {
        key: "Elvish",
        id: "ELV",
        source: include_str!("../lang_data/elvish.ron"),
    },
    BundledLanguage {
        key: "TestLang",
        id: "TEST",
        source: include_str!("../lang_data/test_lang.ron"),
    },
];

/// The default language every builder starts from.
pub fn gibberish() -> Result<LanguageDef, RulesetError> {
    BUNDLED[0].load()
}

/// Find a bundled language by key (`"Elvish"`) or ID (`"ELV"`), ignoring case.
pub fn find(name: &str) -> Option<&'static BundledLanguage> {
    BUNDLED
        .iter()
        .find(|lang| lang.key.eq_ignore_ascii_case(name) || lang.id.eq_ignore_ascii_case(name))
}

/// Three-line summary of a bundled language, or an error message.
pub fn info(name: Option<&str>) -> String {
    let name = match name.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => return SYNTAX_ERROR.to_string(),
    };
    let Some(bundled) = find(name) else {
        return LANGUAGE_NOT_FOUND.to_string();
    };
    match bundled.load() {
        Ok(def) => format!("Name: {}\nID: {}\nDescription: {}", def.name, def.id, def.desc),
        Err(e) => {
            warn!("bundled language {} failed to load: {}", bundled.key, e);
            LANGUAGE_NOT_FOUND.to_string()
        }
    }
}
