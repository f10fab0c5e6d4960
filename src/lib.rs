//! Conlang Engine — rule-driven generation of constructed-language text.
//!
//! Produces syllables, words, sentences, names and whole passages that
//! sound like a constructed language, from a declarative description of
//! its sound inventory, syllable-construction rules and sequencing
//! constraints.

pub mod core;
pub mod languages;
pub mod schema;

pub use crate::core::language::{Language, LanguageBuilder, LanguageError};
pub use crate::core::syllable::Syllable;
pub use crate::core::word::Word;
pub use crate::schema::ruleset::{LanguageDef, LanguageOverride};
