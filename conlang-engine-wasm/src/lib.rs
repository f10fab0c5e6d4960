//! WASM bindings for conlang-engine — powers the interactive web demo.

use wasm_bindgen::prelude::*;

use conlang_engine::languages::{self, BUNDLED};
use conlang_engine::schema::ruleset::LanguageOverride;
use conlang_engine::Language;

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct LanguageInfo {
    key: String,
    id: String,
    name: String,
    desc: String,
    name_types: Vec<String>,
}

#[derive(serde::Serialize)]
struct WordInfo {
    text: String,
    syllables: Vec<String>,
}

fn js_error(context: &str, e: impl std::fmt::Display) -> JsError {
    JsError::new(&format!("{context}: {e}"))
}

// ---------------------------------------------------------------------------
// ConlangDemo — the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct ConlangDemo {
    lang: Language,
    key: String,
}

#[wasm_bindgen]
impl ConlangDemo {
    /// Create a new demo instance for a bundled language key or ID.
    #[wasm_bindgen(constructor)]
    pub fn new(lang: &str, seed: u64) -> Result<ConlangDemo, JsError> {
        let bundled = languages::find(lang)
            .ok_or_else(|| JsError::new(&format!("Unknown language: {lang}")))?;
        let def = bundled
            .load()
            .map_err(|e| js_error("Language parse error", e))?;
        let lang = Language::builder()
            .base(def)
            .seed(seed)
            .build()
            .map_err(|e| js_error("Language build error", e))?;
        Ok(ConlangDemo {
            lang,
            key: bundled.key.to_string(),
        })
    }

    /// Create an instance from RON overrides merged over Gibberish.
    pub fn from_ron(source: &str, seed: u64) -> Result<ConlangDemo, JsError> {
        let over =
            LanguageOverride::parse_ron(source).map_err(|e| js_error("Ruleset parse error", e))?;
        let lang = Language::builder()
            .with_overrides(over)
            .seed(seed)
            .build()
            .map_err(|e| js_error("Language build error", e))?;
        let key = lang.name().to_string();
        Ok(ConlangDemo { lang, key })
    }

    /// Generate a word; `length` of 0 picks a random length.
    ///
    /// Returns JSON: `{ "text": "...", "syllables": ["..", ".."] }`.
    pub fn word(&mut self, length: usize) -> Result<String, JsError> {
        let word = self
            .lang
            .word(non_zero(length))
            .map_err(|e| js_error("Generation error", e))?;
        let info = WordInfo {
            text: word.to_string(),
            syllables: word.to_array(),
        };
        serde_json::to_string(&info).map_err(|e| js_error("Serialization error", e))
    }

    /// Generate a sentence; `length` of 0 picks a random length.
    pub fn sentence(&mut self, length: usize) -> Result<String, JsError> {
        self.lang
            .sentence(non_zero(length))
            .map_err(|e| js_error("Generation error", e))
    }

    /// Generate a paragraph; `length` of 0 picks a random sentence count.
    pub fn text(&mut self, length: usize) -> Result<String, JsError> {
        self.lang
            .text(non_zero(length))
            .map_err(|e| js_error("Generation error", e))
    }

    /// Replace `input` with gibberish of the same sentence and word counts.
    pub fn convert(&mut self, input: &str) -> Result<String, JsError> {
        self.lang
            .convert(input)
            .map_err(|e| js_error("Generation error", e))
    }

    /// First name of the given type; an empty type picks one at random.
    pub fn first_name(&mut self, name_type: &str) -> Result<String, JsError> {
        self.lang
            .first_name(non_empty(name_type))
            .map_err(|e| js_error("Generation error", e))
    }

    /// Full name of the given type; an empty type picks one at random.
    pub fn full_name(&mut self, name_type: &str) -> Result<String, JsError> {
        self.lang
            .full_name(non_empty(name_type))
            .map_err(|e| js_error("Generation error", e))
    }

    /// Return a JSON description of the current language.
    pub fn describe(&self) -> Result<String, JsError> {
        let info = LanguageInfo {
            key: self.key.clone(),
            id: self.lang.id().to_string(),
            name: self.lang.name().to_string(),
            desc: self.lang.desc().to_string(),
            name_types: self
                .lang
                .name_types()
                .into_iter()
                .map(str::to_string)
                .collect(),
        };
        serde_json::to_string(&info).map_err(|e| js_error("Serialization error", e))
    }

    /// Three-line summary of a bundled language, or an error message.
    pub fn info(lang: &str) -> String {
        languages::info(non_empty(lang))
    }

    /// Return JSON array of bundled language keys.
    pub fn available_languages() -> String {
        let keys: Vec<&str> = BUNDLED.iter().map(|l| l.key).collect();
        serde_json::to_string(&keys).unwrap_or_else(|_| "[]".to_string())
    }

    /// Reset the language with a new seed (same definition).
    pub fn reset(&mut self, seed: u64) -> Result<(), JsError> {
        self.lang = Language::builder()
            .base(self.lang.definition().clone())
            .seed(seed)
            .build()
            .map_err(|e| js_error("Language build error", e))?;
        Ok(())
    }
}

fn non_zero(length: usize) -> Option<usize> {
    (length > 0).then_some(length)
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}
