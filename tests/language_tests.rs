/// Language integration tests — bundled languages, overrides and the text surface.

use conlang_engine::core::syllable::{Element, Syllable, SyllableGenerator};
use conlang_engine::core::text::{sentence_shape, TERMINAL_MARKS};
use conlang_engine::core::word::{WordAssembler, WordError};
use conlang_engine::languages::{self, BUNDLED, LANGUAGE_NOT_FOUND, SYNTAX_ERROR};
use conlang_engine::schema::ruleset::{LanguageDef, LanguageOverride, RulesetError};
use conlang_engine::schema::slot::SlotOption;
use conlang_engine::{Language, LanguageError};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bundled(name: &str, seed: u64) -> Language {
    let def = languages::find(name).unwrap().load().unwrap();
    Language::builder().base(def).seed(seed).build().unwrap()
}

/// Character count of the longest onset + nucleus + coda the ruleset allows.
fn longest_syllable(def: &LanguageDef) -> usize {
    let phonology = &def.phonology;
    let widest = |slots: &[SlotOption]| {
        slots
            .iter()
            .filter_map(|slot| phonology.inventory.lookup(slot))
            .flatten()
            .map(|text| text.chars().count())
            .max()
            .unwrap_or(0)
    };
    let tactics = &phonology.phonotactics;
    let boundary = tactics
        .word_inits
        .iter()
        .chain(&tactics.word_finals)
        .chain(&tactics.fallback_init)
        .chain(&tactics.fallback_final)
        .map(|text| text.chars().count())
        .max()
        .unwrap_or(0);
    widest(&tactics.onsets).max(boundary) + widest(&tactics.nuclei) + widest(&tactics.codas).max(boundary)
}

#[test]
fn every_bundled_language_generates_every_output() {
    for entry in BUNDLED {
        let mut lang = bundled(entry.key, 7);
        assert_eq!(lang.id(), entry.id);

        let syllable = lang.syllable().unwrap();
        assert!(!syllable.nucleus.text.is_empty());

        let max = lang.definition().phonology.other.max_word_length;
        let longest = longest_syllable(lang.definition());
        for length in [None, Some(max)] {
            let word = lang.word(length).unwrap();
            let rendered = word.to_string();
            assert!(!word.is_empty());
            assert!(word.len() <= max);
            assert!(!rendered.is_empty());
            assert!(
                rendered.chars().count() <= max * longest,
                "{} is longer than {} x {}",
                rendered,
                max,
                longest
            );
        }

        let sentence = lang.sentence(None).unwrap();
        assert!(TERMINAL_MARKS.iter().any(|m| sentence.ends_with(m)), "{}", sentence);

        let text = lang.text(Some(2)).unwrap();
        assert_eq!(sentence_shape(&text).len(), 2);

        assert!(!lang.word_simple(None).unwrap().is_empty());
        assert!(!lang.syllable_simple(None).unwrap().is_empty());
        assert!(!lang.first_name(None).unwrap().is_empty());
        assert!(lang.full_name(None).unwrap().ends_with(')'));
    }
}

#[test]
fn test_language_file_matches_bundled_copy() {
    let from_file =
        LanguageDef::load_from_ron(std::path::Path::new("lang_data/test_lang.ron")).unwrap();
    let bundled = languages::find("TEST").unwrap().load().unwrap();
    assert_eq!(from_file, bundled);
    assert!(from_file.phonology.constraints.invalid_coda_onset_pairs.is_some());
}

#[test]
fn missing_file_is_an_io_error() {
    let result = LanguageDef::load_from_ron(std::path::Path::new("lang_data/nope.ron"));
    assert!(matches!(result, Err(RulesetError::Io(_))));
}

#[test]
fn malformed_ron_is_a_parse_error() {
    assert!(matches!(
        LanguageDef::parse_ron("(name: \"Broken\""),
        Err(RulesetError::Ron(_))
    ));
}

#[test]
fn convert_keeps_sentence_and_word_counts() {
    let mut lang = bundled("Gibberish", 11);
    let out = lang.convert("Hello world! Goodbye.").unwrap();
    assert_eq!(sentence_shape(&out), vec![2, 1]);

    let out = lang
        .convert("The river rose at dawn. Nobody knew why! Did the elves see it?")
        .unwrap();
    assert_eq!(sentence_shape(&out), vec![5, 3, 5]);
}

#[test]
fn full_name_has_type_suffix() {
    for key in ["Gibberish", "Elvish", "TestLang"] {
        let mut lang = bundled(key, 12);
        let name = lang.full_name(Some("male")).unwrap();
        assert!(name.ends_with(" (male)"), "{}", name);
        let names = name.trim_end_matches(" (male)");
        let parts: Vec<&str> = names.split(' ').collect();
        assert_eq!(parts.len(), 2, "{}", name);
        assert!(parts
            .iter()
            .all(|p| p.starts_with(|c: char| c.is_uppercase())));
    }
}

#[test]
fn same_seed_reproduces_output() {
    for entry in BUNDLED {
        let mut a = bundled(entry.key, 99);
        let mut b = bundled(entry.key, 99);
        assert_eq!(a.text(None).unwrap(), b.text(None).unwrap());
        assert_eq!(a.full_name(None).unwrap(), b.full_name(None).unwrap());
    }
}

#[test]
fn info_lookup() {
    assert_eq!(
        languages::info(Some("TEST")),
        "Name: Test Language\nID: TEST\nDescription: This language is for testing only."
    );
    assert_eq!(languages::info(None), SYNTAX_ERROR);
    assert_eq!(languages::info(Some("Orcish")), LANGUAGE_NOT_FOUND);
}

const LIQUIDS_ONLY: &str = r#"#![enable(implicit_some)]
(
    phonology: (
        phonotactics: (
            onsets: [["consonants", "liquids"]],
            nuclei: [["vowels", "low"]],
            codas: [["consonants", "nasals"]],
        ),
        config: (max_repair_attempts: 5),
    ),
)"#;

#[test]
fn unsatisfiable_flag_constraint_fails_with_bounded_attempts() {
    // Gibberish forbids a liquid onset after a filled coda, and this
    // override leaves nothing else to draw.
    let over = LanguageOverride::parse_ron(LIQUIDS_ONLY).unwrap();
    let mut lang = Language::builder()
        .with_overrides(over)
        .seed(13)
        .build()
        .unwrap();
    assert!(lang.word(Some(1)).is_ok());
    match lang.word(Some(2)) {
        Err(LanguageError::Word(WordError::ConstraintUnsatisfiable {
            index, attempts, ..
        })) => {
            assert_eq!(index, 1);
            assert_eq!(attempts, 5);
        }
        other => panic!("expected ConstraintUnsatisfiable, got {:?}", other.map(|w| w.to_string())),
    }
}

#[test]
fn pair_rule_without_alternative_is_left_in_place() {
    let over = LanguageOverride::parse_ron(LIQUIDS_ONLY).unwrap();
    let rules = LanguageOverride::parse_ron(
        r#"#![enable(implicit_some)]
        (phonology: (constraints: (
            invalid_coda_onset_pairs: [(["consonants", "ANY"], ["consonants", "liquids"])],
        )))"#,
    )
    .unwrap();
    let mut lang = Language::builder()
        .with_overrides(over)
        .with_overrides(rules)
        .seed(14)
        .build()
        .unwrap();
    let word = lang.word(Some(3)).unwrap();
    assert_eq!(word.len(), 3);
    for syllable in word.syllables() {
        assert_eq!(syllable.onset.slot, SlotOption::filled("consonants", "liquids"));
    }
}

#[test]
fn assemble_from_repairs_supplied_syllables() {
    let def = languages::find("Gibberish").unwrap().load().unwrap();
    let assembler = WordAssembler::new(&def.phonology);
    let mut rng = StdRng::seed_from_u64(15);

    let closed = Syllable {
        onset: Element::new(SlotOption::filled("consonants", "affricates"), "t"),
        nucleus: Element::new(SlotOption::filled("vowels", "low"), "a"),
        coda: Element::new(SlotOption::filled("consonants", "nasals"), "n"),
    };
    let liquid = Syllable {
        onset: Element::new(SlotOption::filled("consonants", "liquids"), "kr"),
        nucleus: Element::new(SlotOption::filled("vowels", "high"), "i"),
        coda: Element::empty(),
    };

    for _ in 0..20 {
        let word = assembler
            .assemble_from(vec![closed.clone(), liquid.clone()], &mut rng)
            .unwrap();
        let onset = &word.syllables()[1].onset;
        assert_ne!(onset.slot.subcategory(), Some("liquids"));
        assert_eq!(word.syllables()[0], closed);
    }

    assert!(matches!(
        assembler.assemble_from(Vec::new(), &mut rng),
        Err(WordError::NoSyllables)
    ));
}

#[test]
fn explicit_word_length_is_clamped() {
    let mut lang = bundled("Elvish", 16);
    let max = lang.definition().phonology.other.max_word_length;
    assert_eq!(lang.word(Some(max + 10)).unwrap().len(), max);
    assert_eq!(lang.word(Some(0)).unwrap().len(), 1);
}

#[test]
fn syllables_resolve_against_inventory() {
    let def = languages::find("TestLang").unwrap().load().unwrap();
    let generator = SyllableGenerator::new(&def.phonology);
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..200 {
        let syllable = generator.syllable(&mut rng).unwrap();
        for element in [&syllable.onset, &syllable.nucleus, &syllable.coda] {
            match def.phonology.inventory.lookup(&element.slot) {
                Some(texts) => assert!(texts.contains(&element.text)),
                None => {
                    assert!(element.slot.is_empty());
                    assert!(element.text.is_empty());
                }
            }
        }
    }
}
