/// Property tests — invariants every assembled word must satisfy.

use conlang_engine::core::syllable::Syllable;
use conlang_engine::core::text::sentence_shape;
use conlang_engine::core::word::Word;
use conlang_engine::languages;
use conlang_engine::Language;
use proptest::prelude::*;

fn bundled(name: &str, seed: u64) -> Language {
    let def = languages::find(name).unwrap().load().unwrap();
    Language::builder().base(def).seed(seed).build().unwrap()
}

fn pairs(word: &Word) -> impl Iterator<Item = (&Syllable, &Syllable)> {
    word.syllables().iter().zip(word.syllables().iter().skip(1))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn words_render_as_their_syllables(seed in any::<u64>(), length in 1usize..=6) {
        for key in ["Gibberish", "Elvish", "TestLang"] {
            let mut lang = bundled(key, seed);
            let word = lang.word(Some(length)).unwrap();
            let max = lang.definition().phonology.other.max_word_length;
            prop_assert_eq!(word.len(), length.min(max));
            prop_assert_eq!(word.to_string(), word.to_array().concat());
            for syllable in word.syllables() {
                prop_assert!(!syllable.nucleus.text.is_empty());
                prop_assert_eq!(syllable.to_string(), syllable.to_array().concat());
            }
        }
    }

    #[test]
    fn gibberish_flag_constraints_hold(seed in any::<u64>()) {
        let mut lang = bundled("Gibberish", seed);
        for _ in 0..10 {
            let word = lang.word(None).unwrap();
            prop_assert!(word.len() <= 5);
            for (prev, cur) in pairs(&word) {
                if !prev.coda.slot.is_empty() {
                    prop_assert_ne!(cur.onset.slot.subcategory(), Some("liquids"));
                } else {
                    prop_assert!(!cur.onset.slot.is_empty(), "{}", word);
                }
            }
        }
    }

    #[test]
    fn elvish_flag_constraints_hold(seed in any::<u64>()) {
        let mut lang = bundled("Elvish", seed);
        for _ in 0..10 {
            let word = lang.word(None).unwrap();
            for (prev, cur) in pairs(&word) {
                if !prev.coda.slot.is_empty() {
                    let sub = cur.onset.slot.subcategory();
                    prop_assert!(sub != Some("liquids") && sub != Some("glides"), "{}", word);
                } else {
                    prop_assert!(!cur.onset.slot.is_empty(), "{}", word);
                }
            }
        }
    }

    #[test]
    fn test_language_rules_hold(seed in any::<u64>()) {
        let mut lang = bundled("TestLang", seed);
        let def = lang.definition().clone();
        let constraints = &def.phonology.constraints;
        let finals = &def.phonology.phonotactics.word_finals;
        for _ in 0..10 {
            let word = lang.word(None).unwrap();
            for (prev, cur) in pairs(&word) {
                if !prev.coda.slot.is_empty() {
                    let sub = cur.onset.slot.subcategory();
                    prop_assert!(sub != Some("liquids") && sub != Some("glides"), "{}", word);
                } else {
                    prop_assert!(!cur.onset.slot.is_empty(), "{}", word);
                }
                prop_assert!(
                    !(prev.coda.text == cur.onset.text
                        && constraints.prevent_double.contains(&cur.onset.text)),
                    "{}",
                    word
                );
            }
            let first = &word.syllables()[0];
            prop_assert!(!constraints.prevent_inits.contains(&first.onset.text), "{}", word);
            let last = &word.syllables()[word.len() - 1];
            prop_assert!(finals.contains(&last.coda.text), "{}", word);
        }
    }

    #[test]
    fn convert_preserves_shape(
        sentences in proptest::collection::vec(1usize..6, 0..5),
        seed in any::<u64>(),
    ) {
        let input: String = sentences
            .iter()
            .map(|&n| format!("{}.", vec!["word"; n].join(" ")))
            .collect::<Vec<_>>()
            .join(" ");
        let mut lang = bundled("Gibberish", seed);
        let out = lang.convert(&input).unwrap();
        prop_assert_eq!(sentence_shape(&out), sentences);
    }
}
