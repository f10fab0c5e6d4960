/// Worldbuilding example — a short gazetteer written in the bundled languages.
///
/// Elvish names the people and places, Gibberish fills in the chronicle,
/// and a custom dialect is derived from Gibberish by override.
///
/// Run with: cargo run --example worldbuilding

use conlang_engine::core::text::capitalize;
use conlang_engine::languages;
use conlang_engine::schema::ruleset::LanguageOverride;
use conlang_engine::Language;

fn main() {
    env_logger::init();

    // --- Load bundled languages ---
    let elvish_def = languages::find("Elvish")
        .expect("Elvish is bundled")
        .load()
        .expect("Failed to load Elvish");
    let mut elvish = Language::builder()
        .base(elvish_def)
        .seed(2026)
        .build()
        .expect("Failed to build Elvish");

    let mut gibberish = Language::builder()
        .seed(2026)
        .build()
        .expect("Failed to build Gibberish");

    // --- Derive a dialect: shorter words, mostly open syllables ---
    let dialect = LanguageOverride::parse_ron(
        r#"#![enable(implicit_some)]
        (
            name: "Lowland Gibberish",
            id: "GIB-LOW",
            desc: "Clipped speech of the river towns.",
            phonology: (
                other: (max_word_length: 2),
                config: (adjust_types: 2.0),
            ),
        )"#,
    )
    .expect("Failed to parse dialect override");
    let mut lowland = Language::builder()
        .with_overrides(dialect)
        .seed(2026)
        .build()
        .expect("Failed to build dialect");

    // --- Title ---
    println!("========================================");
    println!("   A GAZETTEER OF KHERRET");
    println!("========================================");
    println!();

    for lang in [&elvish, &gibberish, &lowland] {
        println!("{} ({}): {}", lang.name(), lang.id(), lang.desc());
    }
    println!();

    // --- Places ---
    println!("--- Places ---");
    for _ in 0..5 {
        match elvish.word(None) {
            Ok(word) => println!("  {}", capitalize(&word.to_string())),
            Err(e) => println!("  [Generation error: {}]", e),
        }
    }
    println!();

    // --- People ---
    println!("--- People ---");
    for name_type in elvish
        .name_types()
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>()
    {
        print_line(elvish.full_name(Some(name_type.as_str())));
    }
    print_line(gibberish.full_name(None));
    println!();

    // --- Chronicle ---
    println!("--- Chronicle ---");
    print_line(gibberish.text(Some(3)));
    println!();

    // --- Translation ---
    let original = "The river rose at dawn. Nobody knew why! Did the elves see it?";
    println!("--- Translation ---");
    println!("  Common:  {}", original);
    print!("  Lowland: ");
    print_line(lowland.convert(original));
    print!("  Elvish:  ");
    print_line(elvish.convert(original));
    println!();

    // --- Lexicon ---
    println!("--- Lexicon ---");
    for length in 1..=3 {
        match elvish.word(Some(length)) {
            Ok(word) => println!("  {} syllable(s): {} {:?}", length, word, word.to_array()),
            Err(e) => println!("  [Generation error: {}]", e),
        }
    }
    println!();

    println!("{}", languages::info(Some("ELV")));
    println!();
    println!("========================================");
    println!("   FIN");
    println!("========================================");
}

fn print_line<E: std::fmt::Display>(result: Result<String, E>) {
    match result {
        Ok(text) => println!("{}", text),
        Err(e) => println!("[Generation error: {}]", e),
    }
}
