/// Preview — interactive generation shell for testing language definitions.
///
/// Usage: preview [--lang <id|path>] [--seed <n>]
///
/// Commands:
///   syllable              — generate one syllable
///   word [n]              — generate a word of n syllables
///   sentence [n]          — generate a sentence of n words
///   text [n]              — generate n sentences
///   name [type]           — generate a first name
///   fullname [type]       — generate a full name
///   convert <text>        — replace text with gibberish of the same shape
///   lang <id|path>        — switch language
///   info <id>             — describe a bundled language
///   seed <n>              — set RNG seed
///   bulk <n>              — generate n words with variety stats
///   help                  — list commands
///   quit                  — exit

use conlang_engine::core::text::sentence_shape;
use conlang_engine::languages::{self, BUNDLED};
use conlang_engine::schema::ruleset::{LanguageDef, LanguageOverride};
use conlang_engine::{Language, LanguageError};
use std::collections::{HashMap, HashSet};
use std::io::{self, BufRead, Write};
use std::path::Path;

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        print_usage();
        return;
    }

    let mut lang_arg = "Gibberish".to_string();
    let mut seed: u64 = 42;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--lang" if i + 1 < args.len() => {
                i += 1;
                lang_arg = args[i].clone();
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(42);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut def = match load_definition(&lang_arg) {
        Ok(def) => def,
        Err(e) => {
            eprintln!("ERROR loading language {}: {}", lang_arg, e);
            std::process::exit(1);
        }
    };
    let mut current_seed = seed;
    let mut lang = match build_language(&def, current_seed) {
        Ok(lang) => lang,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    println!("Language: {} ({})", lang.name(), lang.id());
    println!("Seed: {}", seed);
    println!("Type 'help' for commands.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}> ", lang.id().to_lowercase());
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (line.to_lowercase(), ""),
        };
        let arg = if rest.is_empty() { None } else { Some(rest) };

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => {
                print_help();
            }
            "syllable" => match lang.syllable() {
                Ok(syllable) => {
                    let [onset, nucleus, coda] = syllable.to_array();
                    println!("{}  [{} | {} | {}]", syllable, onset, nucleus, coda);
                }
                Err(e) => println!("ERROR: {}", e),
            },
            "word" => {
                let Some(length) = parse_count(arg) else {
                    println!("Invalid length: {}", rest);
                    continue;
                };
                match lang.word(length) {
                    Ok(word) => println!("{}  {:?}", word, word.to_array()),
                    Err(e) => println!("ERROR: {}", e),
                }
            }
            "sentence" => {
                let Some(length) = parse_count(arg) else {
                    println!("Invalid length: {}", rest);
                    continue;
                };
                print_result(lang.sentence(length));
            }
            "text" => {
                let Some(length) = parse_count(arg) else {
                    println!("Invalid length: {}", rest);
                    continue;
                };
                print_result(lang.text(length));
            }
            "name" => print_result(lang.first_name(arg)),
            "fullname" => print_result(lang.full_name(arg)),
            "convert" => {
                let Some(input) = arg else {
                    println!("Usage: convert <text>");
                    continue;
                };
                println!("[Shape] {:?}", sentence_shape(input));
                print_result(lang.convert(input));
            }
            "lang" => {
                let Some(name) = arg else {
                    println!("Usage: lang <id|path>");
                    println!("  Current: {} ({})", lang.name(), lang.id());
                    println!("  Bundled: {}", bundled_list());
                    continue;
                };
                match load_definition(name).and_then(|d| {
                    let built = build_language(&d, current_seed)?;
                    Ok((d, built))
                }) {
                    Ok((d, built)) => {
                        def = d;
                        lang = built;
                        println!("Language set to {} ({})", lang.name(), lang.id());
                    }
                    Err(e) => println!("ERROR: {}", e),
                }
            }
            "info" => {
                println!("{}", languages::info(arg));
            }
            "seed" => {
                let Some(value) = arg else {
                    println!("Current seed: {}", current_seed);
                    continue;
                };
                match value.parse::<u64>() {
                    Ok(s) => match build_language(&def, s) {
                        Ok(built) => {
                            current_seed = s;
                            lang = built;
                            println!("Seed set to {}", current_seed);
                        }
                        Err(e) => println!("ERROR: {}", e),
                    },
                    Err(_) => {
                        println!("Invalid seed: {}", value);
                    }
                }
            }
            "bulk" => {
                let count = match arg.map(str::parse::<usize>) {
                    Some(Ok(n)) if n > 0 => n,
                    _ => {
                        println!("Usage: bulk <n>");
                        continue;
                    }
                };
                bulk(&mut lang, count);
            }
            _ => {
                println!("Unknown command: '{}'. Type 'help' for available commands.", cmd);
            }
        }
    }
}

fn bulk(lang: &mut Language, count: usize) {
    let mut words = Vec::new();
    let mut errors = 0;
    for _ in 0..count {
        match lang.word(None) {
            Ok(word) => words.push(word),
            Err(_) => errors += 1,
        }
    }

    println!("\n=== Bulk Generation: {} words ({} errors) ===\n", words.len(), errors);

    let unique: HashSet<String> = words.iter().map(|w| w.to_string()).collect();
    println!("Unique words: {} / {}", unique.len(), words.len());

    let avg_syllables = if words.is_empty() {
        0.0
    } else {
        words.iter().map(|w| w.len() as f64).sum::<f64>() / words.len() as f64
    };
    println!("Average syllables: {:.2}", avg_syllables);

    // Syllable frequency distribution (top 10)
    let mut syllable_counts: HashMap<String, u32> = HashMap::new();
    for word in &words {
        for syllable in word.syllables() {
            *syllable_counts.entry(syllable.to_string()).or_insert(0) += 1;
        }
    }
    let mut freq: Vec<(String, u32)> = syllable_counts.into_iter().collect();
    freq.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    println!("\nTop 10 syllables:");
    for (syllable, count) in freq.iter().take(10) {
        println!("  {}: {}", syllable, count);
    }

    if let Some(first) = words.first() {
        println!("\nSample word: {}", first);
    }
    println!();
}

fn print_result(result: Result<String, LanguageError>) {
    match result {
        Ok(text) => println!("{}", text),
        Err(e) => println!("ERROR: {}", e),
    }
}

/// `None` for no argument, `Some(None)` on a parse failure.
fn parse_count(arg: Option<&str>) -> Option<Option<usize>> {
    match arg {
        None => Some(None),
        Some(s) => s.parse().ok().map(Some),
    }
}

fn bundled_list() -> String {
    BUNDLED
        .iter()
        .map(|l| format!("{} ({})", l.key, l.id))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_usage() {
    println!("Preview — interactive generation shell for testing language definitions.");
    println!();
    println!("Usage: preview [--lang <id|path>] [--seed <n>]");
    println!();
    println!("  --lang <id|path>  Bundled language key or ID, or a .ron override file");
    println!("                    merged over Gibberish (default: Gibberish)");
    println!("  --seed <n>        Initial RNG seed (default: 42)");
}

fn print_help() {
    println!("Commands:");
    println!("  syllable          Generate one syllable with its elements");
    println!("  word [n]          Generate a word of n syllables");
    println!("  sentence [n]      Generate a sentence of n words");
    println!("  text [n]          Generate n sentences");
    println!("  name [type]       Generate a first name");
    println!("  fullname [type]   Generate a full name");
    println!("  convert <text>    Replace text with gibberish of the same shape");
    println!("  lang <id|path>    Switch language");
    println!("  info <id>         Describe a bundled language");
    println!("  seed <n>          Set RNG seed");
    println!("  bulk <n>          Generate n words with variety statistics");
    println!("  help              Show this help");
    println!("  quit              Exit");
    println!();
    println!("Bundled languages: {}", bundled_list());
}

fn load_definition(name: &str) -> Result<LanguageDef, LanguageError> {
    if let Some(bundled) = languages::find(name) {
        return Ok(bundled.load()?);
    }
    let over = LanguageOverride::load_from_ron(Path::new(name))?;
    let lang = Language::builder().with_overrides(over).build()?;
    Ok(lang.definition().clone())
}

fn build_language(def: &LanguageDef, seed: u64) -> Result<Language, LanguageError> {
    Language::builder().base(def.clone()).seed(seed).build()
}
