/// Ruleset Linter — validates language definitions and flags likely mistakes.
///
/// Usage: ruleset_linter <path> [--partial]
///
/// Every `.ron` file under `<path>` is loaded. With `--partial` files are
/// treated as overrides and merged over the bundled Gibberish definition
/// before checking.

use conlang_engine::languages;
use conlang_engine::schema::ruleset::{merge, LanguageDef, LanguageOverride, RulesetError};
use conlang_engine::schema::slot::SlotOption;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: ruleset_linter <path> [--partial]");
        process::exit(0);
    }

    let root = Path::new(&args[1]);
    let partial = args[2..].iter().any(|a| a == "--partial");

    let mut files = Vec::new();
    if root.is_file() {
        files.push(root.to_path_buf());
    } else if root.is_dir() {
        collect_ron_files(root, &mut files);
    } else {
        eprintln!("ERROR: Path '{}' does not exist", args[1]);
        process::exit(1);
    }
    files.sort();

    println!("Found {} ruleset files", files.len());

    let mut total_errors = 0;
    let mut total_warnings = 0;

    for path in &files {
        println!("\n=== {} ===\n", path.display());
        let (errors, warnings) = match load(path, partial) {
            Ok(def) => lint_definition(&def),
            Err(e) => (vec![e.to_string()], Vec::new()),
        };

        if errors.is_empty() && warnings.is_empty() {
            println!("All checks passed!");
        }
        for warning in &warnings {
            println!("WARNING: {}", warning);
        }
        for error in &errors {
            println!("ERROR: {}", error);
        }
        total_errors += errors.len();
        total_warnings += warnings.len();
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        total_errors, total_warnings
    );

    if total_errors == 0 {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn collect_ron_files(dir: &Path, files: &mut Vec<PathBuf>) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                collect_ron_files(&path, files);
            } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                files.push(path);
            }
        }
    }
}

fn load(path: &Path, partial: bool) -> Result<LanguageDef, RulesetError> {
    if partial {
        let over = LanguageOverride::load_from_ron(path)?;
        Ok(merge(languages::gibberish()?, over))
    } else {
        LanguageDef::load_from_ron(path)
    }
}

fn lint_definition(def: &LanguageDef) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Err(e) = def.validate() {
        errors.push(e.to_string());
    }

    if def.name.trim().is_empty() {
        warnings.push("Language has no name".to_string());
    }
    if def.id.trim().is_empty() {
        warnings.push("Language has no ID".to_string());
    }
    if def.desc.trim().is_empty() {
        warnings.push("Language has no description".to_string());
    }

    let phonology = &def.phonology;
    let tactics = &phonology.phonotactics;

    // Subcategories no slot list can ever reach
    let referenced: BTreeSet<(&str, &str)> = tactics
        .onsets
        .iter()
        .chain(&tactics.nuclei)
        .chain(&tactics.codas)
        .filter_map(|slot| match slot {
            SlotOption::Empty => None,
            SlotOption::Filled {
                category,
                subcategory,
            } => Some((category.as_str(), subcategory.as_str())),
        })
        .collect();

    let mut inventory: Vec<_> = phonology.inventory.0.iter().collect();
    inventory.sort_by(|a, b| a.0.cmp(b.0));
    for (category, subcategories) in inventory {
        let mut subcategories: Vec<_> = subcategories.iter().collect();
        subcategories.sort_by(|a, b| a.0.cmp(b.0));
        for (subcategory, texts) in subcategories {
            if texts.is_empty() {
                warnings.push(format!("Subcategory '{}/{}' is empty", category, subcategory));
            }
            if !referenced.contains(&(category.as_str(), subcategory.as_str())) {
                warnings.push(format!(
                    "Subcategory '{}/{}' is never referenced by onsets, nuclei or codas",
                    category, subcategory
                ));
            }
        }
    }

    let constraints = &phonology.constraints;
    if constraints.invalid_coda_onset_pairs.is_some() && constraints.has_legacy_flags() {
        warnings.push(
            "Both invalid_coda_onset_pairs and legacy coda flags are set; both apply".to_string(),
        );
    }
    if phonology.config.max_repair_attempts == 0 {
        warnings.push("max_repair_attempts is 0; any constraint violation will fail".to_string());
    }

    match (&def.pattern, &def.names) {
        (None, _) => warnings.push("No pattern rules; simple words and names disabled".to_string()),
        (Some(pattern), names) => {
            if pattern.patterns.is_empty() {
                warnings.push("Pattern rules define no patterns".to_string());
            }
            if names.is_none() {
                warnings.push("No name rules; name generation disabled".to_string());
            }
        }
    }

    if let Some(names) = &def.names {
        for (name_type, patterns) in &names.first_names {
            if patterns.is_empty() {
                warnings.push(format!("Name type '{}' has no patterns", name_type));
            }
        }
    }

    (errors, warnings)
}
