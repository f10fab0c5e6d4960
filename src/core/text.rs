/// Text glue: capitalisation and sentence-shape parsing.

/// Marks that may end a generated sentence.
pub const TERMINAL_MARKS: &[&str] = &[".", "?", "!"];

/// Chance of a comma after any non-final word of a sentence.
pub const COMMA_CHANCE: f64 = 0.1;

/// Default upper bound for sentence length (words) and text length
/// (sentences) when none is given.
pub const DEFAULT_MAX_LENGTH: usize = 10;

/// Capitalize the first character of a string.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => {
            let upper: String = c.to_uppercase().collect();
            format!("{}{}", upper, chars.as_str())
        }
    }
}

/// Split text into sentences on runs of `.`, `?` and `!`, then into words
/// on whitespace, returning the word count of every non-empty sentence.
pub fn sentence_shape(input: &str) -> Vec<usize> {
    input
        .split(['.', '?', '!'])
        .map(|sentence| sentence.split_whitespace().count())
        .filter(|&words| words > 0)
        .collect()
}
