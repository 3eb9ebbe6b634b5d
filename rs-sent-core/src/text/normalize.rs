use std::collections::HashSet;

/// Characters treated as sentence terminators, unified into `'.'`.
const SENTENCE_DIVIDERS: [char; 2] = ['!', '?'];

/// Filler characters deleted from normalized text.
const JUNK_CHARS: [char; 5] = [',', ':', ';', '(', ')'];

/// Returns a normalized copy of `text`.
///
/// Steps, in order:
/// 1. whitespace normalization (`normalize_whitespace`)
/// 2. sentence terminator unification (`unify_sentence_dividers`)
/// 3. filler character removal (`remove_junk_chars`)
/// 4. a final whitespace collapse, for gaps left by removed fillers
///
/// `normalize(normalize(s)) == normalize(s)` holds for every `s`.
pub fn normalize(text: &str) -> String {
	let text = normalize_whitespace(text);
	let text = unify_sentence_dividers(&text);
	let text = remove_junk_chars(&text);
	normalize_whitespace(&text)
}

/// Returns a copy of `text` with exactly one space between words.
///
/// - `\n` and `\t` become spaces, `\r` is dropped
/// - runs of spaces collapse into one
/// - leading and trailing spaces are trimmed
pub fn normalize_whitespace(text: &str) -> String {
	let text: String = text
		.chars()
		.filter(|c| *c != '\r')
		.map(|c| if c == '\n' || c == '\t' { ' ' } else { c })
		.collect();

	text.split(' ').filter(|word| !word.is_empty()).collect::<Vec<_>>().join(" ")
}

/// Returns a copy of `text` with `!` and `?` replaced by `.`.
pub fn unify_sentence_dividers(text: &str) -> String {
	text.chars().map(|c| if SENTENCE_DIVIDERS.contains(&c) { '.' } else { c }).collect()
}

/// Returns a copy of `text` without filler punctuation.
pub fn remove_junk_chars(text: &str) -> String {
	text.chars().filter(|c| !JUNK_CHARS.contains(c)).collect()
}

/// Drops every space-separated word that exactly matches a stop word.
///
/// Matching is done on the raw word (no case folding). Survivors are
/// rejoined with single spaces.
pub fn remove_words(text: &str, stop_words: &HashSet<String>) -> String {
	text.split(' ').filter(|word| !stop_words.contains(*word)).collect::<Vec<_>>().join(" ")
}
