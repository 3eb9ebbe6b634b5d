use super::normalize::{normalize, normalize_whitespace};
use super::token::Token;
use crate::error::SentResult;

/// Splits a text into sentences on `". "`.
///
/// Whitespace is normalized first. Each sentence is trimmed and trailing
/// dots are stripped from the last one. Text without any period yields a
/// single sentence; an empty text yields one empty sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
	let text = normalize_whitespace(text);
	let mut sentences: Vec<String> = text.split(". ").map(|sentence| sentence.trim().to_owned()).collect();

	if let Some(last) = sentences.last_mut() {
		let stripped_len = last.trim_end_matches('.').len();
		last.truncate(stripped_len);
	}

	sentences
}

/// Tokenizes a normalized sentence by splitting on single spaces.
///
/// # Errors
/// Returns `SentError::InvalidToken` if a piece is empty, which happens
/// for an empty sentence or one containing consecutive spaces.
pub fn split_sentence(sentence: &str) -> SentResult<Vec<Token>> {
	sentence.split(' ').map(Token::new).collect()
}

/// Normalizes `text` and splits it into sentences.
pub fn normalize_and_split_sentences(text: &str) -> Vec<String> {
	split_sentences(&normalize(text))
}
