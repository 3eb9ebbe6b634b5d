use std::fmt;

use crate::text::Token;

/// An ordered, fixed-length sequence of tokens.
///
/// Two n-grams are equal when they have the same length and their tokens
/// are equal position by position (token equality only looks at text).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NGram {
	tokens: Vec<Token>,
}

impl NGram {
	pub fn new(tokens: Vec<Token>) -> Self {
		Self { tokens }
	}

	pub fn tokens(&self) -> &[Token] {
		&self.tokens
	}

	/// Order of the n-gram.
	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	/// Canonical lookup key: token texts joined by a single space.
	pub fn key(&self) -> String {
		self.tokens.iter().map(Token::text).collect::<Vec<_>>().join(" ")
	}
}

impl fmt::Display for NGram {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.key())
	}
}

/// Returns every contiguous window of `n` tokens, sliding by one.
///
/// Yields `tokens.len() - n + 1` n-grams, or none when `n == 0` or
/// `n > tokens.len()`.
pub fn make_ngrams(tokens: &[Token], n: usize) -> Vec<NGram> {
	if n == 0 || n > tokens.len() {
		return Vec::new();
	}
	tokens.windows(n).map(|window| NGram::new(window.to_vec())).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::text::split_sentence;

	fn tokens(sentence: &str) -> Vec<Token> {
		split_sentence(sentence).unwrap()
	}

	#[test]
	fn test_bigram() {
		let bi_gram = NGram::new(tokens("some words"));
		assert_eq!(bi_gram.len(), 2);
		assert_eq!(bi_gram.to_string(), "some words");
	}

	#[test]
	fn test_equality() {
		let one_two = NGram::new(tokens("one two"));
		let one_two_again = NGram::new(tokens("One two"));
		let one_two_one = NGram::new(tokens("one two one"));
		assert_eq!(one_two, one_two_again);
		assert_ne!(one_two, one_two_one);
	}

	#[test]
	fn test_count_law() {
		let words = tokens("a b c d e");
		for n in 1..=words.len() {
			assert_eq!(make_ngrams(&words, n).len(), words.len() - n + 1);
		}
		assert!(make_ngrams(&words, 6).is_empty());
		assert!(make_ngrams(&words, 0).is_empty());
		assert!(make_ngrams(&[], 1).is_empty());
	}

	#[test]
	fn test_windows_in_order() {
		let keys: Vec<String> = make_ngrams(&tokens("a good film"), 2).iter().map(NGram::key).collect();
		assert_eq!(keys, vec!["a good", "good film"]);
	}
}
