use thiserror::Error;

/// Errors raised by the sentiment core and its stores.
///
/// Lookup misses, empty match sets and inputs too short to produce n-grams
/// are not errors; they have documented default values instead.
#[derive(Error, Debug)]
pub enum SentError {
	/// A raw token was empty, so its kind cannot be inferred.
	#[error("Invalid token: raw token is empty")]
	InvalidToken,

	#[error("Invalid n-gram range: min_n={min_n}, max_n={max_n} (need 1 <= min_n <= max_n)")]
	InvalidRange { min_n: usize, max_n: usize },

	#[error("N-gram range mismatch: self=({0}-{1}), other=({2}-{3})")]
	RangeMismatch(usize, usize, usize, usize),

	#[error("Unknown record: {0}")]
	UnknownRecord(u64),

	#[error("Parse error on line {line}: {reason}")]
	Parse { line: usize, reason: String },

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Serialization error: {0}")]
	Serialization(#[from] postcard::Error),

	#[error("Invalid configuration: {0}")]
	Config(#[from] toml::de::Error),
}

pub type SentResult<T> = Result<T, SentError>;
