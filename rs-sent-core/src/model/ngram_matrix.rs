use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use log::{debug, info};

use super::ngram::make_ngrams;
use crate::error::{SentError, SentResult};
use crate::store::LabeledExample;
use crate::text::split_sentence;

/// Score returned by `predict` when no n-gram of the sentence is known.
///
/// Zero is read as "neutral / unknown" sentiment. Whether it is a true
/// midpoint or an artifact of having nothing to average is an open
/// product decision; keep it at zero until that is settled.
pub const NEUTRAL_SCORE: f64 = 0.0;

/// Maps n-grams to the scores observed for sentences containing them.
///
/// One table per order `n` in `[min_n, max_n]`, each keyed by the
/// canonical n-gram string (`NGram::key`).
///
/// # Invariants
/// - `1 <= min_n <= max_n`, fixed at construction
/// - `tables.len() == max_n - min_n + 1`, `tables[i]` holds order `min_n + i`
/// - Score lists keep training order and duplicates; training only appends
#[derive(Clone, Debug)]
pub struct NGramMatrix {
	min_n: usize,
	max_n: usize,
	tables: Vec<HashMap<String, Vec<f64>>>,
}

impl NGramMatrix {
	/// Creates an empty matrix for orders `min_n..=max_n`.
	///
	/// # Errors
	/// Returns `SentError::InvalidRange` if `min_n == 0` or `min_n > max_n`.
	pub fn new(min_n: usize, max_n: usize) -> SentResult<Self> {
		if min_n == 0 || min_n > max_n {
			return Err(SentError::InvalidRange { min_n, max_n });
		}
		Ok(Self { min_n, max_n, tables: vec![HashMap::new(); max_n - min_n + 1] })
	}

	pub fn min_n(&self) -> usize {
		self.min_n
	}

	pub fn max_n(&self) -> usize {
		self.max_n
	}

	/// Number of distinct n-grams recorded for order `n` (0 outside the range).
	pub fn len(&self, n: usize) -> usize {
		self.table(n).map_or(0, HashMap::len)
	}

	/// `true` until the first n-gram is recorded.
	pub fn is_empty(&self) -> bool {
		self.tables.iter().all(HashMap::is_empty)
	}

	/// Scores recorded for the n-gram `key` of order `n`.
	pub fn scores(&self, n: usize, key: &str) -> Option<&[f64]> {
		self.table(n)?.get(key).map(Vec::as_slice)
	}

	fn table(&self, n: usize) -> Option<&HashMap<String, Vec<f64>>> {
		if n < self.min_n || n > self.max_n {
			return None;
		}
		self.tables.get(n - self.min_n)
	}

	/// Gives a score to a sentence and all its n-grams.
	///
	/// The sentence must already be normalized (and stop-word filtered if
	/// wanted). For every order in range, each n-gram appends `score` to its
	/// list; an n-gram repeated inside the sentence appends once per occurrence.
	///
	/// # Errors
	/// Returns `SentError::InvalidToken` if the sentence has an empty token.
	pub fn train(&mut self, sentence: &str, score: f64) -> SentResult<()> {
		let tokens = split_sentence(sentence)?;

		for (offset, table) in self.tables.iter_mut().enumerate() {
			for ngram in make_ngrams(&tokens, self.min_n + offset) {
				table.entry(ngram.key()).or_default().push(score);
			}
		}

		debug!("Trained '{}' with score {}", sentence, score);
		Ok(())
	}

	/// Scores a sentence, or `None` if none of its n-grams are known.
	///
	/// Each known n-gram contributes the mean of its recorded scores
	/// multiplied by its order, so longer matches weigh more. The result is
	/// the mean of all contributions. Unknown n-grams are skipped.
	///
	/// # Errors
	/// Returns `SentError::InvalidToken` if the sentence has an empty token.
	pub fn try_predict(&self, sentence: &str) -> SentResult<Option<f64>> {
		let tokens = split_sentence(sentence)?;
		let mut weighted: Vec<f64> = Vec::new();

		for (offset, table) in self.tables.iter().enumerate() {
			let n = self.min_n + offset;
			for ngram in make_ngrams(&tokens, n) {
				// Unknown n-grams carry no information
				let Some(values) = table.get(&ngram.key()) else { continue };
				weighted.push(mean(values) * n as f64);
			}
		}

		if weighted.is_empty() {
			return Ok(None);
		}
		Ok(Some(mean(&weighted)))
	}

	/// Scores a sentence, falling back to `NEUTRAL_SCORE` when nothing matched.
	///
	/// # Errors
	/// Returns `SentError::InvalidToken` if the sentence has an empty token.
	pub fn predict(&self, sentence: &str) -> SentResult<f64> {
		let value = self.try_predict(sentence)?.unwrap_or(NEUTRAL_SCORE);
		debug!("Value for '{}': {}", sentence, value);
		Ok(value)
	}

	/// Trains every example in order.
	///
	/// # Errors
	/// Stops at the first example with an invalid token.
	pub fn train_all(&mut self, examples: &[LabeledExample]) -> SentResult<()> {
		for example in examples {
			self.train(&example.text, example.score)?;
		}
		Ok(())
	}

	/// Trains every example using one partial matrix per chunk of examples.
	///
	/// # Behavior
	/// - Splits examples into contiguous chunks (CPU cores * factor).
	/// - Spawns threads to build a partial matrix for each chunk.
	/// - Merges partial matrices in chunk order, so every score list ends up
	///   exactly as `train_all` would have built it.
	///
	/// # Errors
	/// Returns the error of the first failing chunk (in chunk order). The
	/// matrix is left untouched in that case.
	pub fn train_parallel(&mut self, examples: &[LabeledExample]) -> SentResult<()> {
		if examples.is_empty() {
			return Ok(());
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = examples.len().div_ceil(chunks);

		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for (index, chunk) in examples.chunks(chunk_size).enumerate() {
				let tx = tx.clone();
				let (min_n, max_n) = (self.min_n, self.max_n);

				scope.spawn(move || {
					let partial = NGramMatrix::new(min_n, max_n).and_then(|mut partial| {
						partial.train_all(chunk)?;
						Ok(partial)
					});
					// The receiver outlives the scope
					let _ = tx.send((index, partial));
				});
			}
		});
		drop(tx);

		let mut partials: Vec<(usize, SentResult<NGramMatrix>)> = rx.iter().collect();
		partials.sort_by_key(|(index, _)| *index);

		// Every chunk must succeed before anything lands in `self`
		let partials: Vec<NGramMatrix> = partials.into_iter().map(|(_, partial)| partial).collect::<SentResult<_>>()?;
		for partial in &partials {
			self.merge(partial)?;
		}

		info!(
			"Built n-gram matrix from {} examples ({} chunks of {})",
			examples.len(),
			examples.len().div_ceil(chunk_size),
			chunk_size
		);
		Ok(())
	}

	/// Merges another matrix into this one.
	///
	/// Score lists of `other` are appended after the ones already recorded.
	///
	/// # Errors
	/// Returns `SentError::RangeMismatch` if the n-gram ranges differ.
	pub fn merge(&mut self, other: &Self) -> SentResult<()> {
		if self.min_n != other.min_n || self.max_n != other.max_n {
			return Err(SentError::RangeMismatch(self.min_n, self.max_n, other.min_n, other.max_n));
		}

		for (table, other_table) in self.tables.iter_mut().zip(&other.tables) {
			for (key, values) in other_table {
				table.entry(key.clone()).or_default().extend_from_slice(values);
			}
		}

		Ok(())
	}
}

fn mean(values: &[f64]) -> f64 {
	values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
	use super::*;

	fn example(text: &str, score: f64) -> LabeledExample {
		LabeledExample { text: text.to_owned(), score }
	}

	#[test]
	fn test_invalid_range() {
		assert!(matches!(NGramMatrix::new(0, 2), Err(SentError::InvalidRange { .. })));
		assert!(matches!(NGramMatrix::new(3, 2), Err(SentError::InvalidRange { .. })));
		assert!(NGramMatrix::new(2, 2).is_ok());
	}

	#[test]
	fn test_good_bad_film() {
		let mut matrix = NGramMatrix::new(1, 1).unwrap();
		matrix.train("a good film", 80.0).unwrap();
		matrix.train("a bad film", -80.0).unwrap();

		assert_eq!(matrix.scores(1, "a"), Some(&[80.0, -80.0][..]));
		assert_eq!(matrix.scores(1, "good"), Some(&[80.0][..]));

		let value = matrix.predict("a good film").unwrap();
		assert!((value - 80.0 / 3.0).abs() < 1e-9);
	}

	#[test]
	fn test_neutral_default() {
		let matrix = NGramMatrix::new(1, 3).unwrap();
		assert_eq!(matrix.predict("anything at all").unwrap(), NEUTRAL_SCORE);
		assert_eq!(matrix.try_predict("anything at all").unwrap(), None);

		let mut trained = NGramMatrix::new(1, 3).unwrap();
		trained.train("a good film", 80.0).unwrap();
		assert_eq!(trained.predict("nothing in common").unwrap(), NEUTRAL_SCORE);
	}

	#[test]
	fn test_monotonic_growth() {
		let mut matrix = NGramMatrix::new(1, 3).unwrap();
		matrix.train("the film was good", 10.0).unwrap();

		let sentence = "the film was bad";
		let tokens = split_sentence(sentence).unwrap();
		let before: Vec<(usize, String, usize)> = (1..=3)
			.flat_map(|n| make_ngrams(&tokens, n).into_iter().map(move |ngram| (n, ngram.key())))
			.map(|(n, key)| {
				let count = matrix.scores(n, &key).map_or(0, <[f64]>::len);
				(n, key, count)
			})
			.collect();

		matrix.train(sentence, -10.0).unwrap();

		for (n, key, count) in before {
			assert_eq!(matrix.scores(n, &key).map_or(0, <[f64]>::len), count + 1, "{} ({})", key, n);
		}
	}

	#[test]
	fn test_repeated_ngram_appends_per_occurrence() {
		let mut matrix = NGramMatrix::new(1, 2).unwrap();
		matrix.train("bra bra bra", 5.0).unwrap();
		assert_eq!(matrix.scores(1, "bra"), Some(&[5.0, 5.0, 5.0][..]));
		assert_eq!(matrix.scores(2, "bra bra"), Some(&[5.0, 5.0][..]));
	}

	#[test]
	fn test_weighting_by_order() {
		// Only the trigram "x y z" is known to the first matrix
		let mut trigrams = NGramMatrix::new(3, 3).unwrap();
		trigrams.train("x y z", 10.0).unwrap();
		trigrams.train("x y z", 20.0).unwrap();

		let mut unigrams = NGramMatrix::new(1, 1).unwrap();
		unigrams.train("w", 10.0).unwrap();
		unigrams.train("w", 20.0).unwrap();

		let three = trigrams.predict("x y z").unwrap();
		let one = unigrams.predict("w").unwrap();
		assert!((one - 15.0).abs() < 1e-9);
		assert!((three - 3.0 * one).abs() < 1e-9);
	}

	#[test]
	fn test_mixed_orders() {
		let mut matrix = NGramMatrix::new(1, 2).unwrap();
		matrix.train("very good", 90.0).unwrap();
		// "very" -> 90, "good" -> 90, "very good" -> 90 * 2
		let value = matrix.predict("very good").unwrap();
		assert!((value - 120.0).abs() < 1e-9);
	}

	#[test]
	fn test_invalid_sentence() {
		let mut matrix = NGramMatrix::new(1, 1).unwrap();
		assert!(matches!(matrix.train("", 1.0), Err(SentError::InvalidToken)));
		assert!(matches!(matrix.predict("a  b"), Err(SentError::InvalidToken)));
		assert!(matrix.is_empty());
	}

	#[test]
	fn test_out_of_range_lookups() {
		let mut matrix = NGramMatrix::new(2, 3).unwrap();
		matrix.train("a b c", 1.0).unwrap();
		assert_eq!(matrix.len(1), 0);
		assert_eq!(matrix.len(2), 2);
		assert_eq!(matrix.len(3), 1);
		assert_eq!(matrix.len(4), 0);
		assert_eq!(matrix.scores(1, "a"), None);
		// A single word has no bigram
		assert_eq!(matrix.try_predict("a").unwrap(), None);
	}

	#[test]
	fn test_merge() {
		let mut left = NGramMatrix::new(1, 2).unwrap();
		left.train("a b", 1.0).unwrap();
		let mut right = NGramMatrix::new(1, 2).unwrap();
		right.train("a c", 2.0).unwrap();

		left.merge(&right).unwrap();
		assert_eq!(left.scores(1, "a"), Some(&[1.0, 2.0][..]));
		assert_eq!(left.scores(2, "a c"), Some(&[2.0][..]));

		let other_range = NGramMatrix::new(1, 3).unwrap();
		assert!(matches!(left.merge(&other_range), Err(SentError::RangeMismatch(1, 2, 1, 3))));
	}

	#[test]
	fn test_parallel_matches_sequential() {
		let examples: Vec<LabeledExample> = (0..500)
			.map(|i| example(&format!("film nummer {} var {}", i % 17, if i % 3 == 0 { "bra" } else { "dålig" }), i as f64))
			.collect();

		let mut sequential = NGramMatrix::new(1, 3).unwrap();
		sequential.train_all(&examples).unwrap();
		let mut parallel = NGramMatrix::new(1, 3).unwrap();
		parallel.train_parallel(&examples).unwrap();

		for n in 1..=3 {
			assert_eq!(sequential.len(n), parallel.len(n));
		}
		assert_eq!(sequential.scores(1, "bra"), parallel.scores(1, "bra"));
		assert_eq!(sequential.scores(3, "nummer 4 var"), parallel.scores(3, "nummer 4 var"));
		assert_eq!(sequential.predict("film var bra").unwrap(), parallel.predict("film var bra").unwrap());
	}

	#[test]
	fn test_parallel_reports_invalid_example() {
		let examples = vec![example("ok", 1.0), example("", 2.0)];
		let mut matrix = NGramMatrix::new(1, 1).unwrap();
		matrix.train("bra", 5.0).unwrap();
		assert!(matches!(matrix.train_parallel(&examples), Err(SentError::InvalidToken)));

		// Chunks trained before the failing one are not merged
		assert_eq!(matrix.len(1), 1);
		assert_eq!(matrix.scores(1, "ok"), None);
		assert_eq!(matrix.scores(1, "bra"), Some(&[5.0][..]));
	}
}
