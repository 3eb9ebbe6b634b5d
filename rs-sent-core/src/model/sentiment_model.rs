use std::collections::HashSet;

use log::{debug, info};

use super::ngram_matrix::{NEUTRAL_SCORE, NGramMatrix};
use crate::config::ModelConfig;
use crate::error::SentResult;
use crate::store::LabeledExample;
use crate::text::remove_words;

/// An `NGramMatrix` paired with the stop words filtered out before use.
///
/// Sentences given to `train` and `predict` must be normalized; stop-word
/// removal is the only preparation done here.
#[derive(Clone, Debug)]
pub struct SentimentModel {
	matrix: NGramMatrix,
	stop_words: HashSet<String>,
}

impl SentimentModel {
	/// Creates an empty model from its configuration.
	///
	/// # Errors
	/// Returns `SentError::InvalidRange` if the n-gram range is invalid.
	pub fn new(config: &ModelConfig) -> SentResult<Self> {
		Ok(Self {
			matrix: NGramMatrix::new(config.min_n, config.max_n)?,
			stop_words: config.stop_words.clone(),
		})
	}

	pub fn matrix(&self) -> &NGramMatrix {
		&self.matrix
	}

	pub fn stop_words(&self) -> &HashSet<String> {
		&self.stop_words
	}

	/// Trains a sentence once stop words are removed.
	///
	/// A sentence made only of stop words is skipped.
	pub fn train(&mut self, sentence: &str, score: f64) -> SentResult<()> {
		let filtered = remove_words(sentence, &self.stop_words);
		if filtered.is_empty() {
			debug!("Skipping '{}': only stop words", sentence);
			return Ok(());
		}
		self.matrix.train(&filtered, score)
	}

	/// Scores a sentence once stop words are removed.
	///
	/// A sentence made only of stop words scores `NEUTRAL_SCORE`.
	pub fn predict(&self, sentence: &str) -> SentResult<f64> {
		let filtered = remove_words(sentence, &self.stop_words);
		if filtered.is_empty() {
			return Ok(NEUTRAL_SCORE);
		}
		self.matrix.predict(&filtered)
	}

	/// Trains all examples in order, building chunks in parallel.
	pub fn train_examples(&mut self, examples: &[LabeledExample]) -> SentResult<()> {
		let filtered: Vec<LabeledExample> = examples
			.iter()
			.filter_map(|example| {
				let text = remove_words(&example.text, &self.stop_words);
				(!text.is_empty()).then_some(LabeledExample { text, score: example.score })
			})
			.collect();

		info!("Training on {} examples ({} skipped)", filtered.len(), examples.len() - filtered.len());
		self.matrix.train_parallel(&filtered)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config(stop_words: &[&str]) -> ModelConfig {
		ModelConfig { min_n: 1, max_n: 1, stop_words: stop_words.iter().map(|s| s.to_string()).collect() }
	}

	#[test]
	fn test_stop_words_are_ignored() {
		let mut model = SentimentModel::new(&config(&["a"])).unwrap();
		model.train("a good film", 80.0).unwrap();
		model.train("a bad film", -80.0).unwrap();

		assert_eq!(model.matrix().scores(1, "a"), None);
		// good -> 80, film -> 0
		assert!((model.predict("a good film").unwrap() - 40.0).abs() < 1e-9);
	}

	#[test]
	fn test_only_stop_words() {
		let mut model = SentimentModel::new(&config(&["och"])).unwrap();
		model.train("och", 50.0).unwrap();
		assert!(model.matrix().is_empty());
		assert_eq!(model.predict("och och").unwrap(), NEUTRAL_SCORE);
	}

	#[test]
	fn test_train_examples() {
		let examples = vec![
			LabeledExample { text: "en bra film".to_owned(), score: 75.0 },
			LabeledExample { text: "en".to_owned(), score: 10.0 },
			LabeledExample { text: "en dålig film".to_owned(), score: -50.0 },
		];
		let mut model = SentimentModel::new(&config(&["en"])).unwrap();
		model.train_examples(&examples).unwrap();
		assert_eq!(model.matrix().scores(1, "film"), Some(&[75.0, -50.0][..]));
		assert_eq!(model.matrix().scores(1, "en"), None);
	}

	#[test]
	fn test_invalid_config() {
		let config = ModelConfig { min_n: 2, max_n: 1, stop_words: HashSet::new() };
		assert!(SentimentModel::new(&config).is_err());
	}
}
