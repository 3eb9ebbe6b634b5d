use std::path::Path;

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{SentError, SentResult};
use crate::io::{build_output_path, read_binary, read_lines, write_binary};

/// A sentence with the score a human gave it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LabeledExample {
	pub text: String,
	pub score: f64,
}

/// Loads labeled examples from a `.dat` file, or its `.bin` cache if present.
///
/// - The `.dat` file holds one `score<TAB>text` example per line.
/// - Blank lines and lines starting with `#` are ignored.
/// - After parsing, the examples are cached next to the input with `postcard`.
///
/// # Errors
/// Returns `SentError::Parse` for a malformed line, or an I/O /
/// serialization error.
pub fn load_examples<P: AsRef<Path>>(filepath: P) -> SentResult<Vec<LabeledExample>> {
	let binary_data_path = build_output_path(&filepath, "bin")?;
	if binary_data_path.exists() {
		let examples: Vec<LabeledExample> = read_binary(&binary_data_path)?;
		info!("Loaded {} examples from {}", examples.len(), binary_data_path.display());
		return Ok(examples);
	}

	let examples = parse_examples(&read_lines(&filepath)?)?;
	write_binary(&binary_data_path, &examples)?;
	info!("Parsed {} examples from {}", examples.len(), filepath.as_ref().display());
	Ok(examples)
}

/// Parses `score<TAB>text` lines.
pub fn parse_examples<S: AsRef<str>>(lines: &[S]) -> SentResult<Vec<LabeledExample>> {
	let mut examples = Vec::new();

	for (index, line) in lines.iter().enumerate() {
		let line = line.as_ref().trim();
		if line.is_empty() || line.starts_with('#') {
			continue;
		}

		let parse_error = |reason: String| SentError::Parse { line: index + 1, reason };
		let (score, text) = line.split_once('\t').ok_or_else(|| parse_error("expected 'score<TAB>text'".to_owned()))?;
		let score: f64 = score.trim().parse().map_err(|_| parse_error(format!("invalid score '{}'", score)))?;

		examples.push(LabeledExample { text: text.trim().to_owned(), score });
	}

	Ok(examples)
}

/// Shuffles examples with a fixed seed and splits off a test set.
///
/// Returns `(train, test)` where `test` holds `round(len * test_ratio)`
/// examples. `test_ratio` is clamped to `[0.0, 1.0]`.
pub fn split_holdout(examples: &[LabeledExample], test_ratio: f64, seed: u64) -> (Vec<LabeledExample>, Vec<LabeledExample>) {
	let mut shuffled = examples.to_vec();
	shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

	let test_len = (shuffled.len() as f64 * test_ratio.clamp(0.0, 1.0)).round() as usize;
	let test = shuffled.split_off(shuffled.len() - test_len);
	(shuffled, test)
}
