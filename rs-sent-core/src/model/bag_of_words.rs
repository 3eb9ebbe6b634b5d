use std::collections::BTreeMap;

/// Records how often each word occurs.
///
/// All words are lowercased before counting. Words are kept in ascending
/// order, which is also the tie-break order of `sorted_by_frequency`.
#[derive(Clone, Debug, Default)]
pub struct BagOfWords {
	words: BTreeMap<String, usize>,
}

impl BagOfWords {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds words to the bag, incrementing their counters.
	pub fn add<I, S>(&mut self, words: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		for word in words {
			*self.words.entry(word.as_ref().to_lowercase()).or_insert(0) += 1;
		}
	}

	/// Occurrences recorded for `word` (case-insensitive).
	pub fn count(&self, word: &str) -> usize {
		self.words.get(&word.to_lowercase()).copied().unwrap_or(0)
	}

	/// Returns `(word, count)` pairs sorted by count.
	///
	/// Words with the same count stay in ascending word order.
	pub fn sorted_by_frequency(&self, descending: bool) -> Vec<(String, usize)> {
		let mut matrix: Vec<(String, usize)> = self.words.iter().map(|(word, count)| (word.clone(), *count)).collect();
		if descending {
			matrix.sort_by(|a, b| b.1.cmp(&a.1));
		} else {
			matrix.sort_by_key(|(_, count)| *count);
		}
		matrix
	}

	/// For every word of the bag (ascending order), how many times it occurs in `words`.
	pub fn frequency_vector<S: AsRef<str>>(&self, words: &[S]) -> Vec<usize> {
		let words: Vec<String> = words.iter().map(|word| word.as_ref().to_lowercase()).collect();
		self.words.keys().map(|known| words.iter().filter(|word| *word == known).count()).collect()
	}

	/// Number of distinct words.
	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_size() {
		let mut bag = BagOfWords::new();
		bag.add("some silly old words".split(' '));
		assert_eq!(bag.len(), 4);
		bag.add("more words".split(' '));
		assert_eq!(bag.len(), 5);
		assert_eq!(bag.count("WORDS"), 2);
	}

	#[test]
	fn test_sorted_by_frequency() {
		let mut bag = BagOfWords::new();
		bag.add("some silly words".split(' '));
		bag.add("some silly".split(' '));
		bag.add(["Some"]);

		assert_eq!(
			bag.sorted_by_frequency(false),
			vec![("words".to_owned(), 1), ("silly".to_owned(), 2), ("some".to_owned(), 3)]
		);
		assert_eq!(
			bag.sorted_by_frequency(true),
			vec![("some".to_owned(), 3), ("silly".to_owned(), 2), ("words".to_owned(), 1)]
		);
	}

	#[test]
	fn test_ties_keep_word_order() {
		let mut bag = BagOfWords::new();
		bag.add(["b", "a", "c", "c"]);
		let descending: Vec<String> = bag.sorted_by_frequency(true).into_iter().map(|(word, _)| word).collect();
		assert_eq!(descending, vec!["c", "a", "b"]);
	}

	#[test]
	fn test_frequency_vector() {
		let mut bag = BagOfWords::new();
		bag.add("A lot of silly little words of little meaning".split(' '));
		// a, little, lot, meaning, of, silly, words
		assert_eq!(bag.frequency_vector(&["some", "silly", "Words", "of", "of"]), vec![0, 0, 0, 0, 2, 1, 1]);
	}
}
