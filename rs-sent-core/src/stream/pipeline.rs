use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::source::{Message, MessageSource};
use crate::error::SentResult;
use crate::model::SentimentModel;
use crate::store::{NewRecord, RecordStore};
use crate::text::{Token, TokenKind, normalize_and_split_sentences, remove_junk_chars};

/// Prefix of reposted messages, which are not analysed.
const REPOST_PREFIX: &str = "RT @";

/// Marker of a message truncated by its source.
const TRUNCATION_MARK: char = '…';

/// A sentence of a message with the score the model gave it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScoredSentence {
	/// Sentence as split from the message.
	pub pre_text: String,
	/// Cleaned sentence that was scored.
	pub post_text: String,
	pub sentiment: f64,
}

/// Counters returned by `Pipeline::run`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
	/// Messages received from the source.
	pub messages: usize,
	/// Messages dropped as reposts or truncated.
	pub skipped: usize,
	/// Sentences scored and recorded.
	pub sentences: usize,
}

/// Turns incoming messages into scored, recorded sentences.
#[derive(Clone, Debug)]
pub struct Pipeline {
	search_term: String,
}

impl Pipeline {
	/// `search_term` is stored with every record this pipeline creates.
	pub fn new(search_term: &str) -> Self {
		Self { search_term: search_term.to_owned() }
	}

	pub fn search_term(&self) -> &str {
		&self.search_term
	}

	/// `true` for reposts and truncated messages.
	pub fn should_skip(text: &str) -> bool {
		text.starts_with(REPOST_PREFIX) || text.contains(TRUNCATION_MARK)
	}

	/// Drops whitespace-separated URLs from raw text.
	///
	/// Runs before normalization, which deletes `':'` and would leave URLs
	/// looking like plain words.
	pub fn strip_urls(text: &str) -> String {
		text.split_whitespace().filter(|word| TokenKind::infer(word) != TokenKind::Url).collect::<Vec<_>>().join(" ")
	}

	/// Cleans a normalized sentence into the text used for scoring.
	///
	/// URLs are dropped, everything (mentions included) is lowercased and
	/// filler characters are removed. Empty pieces are ignored.
	pub fn clean_sentence(sentence: &str) -> String {
		let words: Vec<String> = sentence
			.split(' ')
			.filter_map(|part| Token::new(part).ok())
			.filter(|token| token.kind() != TokenKind::Url)
			.map(|token| token.text().to_lowercase())
			.collect();

		remove_junk_chars(&words.join(" "))
	}

	/// Splits free text into `(sentence, cleaned sentence)` pairs.
	///
	/// URLs are removed first, then the text is normalized and split.
	/// Sentences that clean down to an empty string are dropped, so every
	/// cleaned sentence is valid model input.
	pub fn prepare(text: &str) -> Vec<(String, String)> {
		normalize_and_split_sentences(&Self::strip_urls(text))
			.into_iter()
			.map(|sentence| {
				let cleaned = Self::clean_sentence(&sentence);
				(sentence, cleaned)
			})
			.filter(|(_, cleaned)| !cleaned.is_empty())
			.collect()
	}

	/// Splits a message into sentences and scores each one.
	///
	/// Returns nothing for skipped messages.
	pub fn analyze(&self, model: &SentimentModel, text: &str) -> SentResult<Vec<ScoredSentence>> {
		if Self::should_skip(text) {
			return Ok(Vec::new());
		}

		let mut scored = Vec::new();
		for (sentence, post_text) in Self::prepare(text) {
			let sentiment = model.predict(&post_text)?;
			debug!("  {} -> {} ({})", sentence, post_text, sentiment);
			scored.push(ScoredSentence { pre_text: sentence, post_text, sentiment });
		}
		Ok(scored)
	}

	/// Analyses a message and records its sentences.
	pub fn process(&self, model: &SentimentModel, store: &mut RecordStore, message: &Message) -> SentResult<Vec<ScoredSentence>> {
		let scored = self.analyze(model, &message.text)?;
		for sentence in &scored {
			store.insert(NewRecord {
				search_term: self.search_term.clone(),
				author: message.author.clone(),
				pre_text: sentence.pre_text.clone(),
				post_text: sentence.post_text.clone(),
				time: message.timestamp,
				sentiment: Some(sentence.sentiment),
			});
		}
		Ok(scored)
	}

	/// Drains `source`, recording every scored sentence in `store`.
	///
	/// Returns when the source ends; the store is flushed before returning.
	/// A message that fails analysis is logged and skipped.
	pub fn run<S: MessageSource>(&self, source: &mut S, model: &SentimentModel, store: &mut RecordStore) -> SentResult<RunSummary> {
		let mut summary = RunSummary::default();

		while let Some(message) = source.next_message() {
			summary.messages += 1;
			if Self::should_skip(&message.text) {
				summary.skipped += 1;
				continue;
			}

			match self.process(model, store, &message) {
				Ok(scored) => {
					info!("Message from {}: {} sentences", message.author, scored.len());
					summary.sentences += scored.len();
				}
				Err(e) => warn!("Skipping message from {}: {}", message.author, e),
			}
		}

		store.flush()?;
		info!(
			"Stream ended: {} messages, {} skipped, {} sentences",
			summary.messages, summary.skipped, summary.sentences
		);
		Ok(summary)
	}
}
