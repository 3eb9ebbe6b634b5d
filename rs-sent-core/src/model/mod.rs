//! Scoring model built from labeled sentences.
//!
//! - N-gram generation (`NGram`, `make_ngrams`)
//! - The n-gram value matrix (`NGramMatrix`)
//! - A configured model applying stop words (`SentimentModel`)
//! - A word frequency counter for diagnostics (`BagOfWords`)

/// Fixed-length token windows.
pub mod ngram;

/// N-gram → observed scores, per order, with weighted prediction.
///
/// Supports sequential and parallel construction and merging.
pub mod ngram_matrix;

/// `NGramMatrix` plus stop-word filtering, built from a `ModelConfig`.
pub mod sentiment_model;

/// Case-insensitive word frequency counter.
pub mod bag_of_words;

pub use bag_of_words::BagOfWords;
pub use ngram::{NGram, make_ngrams};
pub use ngram_matrix::{NEUTRAL_SCORE, NGramMatrix};
pub use sentiment_model::SentimentModel;
