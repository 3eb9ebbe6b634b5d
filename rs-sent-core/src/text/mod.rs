//! Text preparation: word classification, normalization and sentence splitting.
//!
//! Raw text flows through `normalize`, is cut into sentences by
//! `split_sentences`, and each sentence becomes a sequence of `Token`s
//! through `split_sentence`.

/// Word classifier (`Token`, `TokenKind`).
pub mod token;

/// Whitespace, terminator and filler normalization, plus stop-word removal.
pub mod normalize;

/// Sentence splitting and tokenization.
pub mod sentence;

pub use normalize::{normalize, remove_junk_chars, remove_words};
pub use sentence::{normalize_and_split_sentences, split_sentence, split_sentences};
pub use token::{Token, TokenKind};
