//! N-gram based sentiment scoring library.
//!
//! This crate provides a small sentence scoring system including:
//! - Token classification and text normalization
//! - Sentence splitting and n-gram generation
//! - An n-gram value matrix learned from labeled sentences
//! - Stores for labeled examples and analysed sentences
//! - A message pipeline feeding a model from a keyword-filtered source
//!
//! The text and model layers are pure and synchronous. A model is not
//! shared between threads by itself; callers serialize access.

/// Word classification, normalization and sentence splitting.
pub mod text;

/// N-grams, the n-gram value matrix and the word frequency counter.
pub mod model;

/// Labeled-example files and the record store.
pub mod store;

/// Message sources and the analysis pipeline.
pub mod stream;

/// TOML configuration.
pub mod config;

/// Crate error type.
pub mod error;

/// I/O utilities (file loading, path helpers, binary caches).
///
/// Not exposed
pub(crate) mod io;

pub use config::{Config, ModelConfig, StreamConfig};
pub use error::{SentError, SentResult};
