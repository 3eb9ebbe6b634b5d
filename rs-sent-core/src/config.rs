use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::error::SentResult;

/// Settings of the scoring model.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
	/// Smallest n-gram order recorded and queried.
	pub min_n: usize,

	/// Largest n-gram order recorded and queried.
	pub max_n: usize,

	/// Words dropped from every sentence before training or prediction.
	pub stop_words: HashSet<String>,
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self { min_n: 1, max_n: 3, stop_words: HashSet::new() }
	}
}

/// Settings of the message stream.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct StreamConfig {
	/// Keywords a message must contain (any of them, case-insensitive).
	pub search_terms: Vec<String>,
}

impl Default for StreamConfig {
	fn default() -> Self {
		Self { search_terms: vec!["#svpol".to_owned()] }
	}
}

/// Whole configuration file.
///
/// Unknown sections (e.g. `[server]`) are ignored here, so binaries can
/// keep their own settings in the same file.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
	pub model: ModelConfig,
	pub stream: StreamConfig,
}

impl Config {
	/// Parses a configuration from TOML text.
	pub fn parse(text: &str) -> SentResult<Self> {
		Ok(toml::from_str(text)?)
	}

	/// Reads and parses a TOML configuration file.
	pub fn load<P: AsRef<Path>>(path: P) -> SentResult<Self> {
		Self::parse(&fs::read_to_string(path)?)
	}

	/// Like `load`, but returns the defaults when the file does not exist.
	pub fn load_or_default<P: AsRef<Path>>(path: P) -> SentResult<Self> {
		let path = path.as_ref();
		if !path.exists() {
			info!("No configuration at {}, using defaults", path.display());
			return Ok(Self::default());
		}
		Self::load(path)
	}
}
