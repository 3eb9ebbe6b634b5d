use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{SentError, SentResult};

/// Lexical kind of a token, inferred from its shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
	Plain,
	Url,
	Mention,
	Tag,
}

impl TokenKind {
	/// Infers the kind of a non-empty raw token.
	///
	/// Rules are evaluated in order, first match wins:
	/// 1. contains `"://"` → `Url`
	/// 2. starts with `'@'` → `Mention`
	/// 3. starts with `'#'` → `Tag`
	/// 4. otherwise → `Plain`
	pub fn infer(raw: &str) -> Self {
		if raw.contains("://") {
			TokenKind::Url
		} else if raw.starts_with('@') {
			TokenKind::Mention
		} else if raw.starts_with('#') {
			TokenKind::Tag
		} else {
			TokenKind::Plain
		}
	}
}

/// A single word of a sentence along with its lexical kind.
///
/// # Invariants
/// - `text` is never empty
/// - Equality and hashing only look at `text`; `kind` is informational
#[derive(Clone, Debug)]
pub struct Token {
	text: String,
	kind: TokenKind,
}

impl Token {
	/// Classifies a raw token and normalizes its case.
	///
	/// # Parameters
	/// - `raw`: the token as it appears in the sentence.
	/// - `explicit_kind`: skips inference when set.
	/// - `preserve_case`: forces case handling. When `None`, case is kept only
	///   for inferred mentions; everything else is lowercased.
	///
	/// # Errors
	/// Returns `SentError::InvalidToken` if `raw` is empty.
	pub fn classify(raw: &str, explicit_kind: Option<TokenKind>, preserve_case: Option<bool>) -> SentResult<Self> {
		if raw.is_empty() {
			return Err(SentError::InvalidToken);
		}

		let mut preserve_case = preserve_case;
		let kind = match explicit_kind {
			Some(kind) => kind,
			None => {
				let kind = TokenKind::infer(raw);
				if kind == TokenKind::Mention && preserve_case.is_none() {
					preserve_case = Some(true);
				}
				kind
			}
		};

		let text = if preserve_case == Some(true) { raw.to_owned() } else { raw.to_lowercase() };
		Ok(Self { text, kind })
	}

	/// Shorthand for `classify(raw, None, None)`.
	pub fn new(raw: &str) -> SentResult<Self> {
		Self::classify(raw, None, None)
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn kind(&self) -> TokenKind {
		self.kind
	}

	/// Number of characters in the token text.
	pub fn len(&self) -> usize {
		self.text.chars().count()
	}

	pub fn is_empty(&self) -> bool {
		self.text.is_empty()
	}
}

impl PartialEq for Token {
	fn eq(&self, other: &Self) -> bool {
		self.text == other.text
	}
}

impl Eq for Token {}

impl Hash for Token {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.text.hash(state);
	}
}

impl AsRef<str> for Token {
	fn as_ref(&self) -> &str {
		&self.text
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.text)
	}
}
