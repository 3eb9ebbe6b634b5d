//! Message intake: where posts come from and how they become scored sentences.

/// Message source boundary (`Message`, `MessageSource`) and a channel-backed source.
pub mod source;

/// Message → sentences → cleaned text → score → record.
pub mod pipeline;

pub use pipeline::{Pipeline, RunSummary, ScoredSentence};
pub use source::{ChannelSource, KeywordFilter, Message, MessageSender, MessageSource, ShutdownHandle};
