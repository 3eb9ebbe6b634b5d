//! Persistence around the model: labeled examples in, analysed sentences out.

/// Labeled-example files (`.dat` text with a `.bin` cache) and holdout splits.
pub mod labeled;

/// Analysed sentences keyed by identifier, queried by "target is set".
pub mod records;

pub use labeled::{LabeledExample, load_examples, parse_examples, split_holdout};
pub use records::{NewRecord, Record, RecordStore};
