use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::labeled::LabeledExample;
use crate::error::{SentError, SentResult};
use crate::io::{read_binary, write_binary};

/// A sentence taken from a message, with its predicted and labeled scores.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Record {
	pub id: u64,
	pub search_term: String,
	pub author: String,
	/// Sentence as it appeared in the message (normalized).
	pub pre_text: String,
	/// Cleaned sentence used for scoring.
	pub post_text: String,
	pub time: DateTime<Utc>,
	/// Score predicted by the model.
	pub sentiment: Option<f64>,
	/// Score set by a human, making the record usable for training.
	pub target: Option<f64>,
}

/// Fields of a record before it gets an identifier.
#[derive(Clone, Debug)]
pub struct NewRecord {
	pub search_term: String,
	pub author: String,
	pub pre_text: String,
	pub post_text: String,
	pub time: DateTime<Utc>,
	pub sentiment: Option<f64>,
}

#[derive(Serialize, Deserialize, Default)]
struct Snapshot {
	next_id: u64,
	records: BTreeMap<u64, Record>,
}

/// Records keyed by identifier, optionally backed by a postcard file.
///
/// Changes stay in memory until `flush` is called.
#[derive(Default)]
pub struct RecordStore {
	path: Option<PathBuf>,
	next_id: u64,
	records: BTreeMap<u64, Record>,
}

impl RecordStore {
	/// A store that is never written to disk.
	pub fn in_memory() -> Self {
		Self::default()
	}

	/// Opens the store at `path`, loading it if the file exists.
	pub fn open<P: AsRef<Path>>(path: P) -> SentResult<Self> {
		let path = path.as_ref().to_path_buf();
		let snapshot: Snapshot = if path.exists() { read_binary(&path)? } else { Snapshot::default() };
		info!("Opened record store {} ({} records)", path.display(), snapshot.records.len());
		Ok(Self { path: Some(path), next_id: snapshot.next_id, records: snapshot.records })
	}

	/// Stores a new record and returns its identifier.
	pub fn insert(&mut self, record: NewRecord) -> u64 {
		self.next_id += 1;
		let id = self.next_id;
		self.records.insert(
			id,
			Record {
				id,
				search_term: record.search_term,
				author: record.author,
				pre_text: record.pre_text,
				post_text: record.post_text,
				time: record.time,
				sentiment: record.sentiment,
				target: None,
			},
		);
		debug!("Inserted record {}", id);
		id
	}

	pub fn get(&self, id: u64) -> Option<&Record> {
		self.records.get(&id)
	}

	/// Sets the human-labeled score of a record.
	///
	/// # Errors
	/// Returns `SentError::UnknownRecord` if `id` does not exist.
	pub fn set_target(&mut self, id: u64, target: f64) -> SentResult<()> {
		self.records.get_mut(&id).ok_or(SentError::UnknownRecord(id))?.target = Some(target);
		Ok(())
	}

	/// Sets the predicted score of a record.
	///
	/// # Errors
	/// Returns `SentError::UnknownRecord` if `id` does not exist.
	pub fn set_sentiment(&mut self, id: u64, sentiment: f64) -> SentResult<()> {
		self.records.get_mut(&id).ok_or(SentError::UnknownRecord(id))?.sentiment = Some(sentiment);
		Ok(())
	}

	/// Training examples from every record whose target is set, in id order.
	pub fn labeled(&self) -> impl Iterator<Item = LabeledExample> + '_ {
		self.records
			.values()
			.filter_map(|record| record.target.map(|score| LabeledExample { text: record.post_text.clone(), score }))
	}

	/// Every record, in id order.
	pub fn records(&self) -> impl Iterator<Item = &Record> {
		self.records.values()
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Writes the store to its file. Does nothing for an in-memory store.
	pub fn flush(&self) -> SentResult<()> {
		let Some(path) = &self.path else { return Ok(()) };

		#[derive(Serialize)]
		struct SnapshotRef<'a> {
			next_id: u64,
			records: &'a BTreeMap<u64, Record>,
		}

		write_binary(path, &SnapshotRef { next_id: self.next_id, records: &self.records })?;
		debug!("Flushed {} records to {}", self.records.len(), path.display());
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn new_record(post_text: &str) -> NewRecord {
		NewRecord {
			search_term: "#svpol".to_owned(),
			author: "enfors".to_owned(),
			pre_text: post_text.to_owned(),
			post_text: post_text.to_owned(),
			time: Utc::now(),
			sentiment: None,
		}
	}

	#[test]
	fn test_insert_and_label() {
		let mut store = RecordStore::in_memory();
		let first = store.insert(new_record("bra förslag"));
		let second = store.insert(new_record("dåligt förslag"));
		assert_eq!((first, second), (1, 2));
		assert_eq!(store.len(), 2);
		assert_eq!(store.labeled().count(), 0);

		store.set_target(second, -40.0).unwrap();
		store.set_sentiment(first, 12.5).unwrap();

		let labeled: Vec<LabeledExample> = store.labeled().collect();
		assert_eq!(labeled, vec![LabeledExample { text: "dåligt förslag".to_owned(), score: -40.0 }]);
		assert_eq!(store.get(first).and_then(|record| record.sentiment), Some(12.5));
	}

	#[test]
	fn test_unknown_record() {
		let mut store = RecordStore::in_memory();
		assert!(matches!(store.set_target(3, 1.0), Err(SentError::UnknownRecord(3))));
		assert!(store.flush().is_ok());
	}
}
