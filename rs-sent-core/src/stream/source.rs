use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, SendError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

/// How often a blocked `ChannelSource` checks for shutdown.
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

/// A post delivered by a message source.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Message {
	pub author: String,
	pub text: String,
	pub timestamp: DateTime<Utc>,
}

/// A possibly endless sequence of messages.
///
/// `next_message` may block. `None` ends the sequence, whether the source
/// ran dry or was shut down.
pub trait MessageSource {
	fn next_message(&mut self) -> Option<Message>;
}

impl<I: Iterator<Item = Message>> MessageSource for I {
	fn next_message(&mut self) -> Option<Message> {
		self.next()
	}
}

/// Accepts messages containing at least one search term.
///
/// Matching is a case-insensitive substring test. An empty filter accepts
/// every message.
#[derive(Clone, Debug, Default)]
pub struct KeywordFilter {
	terms: Vec<String>,
}

impl KeywordFilter {
	pub fn new<I, S>(terms: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self { terms: terms.into_iter().map(|term| term.as_ref().to_lowercase()).collect() }
	}

	pub fn terms(&self) -> &[String] {
		&self.terms
	}

	pub fn matches(&self, text: &str) -> bool {
		if self.terms.is_empty() {
			return true;
		}
		let text = text.to_lowercase();
		self.terms.iter().any(|term| text.contains(term.as_str()))
	}
}

/// Producer side of a `ChannelSource`.
#[derive(Clone)]
pub struct MessageSender {
	tx: mpsc::Sender<Message>,
}

impl MessageSender {
	/// Sends a message; fails once the source has been dropped.
	pub fn send(&self, message: Message) -> Result<(), SendError<Message>> {
		self.tx.send(message)
	}
}

/// Requests a `ChannelSource` to end its sequence.
#[derive(Clone)]
pub struct ShutdownHandle {
	flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
	pub fn shutdown(&self) {
		self.flag.store(true, Ordering::SeqCst);
	}
}

/// A channel-backed message source filtered by keywords.
///
/// The sequence ends when every `MessageSender` is dropped or a
/// `ShutdownHandle` fires.
pub struct ChannelSource {
	rx: mpsc::Receiver<Message>,
	filter: KeywordFilter,
	shutdown: Arc<AtomicBool>,
}

impl ChannelSource {
	/// Creates a source with its sender and shutdown handles.
	pub fn channel(filter: KeywordFilter) -> (MessageSender, ShutdownHandle, ChannelSource) {
		let (tx, rx) = mpsc::channel();
		let shutdown = Arc::new(AtomicBool::new(false));
		(
			MessageSender { tx },
			ShutdownHandle { flag: shutdown.clone() },
			ChannelSource { rx, filter, shutdown },
		)
	}
}

impl MessageSource for ChannelSource {
	fn next_message(&mut self) -> Option<Message> {
		loop {
			if self.shutdown.load(Ordering::SeqCst) {
				debug!("Message source shut down");
				return None;
			}

			match self.rx.recv_timeout(SHUTDOWN_POLL) {
				Ok(message) if self.filter.matches(&message.text) => return Some(message),
				Ok(message) => debug!("Filtered out message from {}", message.author),
				Err(RecvTimeoutError::Timeout) => continue,
				Err(RecvTimeoutError::Disconnected) => return None,
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::thread;

	fn message(text: &str) -> Message {
		Message { author: "enfors".to_owned(), text: text.to_owned(), timestamp: Utc::now() }
	}

	#[test]
	fn test_keyword_filter() {
		let filter = KeywordFilter::new(["#SVPOL", "emacs"]);
		assert!(filter.matches("Debatt i kväll #svpol"));
		assert!(filter.matches("Emacs forever"));
		assert!(!filter.matches("vim forever"));
		assert!(KeywordFilter::default().matches("anything"));
	}

	#[test]
	fn test_iterator_is_a_source() {
		let mut source = vec![message("a"), message("b")].into_iter();
		assert_eq!(source.next_message().map(|m| m.text), Some("a".to_owned()));
		assert_eq!(source.next_message().map(|m| m.text), Some("b".to_owned()));
		assert_eq!(source.next_message(), None);
	}

	#[test]
	fn test_channel_source_filters_and_ends() {
		let (sender, _shutdown, mut source) = ChannelSource::channel(KeywordFilter::new(["python"]));
		sender.send(message("I like rust")).unwrap();
		sender.send(message("I like Python")).unwrap();
		drop(sender);

		assert_eq!(source.next_message().map(|m| m.text), Some("I like Python".to_owned()));
		assert_eq!(source.next_message(), None);
	}

	#[test]
	fn test_channel_source_shutdown() {
		let (sender, shutdown, mut source) = ChannelSource::channel(KeywordFilter::default());
		let worker = thread::spawn(move || source.next_message());
		shutdown.shutdown();
		assert_eq!(worker.join().unwrap(), None);
		drop(sender);
	}
}
