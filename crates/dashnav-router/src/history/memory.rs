//! In-memory history.

use super::{HistoryBackend, HistoryState, PopStateEvent, PopStateHandler, Subscription};
use crate::error::HistoryError;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// One entry of the session history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
	pub url: String,
	pub state: Option<HistoryState>,
}

type SharedHandler = Rc<RefCell<PopStateHandler>>;

#[derive(Default)]
struct Inner {
	entries: Vec<HistoryEntry>,
	index: usize,
	listeners: Vec<(u64, SharedHandler)>,
	next_id: u64,
}

/// A session history kept in memory.
///
/// Behaves like the browser's: pushing truncates forward entries and does
/// not notify listeners, while [`back`](Self::back), [`forward`](Self::forward)
/// and [`go`](Self::go) do. Clones share the same history.
#[derive(Clone, Default)]
pub struct MemoryHistory {
	inner: Rc<RefCell<Inner>>,
}

impl MemoryHistory {
	/// Creates a history whose only entry is `initial_url`, without state.
	pub fn new(initial_url: impl Into<String>) -> Self {
		let inner = Inner {
			entries: vec![HistoryEntry {
				url: initial_url.into(),
				state: None,
			}],
			..Inner::default()
		};
		Self {
			inner: Rc::new(RefCell::new(inner)),
		}
	}

	/// Creates a history with no entries; [`location`](HistoryBackend::location) fails.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Moves `delta` entries and notifies listeners.
	///
	/// Returns `false`, without notifying, when the target is out of range.
	pub fn go(&self, delta: isize) -> bool {
		let (event, handlers) = {
			let mut inner = self.inner.borrow_mut();
			let Some(target) = inner.index.checked_add_signed(delta) else {
				return false;
			};
			if delta == 0 || target >= inner.entries.len() {
				return false;
			}
			inner.index = target;
			let event = PopStateEvent::new(inner.entries[target].state.clone());
			let handlers: Vec<SharedHandler> =
				inner.listeners.iter().map(|(_, h)| Rc::clone(h)).collect();
			(event, handlers)
		};

		for handler in handlers {
			match handler.try_borrow_mut() {
				Ok(mut handler) => (*handler)(event.clone()),
				Err(_) => tracing::warn!("skipping popstate listener that is already running"),
			}
		}
		true
	}

	pub fn back(&self) -> bool {
		self.go(-1)
	}

	pub fn forward(&self) -> bool {
		self.go(1)
	}

	/// Snapshot of all entries.
	pub fn entries(&self) -> Vec<HistoryEntry> {
		self.inner.borrow().entries.clone()
	}

	/// Index of the current entry.
	pub fn index(&self) -> usize {
		self.inner.borrow().index
	}

	pub fn listener_count(&self) -> usize {
		self.inner.borrow().listeners.len()
	}

	fn remove_listener(inner: &Weak<RefCell<Inner>>, id: u64) {
		if let Some(inner) = inner.upgrade() {
			inner.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
		}
	}
}

impl std::fmt::Debug for MemoryHistory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let inner = self.inner.borrow();
		f.debug_struct("MemoryHistory")
			.field("entries", &inner.entries)
			.field("index", &inner.index)
			.field("listeners", &inner.listeners.len())
			.finish()
	}
}

impl HistoryBackend for MemoryHistory {
	fn location(&self) -> Result<String, HistoryError> {
		let inner = self.inner.borrow();
		inner
			.entries
			.get(inner.index)
			.map(|entry| entry.url.clone())
			.ok_or_else(|| HistoryError::Unavailable("history has no entries".to_string()))
	}

	fn push_state(&self, state: &HistoryState, url: &str) -> Result<(), HistoryError> {
		let mut inner = self.inner.borrow_mut();
		if !inner.entries.is_empty() {
			let keep = inner.index + 1;
			inner.entries.truncate(keep);
		}
		inner.entries.push(HistoryEntry {
			url: url.to_string(),
			state: Some(state.clone()),
		});
		inner.index = inner.entries.len() - 1;
		Ok(())
	}

	fn subscribe(&self, handler: PopStateHandler) -> Result<Subscription, HistoryError> {
		let id = {
			let mut inner = self.inner.borrow_mut();
			let id = inner.next_id;
			inner.next_id += 1;
			inner.listeners.push((id, Rc::new(RefCell::new(handler))));
			id
		};
		let weak = Rc::downgrade(&self.inner);
		Ok(Subscription::new(move || Self::remove_listener(&weak, id)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn recorder(history: &MemoryHistory) -> (Rc<RefCell<Vec<PopStateEvent>>>, Subscription) {
		let events = Rc::new(RefCell::new(Vec::new()));
		let sink = Rc::clone(&events);
		let subscription = history
			.subscribe(Box::new(move |event| sink.borrow_mut().push(event)))
			.unwrap();
		(events, subscription)
	}

	#[rstest]
	fn test_push_updates_location_without_notifying() {
		// Arrange
		let history = MemoryHistory::new("/");
		let (events, _sub) = recorder(&history);

		// Act
		history
			.push_state(&HistoryState::new("/a/p/x"), "/a/p/x")
			.unwrap();

		// Assert
		assert_eq!(history.location().unwrap(), "/a/p/x");
		assert!(events.borrow().is_empty());
	}

	#[rstest]
	fn test_back_and_forward_notify_with_state() {
		// Arrange
		let history = MemoryHistory::new("/");
		history.push_state(&HistoryState::new("/one"), "/one").unwrap();
		let (events, _sub) = recorder(&history);

		// Act
		assert!(history.back());
		assert!(history.forward());

		// Assert
		let events = events.borrow();
		assert_eq!(events[0].state, None);
		assert_eq!(events[1].state, Some(HistoryState::new("/one")));
		assert_eq!(history.location().unwrap(), "/one");
	}

	#[rstest]
	fn test_out_of_range_go_is_ignored() {
		let history = MemoryHistory::new("/");
		let (events, _sub) = recorder(&history);

		assert!(!history.back());
		assert!(!history.forward());
		assert!(events.borrow().is_empty());
	}

	#[rstest]
	fn test_push_truncates_forward_entries() {
		// Arrange
		let history = MemoryHistory::new("/");
		history.push_state(&HistoryState::new("/one"), "/one").unwrap();
		history.push_state(&HistoryState::new("/two"), "/two").unwrap();
		history.back();

		// Act
		history.push_state(&HistoryState::new("/three"), "/three").unwrap();

		// Assert
		let urls: Vec<String> = history.entries().into_iter().map(|e| e.url).collect();
		assert_eq!(urls, vec!["/", "/one", "/three"]);
		assert_eq!(history.index(), 2);
	}

	#[rstest]
	fn test_empty_history_has_no_location() {
		let history = MemoryHistory::empty();

		assert!(matches!(history.location(), Err(HistoryError::Unavailable(_))));
	}

	#[rstest]
	fn test_dropping_subscription_removes_listener() {
		let history = MemoryHistory::new("/");
		let (_events, sub) = recorder(&history);
		assert_eq!(history.listener_count(), 1);

		drop(sub);

		assert_eq!(history.listener_count(), 0);
	}
}
