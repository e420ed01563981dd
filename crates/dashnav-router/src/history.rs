//! Browser history abstraction.
//!
//! [`HistoryBackend`] is the narrow surface the synchronizer needs from the
//! platform: read the location, push an entry, and listen for back/forward
//! navigation. [`MemoryHistory`] backs tests and non-browser hosts;
//! `BrowserHistory` wraps `window.history` on wasm32.

#[cfg(target_arch = "wasm32")]
mod browser;
mod memory;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserHistory;
pub use memory::{HistoryEntry, MemoryHistory};

use crate::error::HistoryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State stored alongside each pushed history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
	/// Path and query the entry was pushed for.
	pub path: String,
}

impl HistoryState {
	pub fn new(path: impl Into<String>) -> Self {
		Self { path: path.into() }
	}
}

/// A back/forward navigation notification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PopStateEvent {
	/// State of the entry navigated to, when it carries one.
	pub state: Option<HistoryState>,
}

impl PopStateEvent {
	pub fn new(state: Option<HistoryState>) -> Self {
		Self { state }
	}
}

/// Callback invoked on back/forward navigation.
pub type PopStateHandler = Box<dyn FnMut(PopStateEvent)>;

/// Handle to a popstate listener. Dropping it removes the listener.
pub struct Subscription {
	cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	pub fn new(cancel: impl FnOnce() + 'static) -> Self {
		Self {
			cancel: Some(Box::new(cancel)),
		}
	}

	/// Removes the listener now.
	pub fn unsubscribe(mut self) {
		self.cancel_now();
	}

	fn cancel_now(&mut self) {
		if let Some(cancel) = self.cancel.take() {
			cancel();
		}
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.cancel_now();
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("active", &self.cancel.is_some())
			.finish()
	}
}

/// Access to the platform history.
pub trait HistoryBackend {
	/// Current path and query.
	fn location(&self) -> Result<String, HistoryError>;

	/// Pushes a new entry. Does not notify popstate listeners.
	fn push_state(&self, state: &HistoryState, url: &str) -> Result<(), HistoryError>;

	/// Registers a popstate listener.
	fn subscribe(&self, handler: PopStateHandler) -> Result<Subscription, HistoryError>;
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::cell::Cell;
	use std::rc::Rc;

	#[rstest]
	fn test_subscription_cancels_once() {
		// Arrange
		let calls = Rc::new(Cell::new(0));
		let counter = Rc::clone(&calls);
		let subscription = Subscription::new(move || counter.set(counter.get() + 1));

		// Act
		subscription.unsubscribe();

		// Assert
		assert_eq!(calls.get(), 1);
	}

	#[rstest]
	fn test_subscription_cancels_on_drop() {
		let calls = Rc::new(Cell::new(0));
		let counter = Rc::clone(&calls);

		{
			let _subscription = Subscription::new(move || counter.set(counter.get() + 1));
		}

		assert_eq!(calls.get(), 1);
	}

	#[rstest]
	fn test_history_state_serde() {
		let state = HistoryState::new("/a/p/dashboard?x=1");

		let json = serde_json::to_string(&state).unwrap();

		assert_eq!(json, r#"{"path":"/a/p/dashboard?x=1"}"#);
	}
}
