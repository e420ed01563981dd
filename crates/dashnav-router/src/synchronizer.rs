//! Keeps the current path in step with the history backend.

use crate::controller::{NavigationController, NavigationOutcome};
use crate::history::{HistoryBackend, HistoryState, PopStateEvent};
use crate::links::path_and_query;
use crate::view::Viewport;
use crate::ROOT_PATH;
use std::rc::Rc;

/// Owns the current path and forwards changes to the controller.
pub struct HistorySynchronizer<V: Viewport> {
	history: Rc<dyn HistoryBackend>,
	current_path: String,
	controller: NavigationController<V>,
}

impl<V: Viewport> HistorySynchronizer<V> {
	/// Creates a synchronizer whose current path is the backend's location.
	///
	/// The path is not routed yet; that happens on the first change.
	pub fn new(history: Rc<dyn HistoryBackend>, controller: NavigationController<V>) -> Self {
		let current_path = Self::initial_path(history.as_ref());
		Self {
			history,
			current_path,
			controller,
		}
	}

	fn initial_path(history: &dyn HistoryBackend) -> String {
		match history.location() {
			Ok(path) if !path.is_empty() => path,
			Ok(_) => ROOT_PATH.to_string(),
			Err(error) => {
				tracing::warn!(%error, "cannot read initial location, using {}", ROOT_PATH);
				ROOT_PATH.to_string()
			}
		}
	}

	pub fn current_path(&self) -> &str {
		&self.current_path
	}

	pub fn controller(&self) -> &NavigationController<V> {
		&self.controller
	}

	pub fn controller_mut(&mut self) -> &mut NavigationController<V> {
		&mut self.controller
	}

	pub fn history(&self) -> &Rc<dyn HistoryBackend> {
		&self.history
	}

	/// Routes `path` unless it is already current.
	pub fn apply_navigation_change(&mut self, path: &str) -> Option<NavigationOutcome> {
		if path == self.current_path {
			tracing::debug!(%path, "already at path");
			return None;
		}
		self.current_path = path.to_string();
		Some(self.controller.set_route(path))
	}

	/// Routes the current path unconditionally.
	pub fn route_current(&mut self) -> NavigationOutcome {
		let path = self.current_path.clone();
		self.controller.set_route(&path)
	}

	/// Pushes a history entry for `url` and routes it.
	///
	/// Relative targets resolve against the current path. A failed push is
	/// logged; the navigation still happens.
	pub fn navigate_to(&mut self, url: &str) -> Option<NavigationOutcome> {
		let path = path_and_query(url, &self.current_path);
		if let Err(error) = self.history.push_state(&HistoryState::new(path.clone()), &path) {
			tracing::warn!(%path, %error, "failed to push history entry");
		}
		self.apply_navigation_change(&path)
	}

	/// Handles a back/forward notification.
	pub fn handle_pop_state(&mut self, event: PopStateEvent) -> Option<NavigationOutcome> {
		let path = match event.state {
			Some(state) => state.path,
			None => match self.history.location() {
				Ok(path) => path,
				Err(error) => {
					tracing::warn!(%error, "cannot read location after popstate");
					ROOT_PATH.to_string()
				}
			},
		};
		self.apply_navigation_change(&path)
	}
}
