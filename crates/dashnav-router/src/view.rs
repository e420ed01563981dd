//! View mount and lifecycle protocol.
//!
//! A [`Viewport`] owns the single mounted [`View`]. The navigation
//! controller never builds or drops views itself: it picks a
//! [`ViewDefinition`] from the [`ViewRegistry`] and hands it, together with
//! the [`MountParams`], to [`Viewport::set_view`].
//!
//! Before replacing anything, the controller offers the path change to the
//! mounted view through [`View::change_path`]. A view that can adapt in
//! place (same screen, different sub-path) returns [`Transition::Handled`]
//! and keeps its state; any other answer leads to a full replacement.

use crate::params::{ErrorConfig, MountParams};
use crate::route_table::RouteDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Identifier under which the error view is registered.
pub const ERROR_VIEW: &str = "error";

/// Identifier of a registered view implementation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(String);

impl ViewId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for ViewId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

impl From<String> for ViewId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

impl std::borrow::Borrow<str> for ViewId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ViewId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Answer of a mounted view to a path change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
	/// The view updated itself; nothing else happens.
	Handled,
	/// The view cannot adapt; it will be replaced.
	NotHandled,
}

impl Transition {
	pub fn is_handled(self) -> bool {
		matches!(self, Self::Handled)
	}
}

impl From<bool> for Transition {
	fn from(handled: bool) -> Self {
		if handled { Self::Handled } else { Self::NotHandled }
	}
}

/// A mounted view.
pub trait View {
	/// Offers an in-place transition to `path`.
	///
	/// `route` is the route the new path resolves to, if any. Views that
	/// never self-transition return [`Transition::NotHandled`].
	fn change_path(&mut self, path: &str, route: Option<&RouteDescriptor>) -> Transition;

	/// Called by the viewport right before the view is dropped.
	fn unmount(&mut self) {}
}

type ViewFactory = Rc<dyn Fn(MountParams) -> Box<dyn View>>;

/// A registered view implementation: an identifier plus a factory that
/// builds a mounted view from its parameters.
#[derive(Clone)]
pub struct ViewDefinition {
	id: ViewId,
	factory: ViewFactory,
}

impl ViewDefinition {
	pub fn new<F>(id: impl Into<ViewId>, factory: F) -> Self
	where
		F: Fn(MountParams) -> Box<dyn View> + 'static,
	{
		Self {
			id: id.into(),
			factory: Rc::new(factory),
		}
	}

	pub fn id(&self) -> &ViewId {
		&self.id
	}

	/// Builds a view instance.
	pub fn build(&self, params: MountParams) -> Box<dyn View> {
		(self.factory)(params)
	}
}

impl fmt::Debug for ViewDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ViewDefinition").field("id", &self.id).finish()
	}
}

/// The built-in error view, mounted unless an application registers its
/// own view under [`ERROR_VIEW`].
#[derive(Debug, Clone)]
pub struct ErrorView {
	config: ErrorConfig,
}

impl ErrorView {
	pub fn new(config: ErrorConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &ErrorConfig {
		&self.config
	}

	fn definition() -> ViewDefinition {
		ViewDefinition::new(ERROR_VIEW, |params| {
			let config = match params {
				MountParams::Error(config) => config,
				MountParams::Navigation(_) => ErrorConfig::not_found(),
			};
			Box::new(ErrorView::new(config))
		})
	}
}

impl View for ErrorView {
	fn change_path(&mut self, _path: &str, _route: Option<&RouteDescriptor>) -> Transition {
		Transition::NotHandled
	}
}

/// Registry of view implementations keyed by [`ViewId`].
#[derive(Debug, Clone)]
pub struct ViewRegistry {
	views: HashMap<ViewId, ViewDefinition>,
}

impl Default for ViewRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl ViewRegistry {
	/// Creates a registry holding only the built-in error view.
	pub fn new() -> Self {
		let mut views = HashMap::new();
		let error = ErrorView::definition();
		views.insert(error.id().clone(), error);
		Self { views }
	}

	/// Registers a view, replacing any previous one with the same id.
	pub fn register<F>(&mut self, id: impl Into<ViewId>, factory: F) -> &mut Self
	where
		F: Fn(MountParams) -> Box<dyn View> + 'static,
	{
		let definition = ViewDefinition::new(id, factory);
		self.views.insert(definition.id().clone(), definition);
		self
	}

	/// Registers a view, builder style.
	pub fn with_view<F>(mut self, id: impl Into<ViewId>, factory: F) -> Self
	where
		F: Fn(MountParams) -> Box<dyn View> + 'static,
	{
		self.register(id, factory);
		self
	}

	pub fn get(&self, id: &str) -> Option<&ViewDefinition> {
		self.views.get(id)
	}

	pub fn contains(&self, id: &str) -> bool {
		self.views.contains_key(id)
	}

	/// Returns the view mounted for errors.
	pub fn error_view(&self) -> ViewDefinition {
		self.views
			.get(ERROR_VIEW)
			.cloned()
			.unwrap_or_else(ErrorView::definition)
	}

	pub fn len(&self) -> usize {
		self.views.len()
	}

	pub fn is_empty(&self) -> bool {
		self.views.is_empty()
	}
}

/// Owner of the single mounted view.
pub trait Viewport {
	/// The mounted view, if any.
	fn current_view(&mut self) -> Option<&mut dyn View>;

	/// Mounts `view` with `params`, replacing whatever was mounted.
	fn set_view(&mut self, view: &ViewDefinition, params: MountParams);
}

struct MountedView {
	id: ViewId,
	view: Box<dyn View>,
}

/// A viewport holding at most one view in memory.
///
/// The previous view is unmounted before the next one is built.
#[derive(Default)]
pub struct SingleViewport {
	mounted: Option<MountedView>,
}

impl SingleViewport {
	pub fn new() -> Self {
		Self::default()
	}

	/// Identifier of the mounted view.
	pub fn mounted_id(&self) -> Option<&ViewId> {
		self.mounted.as_ref().map(|m| &m.id)
	}

	pub fn is_empty(&self) -> bool {
		self.mounted.is_none()
	}

	/// Unmounts and drops the current view.
	pub fn clear(&mut self) {
		if let Some(mut previous) = self.mounted.take() {
			tracing::debug!(view = %previous.id, "unmounting view");
			previous.view.unmount();
		}
	}
}

impl fmt::Debug for SingleViewport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SingleViewport")
			.field("mounted", &self.mounted_id())
			.finish()
	}
}

impl Viewport for SingleViewport {
	fn current_view(&mut self) -> Option<&mut dyn View> {
		match self.mounted.as_mut() {
			Some(mounted) => Some(mounted.view.as_mut()),
			None => None,
		}
	}

	fn set_view(&mut self, view: &ViewDefinition, params: MountParams) {
		self.clear();
		tracing::debug!(view = %view.id(), "mounting view");
		let instance = view.build(params);
		self.mounted = Some(MountedView {
			id: view.id().clone(),
			view: instance,
		});
	}
}
