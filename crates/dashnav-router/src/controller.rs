//! The navigation controller.
//!
//! Turns a path into either an in-place transition of the mounted view or a
//! replacement of it:
//!
//! 1. the path is split into a virtual path and a project id;
//! 2. the mounted view, if any, is offered the change first;
//! 3. otherwise the route's view is mounted, or the error view when no
//!    route matches or its view is not registered.

use crate::params::{ApiStubs, AppContext, ErrorConfig, MountParams, NavigationParams, UserInfo};
use crate::route_table::RouteTable;
use crate::view::{ViewId, ViewRegistry, Viewport};
use crate::vpath::extract_virtual_path;
use std::collections::HashMap;

/// Phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationState {
	#[default]
	Idle,
	/// Building parameters and resolving the route.
	Resolving,
	/// Offering the change to the mounted view.
	Delegating,
	/// Mounting a new view.
	Replacing,
}

/// Which branch a navigation took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
	/// The mounted view handled the change itself.
	Delegated,
	/// A new view was mounted.
	Replaced { view: ViewId },
	/// The error view was mounted.
	NotFound,
}

/// Visual feedback while a view is being mounted.
pub trait LoadingIndicator {
	fn show(&mut self);
	fn hide(&mut self);

	/// Called on every phase change of the controller, ending with
	/// [`NavigationState::Idle`].
	fn transition(&mut self, _state: NavigationState) {}
}

/// A [`LoadingIndicator`] that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLoadingIndicator;

impl LoadingIndicator for NoopLoadingIndicator {
	fn show(&mut self) {}
	fn hide(&mut self) {}
}

/// Resolves paths and drives the viewport.
pub struct NavigationController<V: Viewport> {
	routes: RouteTable,
	views: ViewRegistry,
	viewport: V,
	loader: Box<dyn LoadingIndicator>,
	app: AppContext,
	api_stubs: ApiStubs,
	user_info: Option<UserInfo>,
	state: NavigationState,
}

impl<V: Viewport> NavigationController<V> {
	/// Creates a controller. API stubs are derived from the app settings.
	pub fn new(routes: RouteTable, views: ViewRegistry, viewport: V, app: AppContext) -> Self {
		let api_stubs = ApiStubs::from_settings(app.settings());
		Self {
			routes,
			views,
			viewport,
			loader: Box::new(NoopLoadingIndicator),
			app,
			api_stubs,
			user_info: None,
			state: NavigationState::Idle,
		}
	}

	pub fn with_loader(mut self, loader: impl LoadingIndicator + 'static) -> Self {
		self.loader = Box::new(loader);
		self
	}

	pub fn with_user_info(mut self, user_info: UserInfo) -> Self {
		self.user_info = Some(user_info);
		self
	}

	pub fn with_api_stubs(mut self, api_stubs: ApiStubs) -> Self {
		self.api_stubs = api_stubs;
		self
	}

	pub fn state(&self) -> NavigationState {
		self.state
	}

	pub fn routes(&self) -> &RouteTable {
		&self.routes
	}

	pub fn views(&self) -> &ViewRegistry {
		&self.views
	}

	pub fn viewport(&self) -> &V {
		&self.viewport
	}

	pub fn viewport_mut(&mut self) -> &mut V {
		&mut self.viewport
	}

	pub fn app(&self) -> &AppContext {
		&self.app
	}

	pub fn show_loader(&mut self) {
		self.loader.show();
	}

	pub fn hide_loader(&mut self) {
		self.loader.hide();
	}

	/// Resolves `path` and transitions or replaces the mounted view.
	pub fn set_route(&mut self, path: &str) -> NavigationOutcome {
		tracing::info!(%path, "navigating");
		self.enter(NavigationState::Resolving);
		let outcome = self.resolve_and_mount(path);
		self.enter(NavigationState::Idle);
		outcome
	}

	fn enter(&mut self, state: NavigationState) {
		tracing::trace!(from = ?self.state, to = ?state, "navigation phase");
		self.state = state;
		self.loader.transition(state);
	}

	fn resolve_and_mount(&mut self, path: &str) -> NavigationOutcome {
		let params = self.build_params(path);

		if self.viewport.current_view().is_some() {
			self.enter(NavigationState::Delegating);
			if let Some(view) = self.viewport.current_view()
				&& view.change_path(path, params.route.as_ref()).is_handled()
			{
				tracing::debug!(%path, "mounted view handled the transition");
				return NavigationOutcome::Delegated;
			}
		}

		self.enter(NavigationState::Replacing);
		let Some(route) = params.route.as_ref() else {
			tracing::debug!(%path, vpath = %params.vpath, "no route matches");
			self.render_error(ErrorConfig::not_found());
			return NavigationOutcome::NotFound;
		};
		let view_id = route.view().clone();
		let Some(definition) = self.views.get(view_id.as_str()).cloned() else {
			tracing::warn!(%path, view = %view_id, "route points to an unregistered view");
			self.render_error(ErrorConfig::not_found());
			return NavigationOutcome::NotFound;
		};

		self.loader.show();
		self.viewport.set_view(&definition, MountParams::Navigation(params));
		self.loader.hide();
		NavigationOutcome::Replaced { view: view_id }
	}

	/// Mounts the error view with `config`.
	pub fn render_error(&mut self, config: ErrorConfig) {
		tracing::debug!(kind = %config.kind, "rendering error view");
		let definition = self.views.error_view();
		self.viewport.set_view(&definition, MountParams::Error(config));
		self.loader.hide();
	}

	fn build_params(&self, path: &str) -> NavigationParams {
		let (vpath, project_id) = extract_virtual_path(path);
		let (route, route_params) = match self.routes.match_route(&vpath) {
			Some(matched) => (Some(matched.route.clone()), matched.params),
			None => (None, HashMap::new()),
		};
		NavigationParams {
			path: path.to_string(),
			vpath,
			project_id,
			route,
			route_params,
			app: self.app.clone(),
			api_stubs: self.api_stubs.clone(),
			user_info: self.user_info.clone(),
		}
	}
}

impl<V: Viewport + std::fmt::Debug> std::fmt::Debug for NavigationController<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NavigationController")
			.field("routes", &self.routes.len())
			.field("viewport", &self.viewport)
			.field("state", &self.state)
			.finish_non_exhaustive()
	}
}
