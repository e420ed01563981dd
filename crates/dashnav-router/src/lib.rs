//! Navigation core for dashnav.
//!
//! This crate turns URL changes into view changes for a single-page
//! dashboard. The pieces, bottom up:
//!
//! - [`extract_virtual_path`] maps `/a/<project>/...` to a project-independent
//!   virtual path so one route serves every project.
//! - [`RouteTable`] resolves virtual paths to views, first match wins.
//! - [`NavigationController`] offers each change to the mounted [`View`]
//!   and, when the view declines, mounts a replacement through the
//!   [`Viewport`] or falls back to the error view.
//! - [`HistorySynchronizer`] drops duplicate navigations and keeps the
//!   current path in step with a [`HistoryBackend`].
//! - [`Dashboard`] wires everything together and listens for back/forward.
//!
//! ## Example
//!
//! ```
//! use dashnav_router::{
//!     AppContext, Dashboard, MemoryHistory, NavigationController, NavigationOutcome,
//!     RouteDescriptor, RouteTable, SingleViewport, Transition, View, ViewRegistry,
//! };
//! use std::rc::Rc;
//!
//! struct Page;
//!
//! impl View for Page {
//!     fn change_path(&mut self, _path: &str, _route: Option<&RouteDescriptor>) -> Transition {
//!         Transition::NotHandled
//!     }
//! }
//!
//! let routes = RouteTable::new()
//!     .route("/a/<namespace>/dashboard", "dash")
//!     .unwrap();
//! let views = ViewRegistry::new().with_view("dash", |_params| Box::new(Page));
//! let controller =
//!     NavigationController::new(routes, views, SingleViewport::new(), AppContext::default());
//!
//! let history = MemoryHistory::new("/");
//! let mut dashboard = Dashboard::new(Rc::new(history), controller);
//! dashboard.init().unwrap();
//!
//! let outcome = dashboard.navigate_to("/a/proj1/dashboard").unwrap();
//! assert!(matches!(outcome, Some(NavigationOutcome::Replaced { .. })));
//! ```

pub mod app;
pub mod controller;
pub mod error;
pub mod history;
pub mod links;
pub mod params;
pub mod pattern;
pub mod route_table;
pub mod synchronizer;
pub mod view;
pub mod vpath;

pub use app::Dashboard;
pub use controller::{
	LoadingIndicator, NavigationController, NavigationOutcome, NavigationState, NoopLoadingIndicator,
};
pub use error::{HistoryError, RouterError};
#[cfg(target_arch = "wasm32")]
pub use history::BrowserHistory;
pub use history::{
	HistoryBackend, HistoryEntry, HistoryState, MemoryHistory, PopStateEvent, PopStateHandler,
	Subscription,
};
pub use links::{is_internal_link, path_and_query, rewrite_project_link};
pub use params::{
	ApiStub, ApiStubs, AppContext, ErrorConfig, MountParams, NavigationParams, UserInfo,
};
pub use pattern::RoutePattern;
pub use route_table::{RouteDescriptor, RouteMatch, RouteTable};
pub use synchronizer::HistorySynchronizer;
pub use view::{
	ErrorView, SingleViewport, Transition, View, ViewDefinition, ViewId, ViewRegistry, Viewport,
	ERROR_VIEW,
};
pub use vpath::{extract_virtual_path, ProjectId, VirtualPath, NAMESPACE_PLACEHOLDER};

/// Path routed by [`Dashboard::navigate_home`] and used when no location is available.
pub const ROOT_PATH: &str = "/";
