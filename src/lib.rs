//! # dashnav
//!
//! Client-side navigation for single-page dashboards.
//!
//! dashnav maps browser locations to views. Project-scoped paths such as
//! `/a/proj1/dashboard` are matched against project-independent routes
//! (`/a/<namespace>/dashboard`), the mounted view gets the first chance to
//! handle a change in place, and back/forward navigation is kept in step
//! with the browser history.
//!
//! ## Feature Flags
//!
//! - `router` - Navigation core (route table, history sync, view lifecycle)
//! - `conf` - Layered settings loading (defaults, TOML/JSON files, environment)
//! - `full` (default) - Everything
//!
//! ## Quick Example
//!
//! ```rust
//! use dashnav::prelude::*;
//! use std::rc::Rc;
//!
//! let settings = NavSettings::from_toml_str(r#"
//!     [[routes]]
//!     pattern = "/a/<namespace>/dashboard"
//!     view = "dash"
//! "#).unwrap();
//!
//! let mut dashboard = Dashboard::from_settings(
//!     settings,
//!     Rc::new(MemoryHistory::new("/")),
//!     ViewRegistry::new(),
//!     SingleViewport::new(),
//! )
//! .unwrap();
//! dashboard.init().unwrap();
//! dashboard.navigate_to("/a/proj1/dashboard").unwrap();
//! assert_eq!(dashboard.current_path().unwrap(), "/a/proj1/dashboard");
//! ```

#[cfg(feature = "conf")]
pub use dashnav_conf as conf;
#[cfg(feature = "router")]
pub use dashnav_router as router;

/// Commonly used types.
pub mod prelude {
	#[cfg(feature = "conf")]
	pub use dashnav_conf::{NavSettings, RouteConfig, SettingsBuilder};

	#[cfg(feature = "router")]
	pub use dashnav_router::{
		Dashboard, ErrorConfig, HistoryBackend, MemoryHistory, MountParams, NavigationController,
		NavigationOutcome, RouteDescriptor, RouteTable, SingleViewport, Transition, View,
		ViewRegistry, Viewport,
	};
}

#[cfg(all(test, feature = "full"))]
mod tests {
	use super::prelude::*;
	use rstest::rstest;

	#[rstest]
	fn test_prelude_exposes_settings_and_router() {
		let settings = NavSettings::default();

		let table = RouteTable::from_config(&settings.routes).unwrap();

		assert!(table.is_empty());
	}
}
