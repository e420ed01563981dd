//! Application bootstrap.

use crate::controller::{NavigationController, NavigationOutcome};
use crate::error::RouterError;
use crate::history::{HistoryBackend, PopStateEvent, Subscription};
use crate::params::{AppContext, ErrorConfig};
use crate::route_table::RouteTable;
use crate::synchronizer::HistorySynchronizer;
use crate::view::{ViewRegistry, Viewport};
use crate::ROOT_PATH;
use dashnav_conf::NavSettings;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A dashboard application: history, controller and viewport wired together.
///
/// Shared state lives behind `Rc<RefCell<..>>`; the back/forward listener
/// only holds a weak reference, so dropping the dashboard releases it.
///
/// # Examples
///
/// ```
/// use dashnav_router::{Dashboard, MemoryHistory, SingleViewport, ViewRegistry};
/// use dashnav_conf::{NavSettings, RouteConfig};
/// use std::rc::Rc;
///
/// let mut settings = NavSettings::default();
/// settings.routes.push(RouteConfig::new("/a/<namespace>/dashboard", "dash"));
///
/// let history = MemoryHistory::new("/a/proj1/dashboard");
/// let mut dashboard = Dashboard::from_settings(
///     settings,
///     Rc::new(history),
///     ViewRegistry::new(),
///     SingleViewport::new(),
/// )
/// .unwrap();
///
/// // "dash" is not registered, so the error view is mounted.
/// dashboard.init().unwrap();
/// assert_eq!(dashboard.current_path().unwrap(), "/a/proj1/dashboard");
/// ```
pub struct Dashboard<V: Viewport + 'static> {
	inner: Rc<RefCell<HistorySynchronizer<V>>>,
	subscription: Option<Subscription>,
	initialized: bool,
}

impl<V: Viewport + 'static> Dashboard<V> {
	pub fn new(history: Rc<dyn HistoryBackend>, controller: NavigationController<V>) -> Self {
		Self {
			inner: Rc::new(RefCell::new(HistorySynchronizer::new(history, controller))),
			subscription: None,
			initialized: false,
		}
	}

	/// Builds a dashboard from settings.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidPattern`] if a configured route does not compile.
	pub fn from_settings(
		settings: NavSettings,
		history: Rc<dyn HistoryBackend>,
		views: ViewRegistry,
		viewport: V,
	) -> Result<Self, RouterError> {
		let routes = RouteTable::from_config(&settings.routes)?;
		let controller = NavigationController::new(routes, views, viewport, AppContext::new(settings));
		Ok(Self::new(history, controller))
	}

	/// Routes the initial location and starts listening for back/forward.
	///
	/// # Errors
	///
	/// Fails if called twice or if the history backend refuses the listener.
	/// The initial route runs at most once: a later call after a failed
	/// subscription also returns [`RouterError::AlreadyInitialized`].
	pub fn init(&mut self) -> Result<NavigationOutcome, RouterError> {
		if self.initialized {
			return Err(RouterError::AlreadyInitialized);
		}
		self.initialized = true;

		let outcome = {
			let mut sync = self.sync_mut()?;
			tracing::info!(
				app = %sync.controller().app().app_name(),
				version = env!("CARGO_PKG_VERSION"),
				"starting dashboard"
			);
			sync.controller_mut().show_loader();
			sync.route_current()
		};

		let history = Rc::clone(self.sync()?.history());
		let weak = Rc::downgrade(&self.inner);
		let subscription = history.subscribe(Box::new(move |event: PopStateEvent| {
			Self::on_pop_state(&weak, event);
		}))?;
		self.subscription = Some(subscription);
		Ok(outcome)
	}

	fn on_pop_state(inner: &Weak<RefCell<HistorySynchronizer<V>>>, event: PopStateEvent) {
		let Some(inner) = inner.upgrade() else {
			return;
		};
		match inner.try_borrow_mut() {
			Ok(mut sync) => {
				sync.handle_pop_state(event);
			}
			Err(_) => tracing::warn!("ignoring back/forward navigation during another navigation"),
		}
	}

	/// Navigates to `url`, pushing a history entry.
	///
	/// Returns `Ok(None)` when `url` is already the current path.
	pub fn navigate_to(&self, url: &str) -> Result<Option<NavigationOutcome>, RouterError> {
		Ok(self.sync_mut()?.navigate_to(url))
	}

	/// Navigates to the root path.
	pub fn navigate_home(&self) -> Result<Option<NavigationOutcome>, RouterError> {
		self.navigate_to(ROOT_PATH)
	}

	/// Mounts the error view.
	pub fn render_error(&self, config: ErrorConfig) -> Result<(), RouterError> {
		self.sync_mut()?.controller_mut().render_error(config);
		Ok(())
	}

	/// The path last routed.
	///
	/// # Errors
	///
	/// Returns [`RouterError::NavigationInProgress`] when called from inside a navigation.
	pub fn current_path(&self) -> Result<String, RouterError> {
		Ok(self.sync()?.current_path().to_string())
	}

	/// Runs `f` with the controller.
	///
	/// # Errors
	///
	/// Returns [`RouterError::NavigationInProgress`] when called from inside a navigation.
	pub fn with_controller<R>(
		&self,
		f: impl FnOnce(&NavigationController<V>) -> R,
	) -> Result<R, RouterError> {
		Ok(f(self.sync()?.controller()))
	}

	/// Whether the back/forward listener is installed.
	pub fn is_listening(&self) -> bool {
		self.subscription.is_some()
	}

	/// Stops listening for back/forward navigation.
	pub fn shutdown(&mut self) {
		if let Some(subscription) = self.subscription.take() {
			tracing::debug!("removing back/forward listener");
			subscription.unsubscribe();
		}
	}

	fn sync(&self) -> Result<std::cell::Ref<'_, HistorySynchronizer<V>>, RouterError> {
		self.inner
			.try_borrow()
			.map_err(|_| RouterError::NavigationInProgress)
	}

	fn sync_mut(&self) -> Result<std::cell::RefMut<'_, HistorySynchronizer<V>>, RouterError> {
		self.inner.try_borrow_mut().map_err(|_| {
			tracing::warn!("rejecting navigation requested during another navigation");
			RouterError::NavigationInProgress
		})
	}
}

impl<V: Viewport + 'static> std::fmt::Debug for Dashboard<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Dashboard")
			.field("listening", &self.is_listening())
			.finish_non_exhaustive()
	}
}
