//! Parameters handed to views on mount.

use crate::route_table::RouteDescriptor;
use crate::vpath::{ProjectId, VirtualPath};
use dashnav_conf::NavSettings;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Prefix stripped from `api_hosts` keys to name the stubs.
const API_HOST_PREFIX: &str = "api_";

/// Application-wide context shared with every view.
#[derive(Debug, Clone)]
pub struct AppContext {
	settings: Arc<NavSettings>,
}

impl AppContext {
	pub fn new(settings: NavSettings) -> Self {
		Self {
			settings: Arc::new(settings),
		}
	}

	pub fn settings(&self) -> &NavSettings {
		&self.settings
	}

	pub fn app_name(&self) -> &str {
		&self.settings.app_name
	}
}

impl Default for AppContext {
	fn default() -> Self {
		Self::new(NavSettings::default())
	}
}

/// Client handle for one API host.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiStub {
	name: String,
	base_url: String,
	api_token: Option<String>,
}

impl ApiStub {
	pub fn new(name: impl Into<String>, base_url: impl Into<String>, api_token: Option<String>) -> Self {
		Self {
			name: name.into(),
			base_url: base_url.into(),
			api_token,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub fn api_token(&self) -> Option<&str> {
		self.api_token.as_deref()
	}

	/// Joins `path` onto the base URL with exactly one `/` between them.
	pub fn endpoint(&self, path: &str) -> String {
		format!(
			"{}/{}",
			self.base_url.trim_end_matches('/'),
			path.trim_start_matches('/')
		)
	}
}

impl fmt::Debug for ApiStub {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ApiStub")
			.field("name", &self.name)
			.field("base_url", &self.base_url)
			.field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
			.finish()
	}
}

/// API stubs keyed by host name.
#[derive(Debug, Clone, Default)]
pub struct ApiStubs {
	stubs: Arc<IndexMap<String, ApiStub>>,
}

impl ApiStubs {
	/// Builds one stub per configured host.
	///
	/// A host key `api_user` yields a stub named `user`; keys without the
	/// `api_` prefix are used as they are.
	pub fn from_settings(settings: &NavSettings) -> Self {
		let stubs = settings
			.api_hosts
			.iter()
			.map(|(key, base_url)| {
				let name = key.strip_prefix(API_HOST_PREFIX).unwrap_or(key);
				(
					name.to_string(),
					ApiStub::new(name, base_url.clone(), settings.api_token.clone()),
				)
			})
			.collect();
		Self {
			stubs: Arc::new(stubs),
		}
	}

	pub fn get(&self, name: &str) -> Option<&ApiStub> {
		self.stubs.get(name)
	}

	pub fn len(&self) -> usize {
		self.stubs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.stubs.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &ApiStub> {
		self.stubs.values()
	}
}

/// Information about the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
	#[serde(default)]
	pub user_id: Option<String>,
	#[serde(default)]
	pub namespace: Option<String>,
	/// Any further fields the backend sends.
	#[serde(flatten)]
	pub extra: IndexMap<String, Value>,
}

/// Parameters a view is mounted with after a navigation.
#[derive(Debug, Clone)]
pub struct NavigationParams {
	/// The raw path and query that was navigated to.
	pub path: String,
	/// Virtual path used for route lookup.
	pub vpath: VirtualPath,
	/// Project the path is scoped to.
	pub project_id: Option<ProjectId>,
	/// The matched route.
	pub route: Option<RouteDescriptor>,
	/// Parameters captured by the route pattern.
	pub route_params: HashMap<String, String>,
	pub app: AppContext,
	pub api_stubs: ApiStubs,
	pub user_info: Option<UserInfo>,
}

/// Description of an error to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorConfig {
	/// Error kind, e.g. `"404"`.
	#[serde(rename = "type")]
	pub kind: String,
	/// Optional human-readable message.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

impl ErrorConfig {
	pub fn new(kind: impl Into<String>) -> Self {
		Self {
			kind: kind.into(),
			message: None,
		}
	}

	/// The error rendered for unmatched paths.
	pub fn not_found() -> Self {
		Self::new("404")
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}

	pub fn is_not_found(&self) -> bool {
		self.kind == "404"
	}
}

/// What a view is mounted with.
#[derive(Debug, Clone)]
pub enum MountParams {
	/// A regular navigation.
	Navigation(NavigationParams),
	/// An error page.
	Error(ErrorConfig),
}

impl MountParams {
	pub fn as_navigation(&self) -> Option<&NavigationParams> {
		match self {
			Self::Navigation(params) => Some(params),
			Self::Error(_) => None,
		}
	}

	pub fn as_error(&self) -> Option<&ErrorConfig> {
		match self {
			Self::Error(config) => Some(config),
			Self::Navigation(_) => None,
		}
	}
}
