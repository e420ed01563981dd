//! The route table.

use crate::error::RouterError;
use crate::pattern::RoutePattern;
use crate::view::ViewId;
use crate::vpath::VirtualPath;
use dashnav_conf::RouteConfig;
use serde_json::Value;
use std::collections::HashMap;

/// A route: a virtual-path pattern bound to a view.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDescriptor {
	pattern: RoutePattern,
	view: ViewId,
	metadata: Value,
}

impl RouteDescriptor {
	/// Creates a route without metadata.
	pub fn new(pattern: &str, view: impl Into<ViewId>) -> Result<Self, RouterError> {
		Ok(Self {
			pattern: RoutePattern::new(pattern)?,
			view: view.into(),
			metadata: Value::Null,
		})
	}

	/// Attaches opaque metadata handed through to views.
	pub fn with_metadata(mut self, metadata: Value) -> Self {
		self.metadata = metadata;
		self
	}

	pub fn pattern(&self) -> &RoutePattern {
		&self.pattern
	}

	pub fn view(&self) -> &ViewId {
		&self.view
	}

	pub fn metadata(&self) -> &Value {
		&self.metadata
	}
}

impl TryFrom<&RouteConfig> for RouteDescriptor {
	type Error = RouterError;

	fn try_from(config: &RouteConfig) -> Result<Self, Self::Error> {
		Ok(Self::new(&config.pattern, config.view.as_str())?.with_metadata(config.metadata.clone()))
	}
}

/// A matched route with the parameters its pattern captured.
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
	pub route: &'a RouteDescriptor,
	pub params: HashMap<String, String>,
}

/// Ordered collection of routes.
///
/// Lookup walks the routes in insertion order and the first match wins,
/// so more specific patterns must be added before catch-alls.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
	routes: Vec<RouteDescriptor>,
}

impl RouteTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a table from configuration entries, preserving their order.
	pub fn from_config(entries: &[RouteConfig]) -> Result<Self, RouterError> {
		let routes = entries
			.iter()
			.map(RouteDescriptor::try_from)
			.collect::<Result<Vec<_>, _>>()?;
		Ok(Self { routes })
	}

	/// Appends a route.
	pub fn push(&mut self, route: RouteDescriptor) {
		self.routes.push(route);
	}

	/// Appends a route, builder style.
	pub fn route(mut self, pattern: &str, view: impl Into<ViewId>) -> Result<Self, RouterError> {
		self.routes.push(RouteDescriptor::new(pattern, view)?);
		Ok(self)
	}

	/// Finds the first route matching `vpath`.
	///
	/// The query string is ignored. `None` is the not-found case, never an error.
	pub fn find_route(&self, vpath: &VirtualPath) -> Option<&RouteDescriptor> {
		let path = vpath.route_path();
		self.routes.iter().find(|route| route.pattern.is_match(path))
	}

	/// Like [`find_route`](Self::find_route), also returning captured parameters.
	pub fn match_route(&self, vpath: &VirtualPath) -> Option<RouteMatch<'_>> {
		let path = vpath.route_path();
		self.routes.iter().find_map(|route| {
			route
				.pattern
				.matches(path)
				.map(|params| RouteMatch { route, params })
		})
	}

	pub fn len(&self) -> usize {
		self.routes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &RouteDescriptor> {
		self.routes.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::vpath::extract_virtual_path;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn table() -> RouteTable {
		RouteTable::new()
			.route("/a/<namespace>/dashboard", "dash")
			.unwrap()
			.route("/a/<namespace>/series/{name}", "series")
			.unwrap()
			.route("/a/<namespace>/{page:*}", "catchall")
			.unwrap()
			.route("/", "home")
			.unwrap()
	}

	fn vpath(path: &str) -> VirtualPath {
		extract_virtual_path(path).0
	}

	#[rstest]
	#[case("/a/proj1/dashboard", Some("dash"))]
	#[case("/a/proj1/dashboard?x=1", Some("dash"))]
	#[case("/a/proj1/series/cpu", Some("series"))]
	#[case("/a/proj1/anything/else", Some("catchall"))]
	#[case("/", Some("home"))]
	#[case("/?x=1", Some("home"))]
	#[case("/nope", None)]
	#[case("", None)]
	fn test_find_route(table: RouteTable, #[case] path: &str, #[case] expected: Option<&str>) {
		// Act
		let found = table.find_route(&vpath(path));

		// Assert
		assert_eq!(found.map(|r| r.view().as_str()), expected, "path: {}", path);
	}

	#[rstest]
	fn test_first_match_wins(table: RouteTable) {
		// Arrange: both "dash" and "catchall" match
		let path = vpath("/a/proj1/dashboard");

		// Act
		let found = table.find_route(&path).unwrap();

		// Assert
		assert_eq!(found.view().as_str(), "dash");
	}

	#[rstest]
	fn test_order_is_significant() {
		// Arrange: catch-all registered first shadows the specific route
		let table = RouteTable::new()
			.route("/a/<namespace>/{page:*}", "catchall")
			.unwrap()
			.route("/a/<namespace>/dashboard", "dash")
			.unwrap();

		// Act
		let found = table.find_route(&vpath("/a/proj1/dashboard")).unwrap();

		// Assert
		assert_eq!(found.view().as_str(), "catchall");
	}

	#[rstest]
	fn test_empty_table_finds_nothing() {
		assert!(RouteTable::new().find_route(&vpath("/a/p/dashboard")).is_none());
	}

	#[rstest]
	fn test_match_route_captures_params(table: RouteTable) {
		let matched = table.match_route(&vpath("/a/proj1/series/cpu.load?range=1h")).unwrap();

		assert_eq!(matched.route.view().as_str(), "series");
		assert_eq!(matched.params.get("name"), Some(&"cpu.load".to_string()));
	}

	#[rstest]
	fn test_from_config_preserves_order_and_metadata() {
		// Arrange
		let entries = vec![
			RouteConfig::new("/a/<namespace>/dashboard", "dash")
				.with_metadata(json!({"main_menu": true})),
			RouteConfig::new("/", "home"),
		];

		// Act
		let table = RouteTable::from_config(&entries).unwrap();

		// Assert
		let views: Vec<&str> = table.iter().map(|r| r.view().as_str()).collect();
		assert_eq!(views, vec!["dash", "home"]);
		assert_eq!(
			table.iter().next().unwrap().metadata(),
			&json!({"main_menu": true})
		);
	}

	#[rstest]
	fn test_from_config_rejects_bad_pattern() {
		let entries = vec![RouteConfig::new("/a/{broken", "dash")];

		let result = RouteTable::from_config(&entries);

		assert!(matches!(result, Err(RouterError::InvalidPattern { .. })));
	}
}
