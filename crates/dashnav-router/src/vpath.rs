//! Virtual paths.
//!
//! A project-scoped path `/a/<project>/<rest>` is looked up in the route
//! table as `/a/<namespace>/<rest>`, so one route serves every project.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder substituted for the project segment.
pub const NAMESPACE_PLACEHOLDER: &str = "<namespace>";

/// Prefix of project-scoped paths.
const PROJECT_PREFIX: &str = "/a/";

static PROJECT_PATH: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"^/a/([a-zA-Z0-9_-]+)((?s:[/?].*))?$").expect("project path regex is valid")
});

/// Identifier of the project a path is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
	/// Validates and wraps a project identifier.
	///
	/// Returns `None` unless `id` is non-empty and consists only of ASCII
	/// alphanumerics, `-` and `_`.
	pub fn new(id: impl Into<String>) -> Option<Self> {
		let id = id.into();
		let valid = !id.is_empty()
			&& id
				.chars()
				.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
		valid.then_some(Self(id))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ProjectId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for ProjectId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

/// A path with its project segment replaced by [`NAMESPACE_PLACEHOLDER`].
///
/// Always derived from a raw path through [`extract_virtual_path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VirtualPath(String);

impl VirtualPath {
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// The part before `?`, which is what route patterns see.
	pub fn route_path(&self) -> &str {
		match self.0.split_once('?') {
			Some((path, _)) => path,
			None => &self.0,
		}
	}

	/// The query string without the leading `?`, if present.
	pub fn query(&self) -> Option<&str> {
		self.0.split_once('?').map(|(_, query)| query)
	}

	/// Whether this path was project-scoped.
	pub fn is_project_scoped(&self) -> bool {
		self.0
			.strip_prefix(PROJECT_PREFIX)
			.is_some_and(|rest| rest.starts_with(NAMESPACE_PLACEHOLDER))
	}

	/// Builds a concrete path for `project`.
	///
	/// Paths that are not project-scoped are returned unchanged.
	///
	/// # Examples
	///
	/// ```
	/// use dashnav_router::{ProjectId, extract_virtual_path};
	///
	/// let (vpath, _) = extract_virtual_path("/a/proj1/dashboard");
	/// let other = ProjectId::new("proj2").unwrap();
	/// assert_eq!(vpath.resolve(&other), "/a/proj2/dashboard");
	/// ```
	pub fn resolve(&self, project: &ProjectId) -> String {
		if !self.is_project_scoped() {
			return self.0.clone();
		}
		let rest = &self.0[PROJECT_PREFIX.len() + NAMESPACE_PLACEHOLDER.len()..];
		format!("{}{}{}", PROJECT_PREFIX, project, rest)
	}
}

impl fmt::Display for VirtualPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for VirtualPath {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

/// Derives the virtual path and project of a raw path.
///
/// `/a/<id>` followed by nothing, `/...` or `?...` becomes
/// `/a/<namespace>` followed by the same remainder. Everything else is
/// returned verbatim without a project.
///
/// # Examples
///
/// ```
/// use dashnav_router::extract_virtual_path;
///
/// let (vpath, project) = extract_virtual_path("/a/proj1/dashboard?x=1");
/// assert_eq!(vpath.as_str(), "/a/<namespace>/dashboard?x=1");
/// assert_eq!(project.unwrap().as_str(), "proj1");
///
/// let (vpath, project) = extract_virtual_path("/settings");
/// assert_eq!(vpath.as_str(), "/settings");
/// assert!(project.is_none());
/// ```
pub fn extract_virtual_path(path: &str) -> (VirtualPath, Option<ProjectId>) {
	match PROJECT_PATH.captures(path) {
		Some(caps) => {
			let id = caps.get(1).map_or("", |m| m.as_str());
			let rest = caps.get(2).map_or("", |m| m.as_str());
			let vpath = VirtualPath(format!("{}{}{}", PROJECT_PREFIX, NAMESPACE_PLACEHOLDER, rest));
			(vpath, ProjectId::new(id))
		}
		None => (VirtualPath(path.to_string()), None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/a/proj1/dashboard", "/a/<namespace>/dashboard", Some("proj1"))]
	#[case("/a/proj1/dashboard?x=1", "/a/<namespace>/dashboard?x=1", Some("proj1"))]
	#[case("/a/my_team-2", "/a/<namespace>", Some("my_team-2"))]
	#[case("/a/proj1/", "/a/<namespace>/", Some("proj1"))]
	#[case("/a/proj1?tab=2", "/a/<namespace>?tab=2", Some("proj1"))]
	#[case("/a/proj1/settings", "/a/<namespace>/settings", Some("proj1"))]
	#[case("/", "/", None)]
	#[case("/settings?x=1", "/settings?x=1", None)]
	#[case("/a/", "/a/", None)]
	#[case("/a/pro.j/dashboard", "/a/pro.j/dashboard", None)]
	#[case("/x/a/proj1/dashboard", "/x/a/proj1/dashboard", None)]
	#[case("", "", None)]
	fn test_extract_virtual_path(
		#[case] path: &str,
		#[case] expected_vpath: &str,
		#[case] expected_project: Option<&str>,
	) {
		// Act
		let (vpath, project) = extract_virtual_path(path);

		// Assert
		assert_eq!(vpath.as_str(), expected_vpath, "path: {}", path);
		assert_eq!(project.as_ref().map(ProjectId::as_str), expected_project, "path: {}", path);
	}

	#[rstest]
	#[case("/a/proj1/dashboard?x=1")]
	#[case("/plain/path")]
	#[case("/a/p/q/r?s=t#u")]
	fn test_extract_is_pure(#[case] path: &str) {
		assert_eq!(extract_virtual_path(path), extract_virtual_path(path));
	}

	#[rstest]
	fn test_newline_in_rest_is_kept() {
		let (vpath, project) = extract_virtual_path("/a/proj1/x\ny");

		assert_eq!(vpath.as_str(), "/a/<namespace>/x\ny");
		assert!(project.is_some());
	}

	#[rstest]
	fn test_route_path_and_query() {
		let (vpath, _) = extract_virtual_path("/a/proj1/dashboard?x=1&y=2");

		assert_eq!(vpath.route_path(), "/a/<namespace>/dashboard");
		assert_eq!(vpath.query(), Some("x=1&y=2"));
	}

	#[rstest]
	fn test_resolve_round_trips_project() {
		// Arrange
		let path = "/a/proj1/dashboard?x=1";
		let (vpath, project) = extract_virtual_path(path);

		// Act
		let resolved = vpath.resolve(&project.unwrap());

		// Assert
		assert_eq!(resolved, path);
	}

	#[rstest]
	fn test_resolve_leaves_unscoped_paths() {
		let (vpath, _) = extract_virtual_path("/settings");

		assert_eq!(vpath.resolve(&ProjectId::new("p").unwrap()), "/settings");
	}

	#[rstest]
	#[case("proj1", true)]
	#[case("a-b_C9", true)]
	#[case("", false)]
	#[case("a/b", false)]
	#[case("a.b", false)]
	fn test_project_id_validation(#[case] id: &str, #[case] valid: bool) {
		assert_eq!(ProjectId::new(id).is_some(), valid, "id: {}", id);
	}
}
