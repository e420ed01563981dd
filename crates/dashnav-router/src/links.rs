//! Link helpers.

use url::Url;

/// Placeholder replaced by the current project in link templates.
pub const PROJECT_ID_TOKEN: &str = "%project_id%";

const ORIGIN: &str = "http://localhost";

/// Resolves `url` against `current` and reduces it to path and query.
///
/// `current` is the path and query the browser is on, so relative
/// references such as `?tab=2` or `settings` resolve the way `pushState`
/// resolves them. Absolute URLs lose their origin, fragments are dropped
/// and an empty query is removed. Input that cannot be parsed is returned
/// as is.
pub fn path_and_query(url: &str, current: &str) -> String {
	let parsed = Url::parse(&format!("{}{}", ORIGIN, current)).and_then(|base| base.join(url));
	match parsed {
		Ok(parsed) => match parsed.query() {
			Some(query) if !query.is_empty() => format!("{}?{}", parsed.path(), query),
			_ => parsed.path().to_string(),
		},
		Err(error) => {
			tracing::debug!(%url, %error, "keeping unparseable navigation target");
			url.to_string()
		}
	}
}

/// Substitutes `project_id` into a link template.
pub fn rewrite_project_link(href: &str, project_id: &str) -> String {
	href.replace(PROJECT_ID_TOKEN, project_id)
}

/// Whether `href` is handled by the dashboard instead of the browser.
pub fn is_internal_link(href: &str) -> bool {
	href.starts_with('/') && !href.starts_with("//")
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/a/proj1/dashboard?x=1", "/a/proj1/dashboard?x=1")]
	#[case("/a/proj1/dashboard#top", "/a/proj1/dashboard")]
	#[case("/a/proj1/dashboard?", "/a/proj1/dashboard")]
	#[case("https://dash.example.com/a/p/x?y=1#z", "/a/p/x?y=1")]
	#[case("/", "/")]
	fn test_path_and_query(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(path_and_query(input, "/a/other/page?q=1"), expected);
	}

	#[rstest]
	#[case("?tab=2", "/a/proj1/dashboard", "/a/proj1/dashboard?tab=2")]
	#[case("settings", "/a/proj1/dashboard", "/a/proj1/settings")]
	#[case("../proj2/dashboard", "/a/proj1/dashboard?x=1", "/a/proj2/dashboard")]
	#[case("#top", "/a/proj1/dashboard?x=1", "/a/proj1/dashboard?x=1")]
	fn test_relative_targets_resolve_against_current(
		#[case] input: &str,
		#[case] current: &str,
		#[case] expected: &str,
	) {
		assert_eq!(path_and_query(input, current), expected);
	}

	#[rstest]
	fn test_rewrite_project_link() {
		assert_eq!(
			rewrite_project_link("/a/%project_id%/dashboard", "proj1"),
			"/a/proj1/dashboard"
		);
		assert_eq!(rewrite_project_link("/settings", "proj1"), "/settings");
	}

	#[rstest]
	#[case("/a/p/dashboard", true)]
	#[case("//cdn.example.com/x", false)]
	#[case("https://example.com", false)]
	#[case("dashboard", false)]
	fn test_is_internal_link(#[case] href: &str, #[case] expected: bool) {
		assert_eq!(is_internal_link(href), expected);
	}
}
