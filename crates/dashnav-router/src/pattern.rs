//! Route pattern matching.
//!
//! Patterns are matched against the path portion of a virtual path, so the
//! project placeholder `<namespace>` is plain literal text here.

use crate::error::RouterError;
use std::collections::HashMap;

/// Maximum allowed length for a route pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a route pattern.
const MAX_PATH_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled pattern regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// A compiled route pattern.
///
/// Supports patterns like:
/// - `/a/<namespace>/dashboard` - Exact match
/// - `/a/<namespace>/series/{name}` - Single segment parameter
/// - `/a/<namespace>/explore/{path:*}` - Wildcard (rest of path, including `/`)
#[derive(Debug, Clone)]
pub struct RoutePattern {
	pattern: String,
	regex: regex::Regex,
	param_names: Vec<String>,
}

impl RoutePattern {
	/// Compiles a pattern string.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidPattern`] if the pattern is longer than
	/// 1024 bytes, has more than 32 segments, contains an unterminated or
	/// malformed `{parameter}`, or compiles to an invalid regex.
	pub fn new(pattern: &str) -> Result<Self, RouterError> {
		let invalid = |reason: String| RouterError::InvalidPattern {
			pattern: pattern.to_string(),
			reason,
		};

		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(invalid(format!(
				"length {} exceeds maximum allowed length of {} bytes",
				pattern.len(),
				MAX_PATTERN_LENGTH
			)));
		}

		let segment_count = pattern.split('/').count();
		if segment_count > MAX_PATH_SEGMENTS {
			return Err(invalid(format!(
				"{} path segments, exceeding maximum of {}",
				segment_count, MAX_PATH_SEGMENTS
			)));
		}

		let (regex_str, param_names) = Self::compile_pattern(pattern).map_err(invalid)?;

		let regex = regex::RegexBuilder::new(&regex_str)
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| invalid(format!("failed to compile pattern regex: {}", e)))?;

		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			param_names,
		})
	}

	fn compile_pattern(pattern: &str) -> Result<(String, Vec<String>), String> {
		let mut regex_str = String::from("^");
		let mut param_names = Vec::new();
		let mut chars = pattern.chars();

		while let Some(c) = chars.next() {
			match c {
				'{' => {
					let mut param = String::new();
					let mut modifier: Option<String> = None;
					let mut closed = false;

					for next in chars.by_ref() {
						match (next, modifier.as_mut()) {
							('}', _) => {
								closed = true;
								break;
							}
							(':', None) => modifier = Some(String::new()),
							(_, Some(m)) => m.push(next),
							(_, None) => param.push(next),
						}
					}

					if !closed {
						return Err(format!("unterminated parameter '{{{}'", param));
					}
					let is_wildcard = match modifier.as_deref() {
						None => false,
						Some("*") => true,
						Some(other) => {
							return Err(format!(
								"unsupported parameter modifier '{}' in '{{{}:{}}}'",
								other, param, other
							));
						}
					};

					if param.is_empty() || !param.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
						return Err(format!("invalid parameter name '{}'", param));
					}

					if is_wildcard {
						regex_str.push_str(&format!("(?P<{}>.*)", param));
					} else {
						regex_str.push_str(&format!("(?P<{}>[^/]+)", param));
					}
					param_names.push(param);
				}
				_ => regex_str.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
			}
		}

		regex_str.push('$');
		Ok((regex_str, param_names))
	}

	/// Returns the original pattern string.
	pub fn as_str(&self) -> &str {
		&self.pattern
	}

	/// Returns the parameter names in pattern order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Matches a path, returning the captured parameters.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		self.regex.captures(path).map(|caps| {
			self.param_names
				.iter()
				.filter_map(|name| caps.name(name).map(|m| (name.clone(), m.as_str().to_string())))
				.collect()
		})
	}

	/// Checks if this pattern matches the given path.
	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}

	/// Returns whether this pattern has no parameters.
	pub fn is_exact(&self) -> bool {
		self.param_names.is_empty()
	}
}

impl PartialEq for RoutePattern {
	fn eq(&self, other: &Self) -> bool {
		self.pattern == other.pattern
	}
}

impl Eq for RoutePattern {}

impl std::fmt::Display for RoutePattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.pattern)
	}
}
