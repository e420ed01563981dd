//! Dashboard settings and the builder that assembles them from sources.

use crate::sources::{ConfigSource, SourceError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error type for settings assembly.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	/// A source failed to load.
	#[error("failed to load {description}: {error}")]
	Source {
		/// Description of the failing source.
		description: String,
		/// Underlying error.
		#[source]
		error: SourceError,
	},

	/// Merged values did not deserialize into [`NavSettings`].
	#[error("invalid settings: {0}")]
	Deserialize(#[from] serde_json::Error),

	/// TOML text did not parse.
	#[error("invalid TOML settings: {0}")]
	Toml(#[from] toml::de::Error),

	/// Settings parsed but failed validation.
	#[error("invalid settings: {0}")]
	Invalid(String),
}

/// A single route table entry as it appears in configuration.
///
/// Entries are kept in file order; order decides which route wins when
/// several patterns match the same path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
	/// Path pattern, e.g. `/a/<namespace>/dashboard` or `/a/<namespace>/series/{name}`.
	pub pattern: String,
	/// Identifier of the view rendering this route.
	pub view: String,
	/// Opaque per-route data handed through to views.
	#[serde(default, skip_serializing_if = "Value::is_null")]
	pub metadata: Value,
}

impl RouteConfig {
	/// Creates a route entry without metadata.
	pub fn new(pattern: impl Into<String>, view: impl Into<String>) -> Self {
		Self {
			pattern: pattern.into(),
			view: view.into(),
			metadata: Value::Null,
		}
	}

	/// Attaches metadata to this entry.
	pub fn with_metadata(mut self, metadata: Value) -> Self {
		self.metadata = metadata;
		self
	}
}

/// Settings for a dashboard application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavSettings {
	/// Application name, shown in the startup log line.
	pub app_name: String,

	/// API base URLs keyed by host name (`api_user`, ...).
	pub api_hosts: IndexMap<String, String>,

	/// Token attached to every API stub.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub api_token: Option<String>,

	/// Ordered route table.
	pub routes: Vec<RouteConfig>,
}

impl Default for NavSettings {
	fn default() -> Self {
		Self {
			app_name: "dashnav".to_string(),
			api_hosts: IndexMap::new(),
			api_token: None,
			routes: Vec::new(),
		}
	}
}

impl NavSettings {
	/// Parses settings from a TOML document and validates them.
	///
	/// # Examples
	///
	/// ```
	/// use dashnav_conf::NavSettings;
	///
	/// let settings = NavSettings::from_toml_str(r#"
	///     [[routes]]
	///     pattern = "/a/<namespace>/dashboard"
	///     view = "dash"
	/// "#).unwrap();
	/// assert_eq!(settings.routes[0].view, "dash");
	/// ```
	pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(content)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Checks invariants serde cannot express.
	pub fn validate(&self) -> Result<(), SettingsError> {
		for (index, route) in self.routes.iter().enumerate() {
			if !route.pattern.starts_with('/') {
				return Err(SettingsError::Invalid(format!(
					"routes[{}]: pattern '{}' must start with '/'",
					index, route.pattern
				)));
			}
			if route.view.trim().is_empty() {
				return Err(SettingsError::Invalid(format!(
					"routes[{}]: view must not be empty",
					index
				)));
			}
		}

		for (name, host) in &self.api_hosts {
			if host.trim().is_empty() {
				return Err(SettingsError::Invalid(format!(
					"api_hosts.{}: host must not be empty",
					name
				)));
			}
		}

		Ok(())
	}
}

/// Assembles [`NavSettings`] from configuration sources.
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	/// Creates a builder with no sources.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a source. Sources are applied by priority, then insertion order.
	pub fn add_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Adds an already boxed source, e.g. from [`auto_source`](crate::auto_source).
	pub fn add_boxed_source(mut self, source: Box<dyn ConfigSource>) -> Self {
		self.sources.push(source);
		self
	}

	/// Loads, merges and validates every source.
	pub fn build(mut self) -> Result<NavSettings, SettingsError> {
		self.sources.sort_by_key(|s| s.priority());

		let mut merged: IndexMap<String, Value> = IndexMap::new();
		for source in &self.sources {
			let values = source.load().map_err(|error| SettingsError::Source {
				description: source.description(),
				error,
			})?;
			tracing::debug!(
				source = %source.description(),
				keys = values.len(),
				"loaded settings source"
			);
			merged.extend(values);
		}

		let settings: NavSettings = serde_json::from_value(Value::Object(merged.into_iter().collect()))?;
		settings.validate()?;
		Ok(settings)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sources::DefaultSource;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_default_settings() {
		// Arrange & Act
		let settings = NavSettings::default();

		// Assert
		assert_eq!(settings.app_name, "dashnav");
		assert!(settings.api_hosts.is_empty());
		assert!(settings.api_token.is_none());
		assert!(settings.routes.is_empty());
	}

	#[rstest]
	fn test_from_toml_keeps_route_order() {
		// Arrange
		let content = r#"
app_name = "metrics"
api_token = "secret"

[api_hosts]
api_user = "https://api.example.com/user"

[[routes]]
pattern = "/a/<namespace>/dashboard"
view = "dash"

[[routes]]
pattern = "/a/<namespace>/{page:*}"
view = "catchall"
metadata = { main_menu = true }
"#;

		// Act
		let settings = NavSettings::from_toml_str(content).unwrap();

		// Assert
		assert_eq!(settings.app_name, "metrics");
		assert_eq!(settings.api_token.as_deref(), Some("secret"));
		assert_eq!(
			settings.api_hosts.get("api_user").map(String::as_str),
			Some("https://api.example.com/user")
		);
		let views: Vec<&str> = settings.routes.iter().map(|r| r.view.as_str()).collect();
		assert_eq!(views, vec!["dash", "catchall"]);
		assert_eq!(settings.routes[1].metadata, json!({"main_menu": true}));
		assert_eq!(settings.routes[0].metadata, Value::Null);
	}

	#[rstest]
	#[case("dashboard", "dash", "must start with '/'")]
	#[case("/dashboard", "  ", "view must not be empty")]
	fn test_validate_rejects_bad_routes(
		#[case] pattern: &str,
		#[case] view: &str,
		#[case] expected: &str,
	) {
		// Arrange
		let settings = NavSettings {
			routes: vec![RouteConfig::new(pattern, view)],
			..NavSettings::default()
		};

		// Act
		let result = settings.validate();

		// Assert
		let message = result.unwrap_err().to_string();
		assert!(message.contains(expected), "message: {}", message);
	}

	#[rstest]
	fn test_validate_rejects_empty_api_host() {
		let mut settings = NavSettings::default();
		settings.api_hosts.insert("api_user".to_string(), "".to_string());

		assert!(matches!(settings.validate(), Err(SettingsError::Invalid(_))));
	}

	#[rstest]
	fn test_builder_higher_priority_wins() {
		// Arrange
		struct Override;
		impl ConfigSource for Override {
			fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
				let mut map = IndexMap::new();
				map.insert("app_name".to_string(), json!("override"));
				Ok(map)
			}
			fn priority(&self) -> u8 {
				100
			}
			fn description(&self) -> String {
				"override".to_string()
			}
		}

		// Act: the high priority source is added first and must still win
		let settings = SettingsBuilder::new()
			.add_source(Override)
			.add_source(
				DefaultSource::new()
					.with_value("app_name", json!("default"))
					.with_value("api_token", json!("token")),
			)
			.build()
			.unwrap();

		// Assert
		assert_eq!(settings.app_name, "override");
		assert_eq!(settings.api_token.as_deref(), Some("token"));
	}

	#[rstest]
	fn test_builder_reports_failing_source() {
		// Arrange
		struct Broken;
		impl ConfigSource for Broken {
			fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
				Err(SourceError::Parse("boom".to_string()))
			}
			fn priority(&self) -> u8 {
				50
			}
			fn description(&self) -> String {
				"broken source".to_string()
			}
		}

		// Act
		let result = SettingsBuilder::new().add_source(Broken).build();

		// Assert
		let err = result.unwrap_err();
		assert!(matches!(err, SettingsError::Source { .. }));
		assert!(err.to_string().contains("broken source"));
	}

	#[rstest]
	fn test_builder_rejects_wrong_types() {
		let result = SettingsBuilder::new()
			.add_source(DefaultSource::new().with_value("routes", json!("not a list")))
			.build();

		assert!(matches!(result, Err(SettingsError::Deserialize(_))));
	}
}
