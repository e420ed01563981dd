//! Configuration sources for layered settings
//!
//! Each source yields a flat map of top-level keys. Sources are merged in
//! priority order (environment variables > config files > defaults), later
//! keys replacing earlier ones wholesale.

use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Trait for configuration sources
pub trait ConfigSource {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Invalid source: {0}")]
	InvalidSource(String),
}

/// Environment variable configuration source
///
/// Keys are lowercased after the prefix is stripped, so `DASHNAV_APP_NAME`
/// becomes `app_name`. Values that look like JSON objects or arrays are
/// parsed as JSON; every other value, `true` and numbers included, is kept
/// as a string.
pub struct EnvSource {
	prefix: Option<String>,
}

impl EnvSource {
	/// Create a new environment variable configuration source
	pub fn new() -> Self {
		Self { prefix: None }
	}

	/// Set a prefix filter for environment variables
	///
	/// # Examples
	///
	/// ```
	/// use dashnav_conf::EnvSource;
	///
	/// let source = EnvSource::new().with_prefix("DASHNAV_");
	/// ```
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	fn parse_value(raw: String) -> Value {
		let trimmed = raw.trim();
		if (trimmed.starts_with('{') || trimmed.starts_with('['))
			&& let Ok(value) = serde_json::from_str::<Value>(trimmed)
		{
			return value;
		}
		Value::String(raw)
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let mut config = IndexMap::new();

		for (key, value) in std::env::vars() {
			let clean_key = match &self.prefix {
				Some(prefix) => match key.strip_prefix(prefix.as_str()) {
					Some(stripped) => stripped,
					None => continue,
				},
				None => key.as_str(),
			};

			if clean_key.is_empty() {
				continue;
			}

			config.insert(clean_key.to_lowercase(), Self::parse_value(value));
		}

		Ok(config)
	}

	fn priority(&self) -> u8 {
		100 // Highest priority
	}

	fn description(&self) -> String {
		match &self.prefix {
			Some(prefix) => format!("Environment variables (prefix: {})", prefix),
			None => "Environment variables".to_string(),
		}
	}
}

/// Converts a parsed document root into a flat top-level map.
fn root_object(value: Value) -> Result<IndexMap<String, Value>, SourceError> {
	match value {
		Value::Object(map) => Ok(map.into_iter().collect()),
		_ => Err(SourceError::Parse("Expected object at root".to_string())),
	}
}

/// TOML file configuration source
///
/// A missing file yields an empty map.
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	/// Create a new TOML file configuration source
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let toml_value: toml::Value = toml::from_str(&content)?;
		let json_value = serde_json::to_value(toml_value)?;

		root_object(json_value)
	}

	fn priority(&self) -> u8 {
		50 // Medium priority
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// JSON file configuration source
///
/// A missing file yields an empty map.
pub struct JsonFileSource {
	path: PathBuf,
}

impl JsonFileSource {
	/// Create a new JSON file configuration source
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for JsonFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let json_value: Value = serde_json::from_str(&content)?;

		root_object(json_value)
	}

	fn priority(&self) -> u8 {
		50 // Medium priority
	}

	fn description(&self) -> String {
		format!("JSON file: {}", self.path.display())
	}
}

/// Default values configuration source
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	/// Create a new default values configuration source
	///
	/// # Examples
	///
	/// ```
	/// use dashnav_conf::DefaultSource;
	/// use serde_json::Value;
	///
	/// let source = DefaultSource::new()
	///     .with_value("app_name", Value::String("metrics".to_string()));
	/// ```
	pub fn new() -> Self {
		Self {
			values: IndexMap::new(),
		}
	}

	/// Add a default value for a configuration key
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}
}

impl Default for DefaultSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0 // Lowest priority
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}

/// Auto-detect configuration source based on file extension
///
/// # Examples
///
/// ```
/// use dashnav_conf::auto_source;
///
/// let source = auto_source("dashboard.toml").unwrap();
/// assert!(source.description().starts_with("TOML"));
/// ```
pub fn auto_source(path: impl AsRef<Path>) -> Result<Box<dyn ConfigSource>, SourceError> {
	let path = path.as_ref();
	let ext = path
		.extension()
		.and_then(|e| e.to_str())
		.ok_or_else(|| SourceError::InvalidSource("No file extension".to_string()))?;

	match ext {
		"toml" => Ok(Box::new(TomlFileSource::new(path))),
		"json" => Ok(Box::new(JsonFileSource::new(path))),
		other => Err(SourceError::InvalidSource(format!(
			"Unsupported file extension: {}",
			other
		))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;
	use std::env;
	use std::io::Write;
	use tempfile::TempDir;

	#[rstest]
	#[serial(env)]
	fn test_env_source_strips_prefix_and_lowercases() {
		// SAFETY: Setting environment variables is unsafe in multi-threaded programs.
		// This test uses #[serial] to ensure exclusive access to environment variables.
		unsafe {
			env::set_var("DASHNAV_TEST_APP_NAME", "metrics");
			env::set_var("UNRELATED_TEST_KEY", "ignored");
		}

		// Act
		let config = EnvSource::new().with_prefix("DASHNAV_").load().unwrap();

		// Assert
		assert_eq!(
			config.get("test_app_name"),
			Some(&Value::String("metrics".to_string()))
		);
		assert!(!config.contains_key("unrelated_test_key"));

		// SAFETY: See above.
		unsafe {
			env::remove_var("DASHNAV_TEST_APP_NAME");
			env::remove_var("UNRELATED_TEST_KEY");
		}
	}

	#[rstest]
	#[case("true", Value::String("true".to_string()))]
	#[case("False", Value::String("False".to_string()))]
	#[case("12345", Value::String("12345".to_string()))]
	#[case("{\"api_user\":\"http://u\"}", serde_json::json!({"api_user": "http://u"}))]
	#[case("[1, 2]", serde_json::json!([1, 2]))]
	#[case("{not json", Value::String("{not json".to_string()))]
	fn test_env_value_parsing(#[case] raw: &str, #[case] expected: Value) {
		assert_eq!(EnvSource::parse_value(raw.to_string()), expected);
	}

	#[rstest]
	fn test_toml_source_reads_nested_tables() {
		// Arrange
		let temp_dir = TempDir::new().unwrap();
		let config_path = temp_dir.path().join("dashboard.toml");
		let mut file = fs::File::create(&config_path).unwrap();
		writeln!(
			file,
			r#"
app_name = "metrics"

[api_hosts]
api_user = "https://api.example.com"

[[routes]]
pattern = "/"
view = "home"
"#
		)
		.unwrap();

		// Act
		let config = TomlFileSource::new(&config_path).load().unwrap();

		// Assert
		assert_eq!(config.get("app_name"), Some(&Value::String("metrics".into())));
		assert_eq!(
			config.get("api_hosts"),
			Some(&serde_json::json!({"api_user": "https://api.example.com"}))
		);
		assert_eq!(config.get("routes").and_then(Value::as_array).map(Vec::len), Some(1));
	}

	#[rstest]
	fn test_missing_file_is_empty() {
		let temp_dir = TempDir::new().unwrap();

		let toml = TomlFileSource::new(temp_dir.path().join("absent.toml"));
		let json = JsonFileSource::new(temp_dir.path().join("absent.json"));

		assert!(toml.load().unwrap().is_empty());
		assert!(json.load().unwrap().is_empty());
	}

	#[rstest]
	fn test_json_source_rejects_non_object_root() {
		// Arrange
		let temp_dir = TempDir::new().unwrap();
		let config_path = temp_dir.path().join("dashboard.json");
		fs::write(&config_path, "[1, 2, 3]").unwrap();

		// Act
		let result = JsonFileSource::new(&config_path).load();

		// Assert
		assert!(matches!(result, Err(SourceError::Parse(_))));
	}

	#[rstest]
	#[case("dashboard.toml", true)]
	#[case("dashboard.json", true)]
	#[case("dashboard.yaml", false)]
	#[case("dashboard", false)]
	fn test_auto_source(#[case] path: &str, #[case] expected_ok: bool) {
		assert_eq!(auto_source(path).is_ok(), expected_ok, "path: {}", path);
	}

	#[rstest]
	fn test_priorities_are_ordered() {
		let defaults = DefaultSource::new();
		let file = TomlFileSource::new("dashboard.toml");
		let env = EnvSource::new();

		assert!(defaults.priority() < file.priority());
		assert!(file.priority() < env.priority());
	}
}
