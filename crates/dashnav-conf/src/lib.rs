//! Settings for dashnav dashboards.
//!
//! Settings are assembled from a stack of [`ConfigSource`]s merged in
//! priority order (environment variables > config files > defaults) and
//! deserialized into [`NavSettings`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use dashnav_conf::{EnvSource, SettingsBuilder, TomlFileSource};
//!
//! let settings = SettingsBuilder::new()
//!     .add_source(TomlFileSource::new("dashboard.toml"))
//!     .add_source(EnvSource::new().with_prefix("DASHNAV_"))
//!     .build()
//!     .unwrap();
//!
//! for route in &settings.routes {
//!     println!("{} -> {}", route.pattern, route.view);
//! }
//! ```

pub mod settings;
pub mod sources;

pub use settings::{NavSettings, RouteConfig, SettingsBuilder, SettingsError};
pub use sources::{
	ConfigSource, DefaultSource, EnvSource, JsonFileSource, SourceError, TomlFileSource,
	auto_source,
};

/// Prefix used for environment variable overrides.
pub const ENV_PREFIX: &str = "DASHNAV_";
