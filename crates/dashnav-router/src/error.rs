//! Error types for navigation.
//!
//! Navigation itself never fails: unmatched paths and unregistered views
//! degrade to the not-found view. These errors cover configuration and
//! platform problems surfaced at startup or at the public entry points.

use thiserror::Error;

/// Error type for the history backend.
#[derive(Debug, Error)]
pub enum HistoryError {
	/// The platform exposes no usable history or location.
	#[error("history unavailable: {0}")]
	Unavailable(String),

	/// A platform call failed.
	#[error("history operation failed: {0}")]
	Platform(String),

	/// History state could not be encoded.
	#[error("history state serialization failed: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// Error type for router operations.
#[derive(Debug, Error)]
pub enum RouterError {
	/// A route pattern could not be compiled.
	#[error("invalid route pattern '{pattern}': {reason}")]
	InvalidPattern {
		/// The offending pattern.
		pattern: String,
		/// Why it was rejected.
		reason: String,
	},

	/// `init` was called twice on the same dashboard.
	#[error("dashboard already initialized")]
	AlreadyInitialized,

	/// A navigation was requested while another one was running.
	#[error("navigation already in progress")]
	NavigationInProgress,

	/// The history backend failed.
	#[error(transparent)]
	History(#[from] HistoryError),
}
