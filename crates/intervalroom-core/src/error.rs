//! Core error types for intervalroom-core.
//!
//! The hierarchy is built with thiserror. Plan problems surface as
//! [`ValidationError`], playback problems as [`PlaybackError`], and
//! everything is unified under [`CoreError`] for callers that don't care.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for intervalroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Playback errors
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the playback sequencer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The plan was rejected at construction time.
    #[error("invalid workout plan: {0}")]
    InvalidPlan(#[from] ValidationError),

    /// A command was issued after the workout completed.
    #[error("workout already complete")]
    WorkoutFinished,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// No usable data directory
    #[error("could not determine data directory: {0}")]
    NoDataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Numeric field outside its allowed range
    #[error("{field} = {value} is out of range ({min}..={max})")]
    OutOfRange {
        field: String,
        value: u64,
        min: u64,
        max: u64,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Invalid date range
    #[error("Invalid range: end ({end}) must be later than start ({start})")]
    InvalidRange {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_error_wraps_validation() {
        let err: PlaybackError = ValidationError::EmptyCollection("intervals".into()).into();
        assert_eq!(
            err.to_string(),
            "invalid workout plan: Empty collection: intervals"
        );
    }

    #[test]
    fn core_error_from_playback() {
        let err: CoreError = PlaybackError::WorkoutFinished.into();
        assert!(matches!(err, CoreError::Playback(PlaybackError::WorkoutFinished)));
    }
}
