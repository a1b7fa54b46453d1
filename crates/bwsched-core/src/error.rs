//! Core error types for bwsched-core.
//!
//! Resolution itself never fails. These errors cover the surfaces around it:
//! loading and saving the preferences file, and the editing boundary that
//! rejects profiles or entries before they reach the store.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for bwsched-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors raised by the editing boundary
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Key owned by the profile/entry editing operations
    #[error("'{0}' cannot be set directly; edit profiles and entries through their own commands")]
    ManagedKey(String),

    /// Could not determine where the configuration lives
    #[error("Cannot determine configuration directory")]
    NoConfigDir,
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Profile name empty after trimming
    #[error("Profile name cannot be empty")]
    EmptyProfileName,

    /// Limit below -1
    #[error("Invalid {direction} limit {value}: must be -1 (unlimited) or non-negative")]
    InvalidLimit { direction: &'static str, value: i64 },

    /// A profile with this name already exists
    #[error("Speed profile '{0}' already exists")]
    DuplicateProfile(String),

    /// Profile lookup failed
    #[error("Speed profile '{0}' not found")]
    UnknownProfile(String),

    /// Profile still referenced by schedule entries
    #[error("Speed profile '{name}' is referenced by {count} schedule entries")]
    ProfileInUse { name: String, count: usize },

    /// Entry has no profile selected
    #[error("Please select a speed profile")]
    NoProfileSelected,

    /// Entry time missing or malformed
    #[error("Invalid {field} time")]
    InvalidTime { field: &'static str },

    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: &'static str,
        index: usize,
        len: usize,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::InvalidValue {
            key: "<file>".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::Config(err.into())
    }
}

impl From<toml::ser::Error> for CoreError {
    fn from(err: toml::ser::Error) -> Self {
        CoreError::Custom(format!("TOML serialization failed: {err}"))
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
