//! Core error types for confbot-core.
//!
//! Normalization problems surface as [`ValidationError`] when a schedule is
//! loaded; query-time code assumes every stored record is well-formed and
//! never fails, except for the bounded slot search ([`ScheduleError`]).

use std::path::PathBuf;
use thiserror::Error;

use crate::slot::SlotTime;

/// Core error type for confbot-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Raw schedule records could not be normalized
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Slot resolution failed
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Navigation token could not be decoded
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A raw event record that cannot be turned into an [`EventRecord`](crate::EventRecord).
///
/// `index` is the position of the offending record in the raw input. A single
/// invalid record invalidates the whole load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent or blank
    #[error("record {index}: missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    /// The start time is not a valid "HHMM" value
    #[error("record {index}: invalid start time '{value}' (expected HHMM)")]
    InvalidTime { index: usize, value: String },

    /// Any other field holds a value of the wrong shape
    #[error("record {index}: invalid value for '{field}': {message}")]
    InvalidValue {
        index: usize,
        field: &'static str,
        message: String,
    },
}

/// Slot resolution errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// No occupied slot exists between `from` and the end of the conference window
    #[error("no events found from {from} after {steps} slot steps")]
    EmptySchedule { from: SlotTime, steps: usize },
}

/// Navigation token errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The token is not three `x`-separated integers
    #[error("malformed navigation token '{0}'")]
    Malformed(String),

    /// A component is outside its valid range
    #[error("navigation token {field} out of range: {value}")]
    OutOfRange { field: &'static str, value: u32 },
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

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
