//! Core error types for hydropace-core.
//!
//! Pacing errors split into two groups: caller configuration errors
//! (`InvalidWindow`, `NegativeGoal`) that abort an evaluation, and data
//! errors (`OutOfOrderEvent`, `ReconciliationMismatch`) that are logged and
//! degraded around so the user still receives feedback.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for hydropace-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Pacing model errors
    #[error("Pacing error: {0}")]
    Pacing(#[from] PacingError),

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

/// Errors raised by the pacing model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PacingError {
    /// Sleep hour must come strictly after wake hour on the same day.
    #[error("Invalid wake window: sleep_hour ({sleep_hour}) must be greater than wake_hour ({wake_hour}), both within [0, 24)")]
    InvalidWindow { wake_hour: f64, sleep_hour: f64 },

    /// A drink event lies after the evaluation instant.
    #[error("Drink event at {timestamp} is after evaluation time {now}")]
    OutOfOrderEvent { timestamp: String, now: String },

    /// Daily goal must be strictly positive.
    #[error("Daily goal must be positive, got {goal_ml} ml")]
    NegativeGoal { goal_ml: i64 },

    /// Known events plus the declared base do not add up to the reported intake.
    #[error("Reconciliation mismatch: base + events = {declared_ml} ml but intake is {observed_ml} ml (difference {difference_ml} ml)")]
    ReconciliationMismatch {
        declared_ml: i64,
        observed_ml: i64,
        difference_ml: i64,
    },

    /// A drink event must carry a positive amount.
    #[error("Drink amount must be positive, got {amount_ml} ml")]
    InvalidAmount { amount_ml: i64 },
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

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
