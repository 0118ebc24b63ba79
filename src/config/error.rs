//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Tolerance '{0}' must be a positive finite number")]
    InvalidTolerance(&'static str),

    #[error("Consistency thresholds must be non-negative with warn <= error")]
    InvalidConsistencyThresholds,

    #[error("Sensitivity range must be within (0, 100] percent")]
    InvalidSensitivityRange,

    #[error("Sweep sample count must be at least 1")]
    InvalidSweepSamples,
}
