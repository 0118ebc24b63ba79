//! Analysis configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `AHP_CORE` prefix and nested values use double underscores as separators.
//! Every value has a default, so an empty environment yields a usable config.
//!
//! # Example
//!
//! ```no_run
//! use ahp_core::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Sweeping +/-{}%", config.sensitivity.range_pct);
//! ```

mod consistency;
mod error;
mod priority;
mod sensitivity;

pub use consistency::ConsistencyConfig;
pub use error::{ConfigError, ValidationError};
pub use priority::PriorityConfig;
pub use sensitivity::SensitivityConfig;

use serde::Deserialize;

/// Root analysis configuration
///
/// Groups the recognized options of the decision-analysis core. Load using
/// [`AnalysisConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisConfig {
    /// Priority derivation (method, tolerances)
    #[serde(default)]
    pub priority: PriorityConfig,

    /// Consistency ratio thresholds
    #[serde(default)]
    pub consistency: ConsistencyConfig,

    /// Sensitivity sweep range and sample count
    #[serde(default)]
    pub sensitivity: SensitivityConfig,
}

impl AnalysisConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `AHP_CORE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `AHP_CORE__PRIORITY__METHOD=geometricMean` -> `priority.method`
    /// - `AHP_CORE__SENSITIVITY__RANGE_PCT=25` -> `sensitivity.range_pct = 25`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("AHP_CORE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.priority.validate()?;
        self.consistency.validate()?;
        self.sensitivity.validate()?;
        Ok(())
    }
}
