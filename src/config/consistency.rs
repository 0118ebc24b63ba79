//! Consistency classification configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::ahp::ConsistencyThresholds;

/// Consistency ratio thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct ConsistencyConfig {
    /// CR above this value is reported as a warning
    #[serde(default = "default_warn_threshold")]
    pub warn_threshold: f64,

    /// CR above this value is reported as an error
    #[serde(default = "default_error_threshold")]
    pub error_threshold: f64,
}

impl ConsistencyConfig {
    /// Thresholds handed to the consistency checker
    pub fn thresholds(&self) -> ConsistencyThresholds {
        ConsistencyThresholds::new(self.warn_threshold, self.error_threshold)
    }

    /// Validate consistency configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let finite = self.warn_threshold.is_finite() && self.error_threshold.is_finite();
        if !finite || self.warn_threshold < 0.0 || self.warn_threshold > self.error_threshold {
            return Err(ValidationError::InvalidConsistencyThresholds);
        }
        Ok(())
    }
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            warn_threshold: default_warn_threshold(),
            error_threshold: default_error_threshold(),
        }
    }
}

fn default_warn_threshold() -> f64 {
    0.1
}

fn default_error_threshold() -> f64 {
    0.2
}
