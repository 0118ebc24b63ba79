//! Priority derivation configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::ahp::PriorityMethod;
use crate::domain::foundation::{Tolerance, DEFAULT_ABSOLUTE_EPS, DEFAULT_RELATIVE_EPS};

/// Priority derivation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PriorityConfig {
    /// Algorithm used to turn a pairwise matrix into weights
    #[serde(default)]
    pub method: PriorityMethod,

    /// Absolute tolerance for diagonal entries and weight sums
    #[serde(default = "default_tolerance_eps")]
    pub tolerance_eps: f64,

    /// Relative tolerance for the reciprocal check
    #[serde(default = "default_reciprocal_tolerance")]
    pub reciprocal_tolerance: f64,
}

impl PriorityConfig {
    /// Tolerance pair handed to the matrix validator
    pub fn tolerance(&self) -> Tolerance {
        Tolerance::new(self.tolerance_eps, self.reciprocal_tolerance)
    }

    /// Validate priority configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.tolerance_eps.is_finite() && self.tolerance_eps > 0.0) {
            return Err(ValidationError::InvalidTolerance("tolerance_eps"));
        }
        if !(self.reciprocal_tolerance.is_finite() && self.reciprocal_tolerance > 0.0) {
            return Err(ValidationError::InvalidTolerance("reciprocal_tolerance"));
        }
        Ok(())
    }
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            method: PriorityMethod::default(),
            tolerance_eps: default_tolerance_eps(),
            reciprocal_tolerance: default_reciprocal_tolerance(),
        }
    }
}

fn default_tolerance_eps() -> f64 {
    DEFAULT_ABSOLUTE_EPS
}

fn default_reciprocal_tolerance() -> f64 {
    DEFAULT_RELATIVE_EPS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_config_defaults() {
        let config = PriorityConfig::default();
        assert_eq!(config.method, PriorityMethod::Eigenvector);
        assert_eq!(config.tolerance_eps, 1e-6);
        assert_eq!(config.reciprocal_tolerance, 1e-4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_method_deserialization() {
        let config: PriorityConfig =
            serde_json::from_str(r#"{ "method": "geometricMean" }"#).unwrap();
        assert_eq!(config.method, PriorityMethod::GeometricMean);
        assert_eq!(config.tolerance_eps, 1e-6);
    }

    #[test]
    fn test_validation_rejects_non_positive_tolerance() {
        let config = PriorityConfig {
            tolerance_eps: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidTolerance("tolerance_eps"))
        );

        let config = PriorityConfig {
            reciprocal_tolerance: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
