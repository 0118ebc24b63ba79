//! Sensitivity sweep configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::analysis::SensitivitySettings;

/// Sensitivity sweep configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SensitivityConfig {
    /// Perturbation range in percent (20 means +/-20%)
    #[serde(default = "default_range_pct")]
    pub range_pct: f64,

    /// Number of evenly spaced multipliers sampled across the range
    #[serde(default = "default_sweep_samples")]
    pub sweep_samples: usize,
}

impl SensitivityConfig {
    /// Settings handed to the sensitivity engine
    pub fn settings(&self) -> SensitivitySettings {
        SensitivitySettings::new(self.range_pct / 100.0, self.sweep_samples)
    }

    /// Validate sensitivity configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.range_pct.is_finite() && self.range_pct > 0.0 && self.range_pct <= 100.0) {
            return Err(ValidationError::InvalidSensitivityRange);
        }
        if self.sweep_samples == 0 {
            return Err(ValidationError::InvalidSweepSamples);
        }
        Ok(())
    }
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            range_pct: default_range_pct(),
            sweep_samples: default_sweep_samples(),
        }
    }
}

fn default_range_pct() -> f64 {
    20.0
}

fn default_sweep_samples() -> usize {
    21
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitivity_config_defaults() {
        let config = SensitivityConfig::default();
        assert_eq!(config.range_pct, 20.0);
        assert_eq!(config.sweep_samples, 21);

        let settings = config.settings();
        assert!((settings.range - 0.2).abs() < 1e-12);
        assert_eq!(settings.samples, 21);
    }

    #[test]
    fn test_validation_invalid_range() {
        for range_pct in [0.0, -5.0, 150.0, f64::INFINITY] {
            let config = SensitivityConfig {
                range_pct,
                ..Default::default()
            };
            assert_eq!(
                config.validate(),
                Err(ValidationError::InvalidSensitivityRange)
            );
        }
    }

    #[test]
    fn test_validation_zero_samples() {
        let config = SensitivityConfig {
            sweep_samples: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSweepSamples));
    }
}
