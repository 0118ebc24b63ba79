//! Floating-point tolerances used for numeric comparisons.

use serde::{Deserialize, Serialize};

/// Absolute tolerance applied to diagonal entries and weight sums.
pub const DEFAULT_ABSOLUTE_EPS: f64 = 1e-6;

/// Relative tolerance applied to the reciprocal check `a[j][i] ~ 1 / a[i][j]`.
pub const DEFAULT_RELATIVE_EPS: f64 = 1e-4;

/// Tolerance below which a value is treated as zero.
pub const ZERO_EPS: f64 = 1e-12;

/// Slack applied when comparing a computed value against a classification
/// threshold.
pub const THRESHOLD_EPS: f64 = 1e-9;

/// Pair of tolerances carried into validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub absolute: f64,
    pub relative: f64,
}

impl Tolerance {
    /// Creates a tolerance pair.
    pub fn new(absolute: f64, relative: f64) -> Self {
        Self { absolute, relative }
    }

    /// Returns true if `a` and `b` are within the absolute tolerance.
    pub fn approx_eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.absolute
    }

    /// Returns true if `actual` is within the relative tolerance of `expected`.
    pub fn approx_eq_relative(&self, actual: f64, expected: f64) -> bool {
        (actual - expected).abs() <= self.relative * expected.abs().max(ZERO_EPS)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            absolute: DEFAULT_ABSOLUTE_EPS,
            relative: DEFAULT_RELATIVE_EPS,
        }
    }
}
