//! Saaty fundamental scale value object (1 to 9 intensity of importance).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Intensity of importance of one item over another on the Saaty 1-9 scale.
///
/// The reciprocal judgment (the second item preferred) is `1 / value`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SaatyScale {
    #[default]
    Equal = 1,
    Weak = 2,
    Moderate = 3,
    ModeratePlus = 4,
    Strong = 5,
    StrongPlus = 6,
    VeryStrong = 7,
    VeryStrongPlus = 8,
    Extreme = 9,
}

impl SaatyScale {
    /// Creates a scale value from an integer, returning error if out of range.
    pub fn try_from_u8(value: u8) -> Result<Self, ValidationError> {
        match value {
            1 => Ok(SaatyScale::Equal),
            2 => Ok(SaatyScale::Weak),
            3 => Ok(SaatyScale::Moderate),
            4 => Ok(SaatyScale::ModeratePlus),
            5 => Ok(SaatyScale::Strong),
            6 => Ok(SaatyScale::StrongPlus),
            7 => Ok(SaatyScale::VeryStrong),
            8 => Ok(SaatyScale::VeryStrongPlus),
            9 => Ok(SaatyScale::Extreme),
            _ => Err(ValidationError::out_of_range(
                "saaty_scale",
                1.0,
                9.0,
                f64::from(value),
            )),
        }
    }

    /// Returns the intensity as a matrix entry.
    pub fn value(&self) -> f64 {
        f64::from(*self as u8)
    }

    /// Returns the entry for the mirrored comparison.
    pub fn reciprocal(&self) -> f64 {
        1.0 / self.value()
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            SaatyScale::Equal => "Equal importance",
            SaatyScale::Weak => "Weak",
            SaatyScale::Moderate => "Moderate importance",
            SaatyScale::ModeratePlus => "Moderate plus",
            SaatyScale::Strong => "Strong importance",
            SaatyScale::StrongPlus => "Strong plus",
            SaatyScale::VeryStrong => "Very strong importance",
            SaatyScale::VeryStrongPlus => "Very, very strong",
            SaatyScale::Extreme => "Extreme importance",
        }
    }
}

impl fmt::Display for SaatyScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), *self as u8)
    }
}
