//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, tolerances, and error types
//! that form the vocabulary of the AHP domain.

mod errors;
mod ids;
mod saaty_scale;
mod tolerance;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AlternativeId, CriterionId, EvaluatorId};
pub use saaty_scale::SaatyScale;
pub use tolerance::{
    Tolerance, DEFAULT_ABSOLUTE_EPS, DEFAULT_RELATIVE_EPS, THRESHOLD_EPS, ZERO_EPS,
};
