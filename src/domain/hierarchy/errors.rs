//! Hierarchy-specific error types.

use thiserror::Error;

use crate::domain::foundation::{AlternativeId, CriterionId, DomainError, ErrorCode};

/// Errors raised while building, weighting, or scoring a criteria hierarchy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HierarchyError {
    #[error("Criterion not found: {0}")]
    CriterionNotFound(CriterionId),

    #[error("Hierarchy has no root criterion")]
    NoRoot,

    #[error("Hierarchy has more than one root: {}", join(.0))]
    MultipleRoots(Vec<CriterionId>),

    #[error("Criterion '{0}' appears more than once")]
    DuplicateCriterion(CriterionId),

    #[error("Criterion '{id}' references unknown parent '{parent}'")]
    UnknownParent { id: CriterionId, parent: CriterionId },

    #[error("Criteria not reachable from the root (cycle): {}", join(.0))]
    Unreachable(Vec<CriterionId>),

    #[error("Children of '{parent}' have local weights summing to {sum}, expected 1")]
    ChildWeightsNotNormalized { parent: CriterionId, sum: f64 },

    #[error("Criterion '{parent}' has {actual} children but {expected} weights were given")]
    ChildCountMismatch {
        parent: CriterionId,
        expected: usize,
        actual: usize,
    },

    #[error("Weight {weight} for criterion '{criterion}' must be a finite number in [0, 1]")]
    InvalidWeight { criterion: CriterionId, weight: f64 },

    #[error("The root criterion '{0}' cannot be adjusted")]
    CannotAdjustRoot(CriterionId),

    #[error("Alternative '{alternative}' has no score for criterion '{criterion}'")]
    MissingScore {
        alternative: AlternativeId,
        criterion: CriterionId,
    },
}

fn join(ids: &[CriterionId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl HierarchyError {
    pub fn code(&self) -> ErrorCode {
        match self {
            HierarchyError::CriterionNotFound(_) => ErrorCode::CriterionNotFound,
            HierarchyError::MissingScore { .. } => ErrorCode::MissingScore,
            HierarchyError::InvalidWeight { .. } => ErrorCode::OutOfRange,
            _ => ErrorCode::InvalidHierarchy,
        }
    }
}

impl From<HierarchyError> for DomainError {
    fn from(err: HierarchyError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
