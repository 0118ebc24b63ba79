//! Weight Adjustment - Ephemeral override of a criterion's global weight.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::CriterionId;

/// A what-if override of one criterion's global weight.
///
/// Not part of the canonical hierarchy until committed through
/// [`HierarchyAggregator::commit_adjustment`](super::HierarchyAggregator::commit_adjustment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightAdjustment {
    pub criterion_id: CriterionId,
    pub original_weight: f64,
    pub new_weight: f64,
}

impl WeightAdjustment {
    pub fn new(criterion_id: impl Into<CriterionId>, original_weight: f64, new_weight: f64) -> Self {
        Self {
            criterion_id: criterion_id.into(),
            original_weight,
            new_weight,
        }
    }

    /// Signed change in weight.
    pub fn delta(&self) -> f64 {
        self.new_weight - self.original_weight
    }
}
