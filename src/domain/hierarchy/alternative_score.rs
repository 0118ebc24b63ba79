//! Alternative Score - Per-criterion performance, total score, and rank.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::HierarchyError;
use crate::domain::foundation::{AlternativeId, CriterionId};

/// How to treat a criterion an alternative has no score for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum MissingValuePolicy {
    /// Treat the missing score as 0.
    #[default]
    Zero,
    /// Substitute a fixed value.
    Fill(f64),
    /// Fail with [`HierarchyError::MissingScore`].
    Reject,
}

/// An alternative's normalized performance per criterion plus its aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeScore {
    pub alternative_id: AlternativeId,
    pub scores_by_criterion: HashMap<CriterionId, f64>,
    #[serde(default)]
    pub total_score: f64,
    /// 1-based position by descending total; 0 until ranked.
    #[serde(default)]
    pub rank: usize,
}

impl AlternativeScore {
    /// Creates an unscored alternative with no performance values.
    pub fn new(alternative_id: impl Into<AlternativeId>) -> Self {
        Self {
            alternative_id: alternative_id.into(),
            scores_by_criterion: HashMap::new(),
            total_score: 0.0,
            rank: 0,
        }
    }

    /// Adds a performance value for a criterion.
    pub fn with_score(mut self, criterion_id: impl Into<CriterionId>, score: f64) -> Self {
        self.scores_by_criterion.insert(criterion_id.into(), score);
        self
    }

    /// Looks up the performance for a criterion under the given policy.
    pub fn score_for(
        &self,
        criterion_id: &CriterionId,
        policy: MissingValuePolicy,
    ) -> Result<f64, HierarchyError> {
        match (self.scores_by_criterion.get(criterion_id), policy) {
            (Some(&score), _) => Ok(score),
            (None, MissingValuePolicy::Zero) => Ok(0.0),
            (None, MissingValuePolicy::Fill(value)) => Ok(value),
            (None, MissingValuePolicy::Reject) => Err(HierarchyError::MissingScore {
                alternative: self.alternative_id.clone(),
                criterion: criterion_id.clone(),
            }),
        }
    }
}

/// Totals closer than this are ranked as a tie.
pub const RANK_RESOLUTION: f64 = 1e-9;

/// Computes 1-based ranks for `totals` by descending value.
///
/// Totals are snapped to multiples of [`RANK_RESOLUTION`] before sorting, so
/// values that differ only by round-off tie. Ties keep their input order.
pub fn rank_positions(totals: &[f64]) -> Vec<usize> {
    let keys: Vec<f64> = totals
        .iter()
        .map(|t| (t / RANK_RESOLUTION).round())
        .collect();
    let mut order: Vec<usize> = (0..totals.len()).collect();
    order.sort_by(|&a, &b| keys[b].total_cmp(&keys[a]));

    let mut ranks = vec![0; totals.len()];
    for (position, index) in order.into_iter().enumerate() {
        ranks[index] = position + 1;
    }
    ranks
}

/// Assigns ranks in place from the current totals.
pub fn assign_ranks(scores: &mut [AlternativeScore]) {
    let totals: Vec<f64> = scores.iter().map(|s| s.total_score).collect();
    for (score, rank) in scores.iter_mut().zip(rank_positions(&totals)) {
        score.rank = rank;
    }
}

/// Returns the scores ordered by rank.
pub fn sorted_by_rank(scores: &[AlternativeScore]) -> Vec<&AlternativeScore> {
    let mut sorted: Vec<_> = scores.iter().collect();
    sorted.sort_by_key(|s| s.rank);
    sorted
}
