//! Rank Change - Ranking differences against a baseline and the stability index.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::AlternativeId;

/// How an alternative's position moved relative to the baseline ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankChange {
    pub alternative_id: AlternativeId,
    pub original_rank: usize,
    pub new_rank: usize,
    /// `original_rank - new_rank`; positive means the alternative moved up.
    pub rank_delta: i64,
    pub score_change: f64,
}

impl RankChange {
    pub fn new(
        alternative_id: AlternativeId,
        original_rank: usize,
        new_rank: usize,
        score_change: f64,
    ) -> Self {
        Self {
            alternative_id,
            original_rank,
            new_rank,
            rank_delta: original_rank as i64 - new_rank as i64,
            score_change,
        }
    }

    pub fn moved(&self) -> bool {
        self.rank_delta != 0
    }
}

/// Stability of a ranking under perturbation, in [0, 1].
///
/// `1 - mean(|rank_delta|) / (n - 1)`, clipped to [0, 1]. A single
/// alternative (or none) is perfectly stable.
pub fn stability_index(changes: &[RankChange]) -> f64 {
    let n = changes.len();
    if n <= 1 {
        return 1.0;
    }
    let mean_shift =
        changes.iter().map(|c| c.rank_delta.unsigned_abs() as f64).sum::<f64>() / n as f64;
    (1.0 - mean_shift / (n as f64 - 1.0)).clamp(0.0, 1.0)
}
