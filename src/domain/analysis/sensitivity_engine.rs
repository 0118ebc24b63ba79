//! Sensitivity Engine - One-criterion weight sweeps, impact, and critical thresholds.
//!
//! The sweep uses single-criterion substitution: only the target
//! criterion's weight changes and every other weight is held fixed, so the
//! weights of an intermediate sample do not sum to 1. Derived impact and
//! threshold numbers are defined over this approximation. Restoring the
//! sum-to-1 invariant is done by committing an adjustment through
//! [`HierarchyAggregator::commit_adjustment`](crate::domain::hierarchy::HierarchyAggregator::commit_adjustment).

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::{stability_index, RankChange};
use crate::domain::foundation::{
    AlternativeId, CriterionId, DomainError, ErrorCode, THRESHOLD_EPS,
};
use crate::domain::hierarchy::{
    rank_positions, AlternativeScore, HierarchyError, LeafWeight, MissingValuePolicy,
};

/// Score movement that counts as a critical change.
pub const CRITICAL_SCORE_DELTA: f64 = 0.05;

/// Width at which the critical threshold search stops.
pub const THRESHOLD_SEARCH_WIDTH: f64 = 0.001;

/// Upper impact bound for a stable alternative.
pub const STABLE_IMPACT: f64 = 0.05;

/// Upper impact bound for a moderately sensitive alternative.
pub const MODERATE_IMPACT: f64 = 0.1;

/// Max impact above which a criterion has high influence.
pub const HIGH_IMPACT: f64 = 0.15;

/// Max impact at or above which a criterion has medium influence.
pub const MEDIUM_IMPACT: f64 = 0.08;

/// Sweep range and resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivitySettings {
    /// Fractional range R; multipliers span [1 - R, 1 + R].
    pub range: f64,
    /// Number of evenly spaced multipliers.
    pub samples: usize,
}

impl SensitivitySettings {
    pub fn new(range: f64, samples: usize) -> Self {
        Self { range, samples }
    }

    pub fn validate(&self) -> Result<(), SensitivityError> {
        if !(self.range.is_finite() && self.range > 0.0 && self.range <= 1.0) {
            return Err(SensitivityError::InvalidRange(self.range));
        }
        if self.samples == 0 {
            return Err(SensitivityError::InvalidSampleCount);
        }
        Ok(())
    }

    /// Evenly spaced multipliers across `[1 - R, 1 + R]`.
    ///
    /// With an odd sample count the middle multiplier is exactly 1.
    pub fn multipliers(&self) -> Vec<f64> {
        if self.samples == 1 {
            return vec![1.0];
        }
        let last = (self.samples - 1) as f64;
        (0..self.samples)
            .map(|i| 1.0 + self.range * (2.0 * i as f64 / last - 1.0))
            .collect()
    }
}

impl Default for SensitivitySettings {
    fn default() -> Self {
        Self {
            range: 0.2,
            samples: 21,
        }
    }
}

/// Errors from sensitivity analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SensitivityError {
    #[error("Sensitivity range must be within (0, 1], got {0}")]
    InvalidRange(f64),

    #[error("Sensitivity sweep needs at least one sample")]
    InvalidSampleCount,

    #[error("Base weight {weight} for criterion '{criterion}' must be within [0, 1]")]
    InvalidBaseWeight { criterion: CriterionId, weight: f64 },

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}

impl SensitivityError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SensitivityError::Hierarchy(err) => err.code(),
            _ => ErrorCode::InvalidSensitivityConfig,
        }
    }
}

impl From<SensitivityError> for DomainError {
    fn from(err: SensitivityError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}

/// Per-alternative stability over a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankStability {
    Stable,
    Moderate,
    Volatile,
}

impl RankStability {
    /// Classifies an alternative by its score impact.
    pub fn from_impact(impact: f64) -> Self {
        if impact <= STABLE_IMPACT + THRESHOLD_EPS {
            RankStability::Stable
        } else if impact <= MODERATE_IMPACT + THRESHOLD_EPS {
            RankStability::Moderate
        } else {
            RankStability::Volatile
        }
    }
}

/// Overall influence of a criterion on the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

impl ImpactLevel {
    /// Classifies a criterion by the largest impact across alternatives.
    pub fn from_max_impact(max_impact: f64) -> Self {
        if max_impact > HIGH_IMPACT + THRESHOLD_EPS {
            ImpactLevel::High
        } else if max_impact >= MEDIUM_IMPACT - THRESHOLD_EPS {
            ImpactLevel::Medium
        } else {
            ImpactLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImpactLevel::High => "High",
            ImpactLevel::Medium => "Medium",
            ImpactLevel::Low => "Low",
        }
    }

    /// Advice shown next to the analysis of `criterion`.
    pub fn recommendation(&self, criterion: &CriterionId) -> String {
        match self {
            ImpactLevel::High => format!(
                "The ranking is highly sensitive to '{}'. Re-examine the judgments behind this criterion before committing to a decision.",
                criterion
            ),
            ImpactLevel::Medium => format!(
                "'{}' has a moderate influence on the ranking. Review its weight if the leading alternatives are close.",
                criterion
            ),
            ImpactLevel::Low => format!(
                "The ranking is robust to changes in '{}' within the tested range.",
                criterion
            ),
        }
    }
}

/// One point of the sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSample {
    pub multiplier: f64,
    pub adjusted_weight: f64,
    /// Adjusted totals in baseline input order.
    pub scores: Vec<f64>,
    pub rank_changes: Vec<RankChange>,
    pub stability_index: f64,
}

/// How one alternative responds to the sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeSensitivity {
    pub alternative_id: AlternativeId,
    pub base_score: f64,
    pub base_rank: usize,
    /// The alternative's performance on the swept criterion.
    pub criterion_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    /// `max_score - min_score`
    pub impact: f64,
    pub rank_stability: RankStability,
    /// Smallest weight at which the score moves by more than
    /// [`CRITICAL_SCORE_DELTA`]; None if no such weight exists in [0, 1].
    pub critical_threshold: Option<f64>,
}

/// Full sensitivity analysis of one criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedSensitivityResult {
    pub criterion_id: CriterionId,
    pub base_weight: f64,
    /// Fractional range R used for the sweep.
    pub sensitivity_range: f64,
    pub alternatives: Vec<AlternativeSensitivity>,
    pub samples: Vec<SweepSample>,
    pub max_impact: f64,
    pub overall_impact: ImpactLevel,
    /// Worst (lowest) per-sample stability index; 1.0 means no rank moved anywhere.
    pub stability_index: f64,
    pub recommendation: String,
}

/// What-if analysis of criterion weights.
pub struct SensitivityEngine;

impl SensitivityEngine {
    /// Substitutes a new weight for one criterion in an alternative's total.
    ///
    /// Equivalent to `total - score * w0 + score * w'`, written so that
    /// `w' == w0` returns `total` unchanged.
    pub fn adjusted_score(
        base_total: f64,
        criterion_score: f64,
        base_weight: f64,
        new_weight: f64,
    ) -> f64 {
        base_total + criterion_score * (new_weight - base_weight)
    }

    /// Binary search over `w'` in [0, 1] for the smallest weight where the
    /// adjusted score differs from the base score by more than
    /// [`CRITICAL_SCORE_DELTA`].
    ///
    /// Assumes the impact grows monotonically with the weight. When the
    /// substitution is not monotone over the interval (the deviation is
    /// V-shaped around `w0`), only one crossing is found.
    pub fn critical_threshold(
        base_total: f64,
        criterion_score: f64,
        base_weight: f64,
    ) -> Option<f64> {
        let exceeds = |weight: f64| {
            (Self::adjusted_score(base_total, criterion_score, base_weight, weight) - base_total).abs()
                > CRITICAL_SCORE_DELTA + THRESHOLD_EPS
        };

        if !exceeds(1.0) {
            return None;
        }

        let (mut low, mut high) = (0.0_f64, 1.0_f64);
        while high - low >= THRESHOLD_SEARCH_WIDTH {
            let mid = (low + high) / 2.0;
            if exceeds(mid) {
                high = mid;
            } else {
                low = mid;
            }
        }
        Some(high)
    }

    /// Compares a ranking of new totals against the baseline totals.
    ///
    /// Both slices are in the same alternative order.
    pub fn rank_changes(
        ids: &[AlternativeId],
        base_totals: &[f64],
        new_totals: &[f64],
    ) -> Vec<RankChange> {
        let base_ranks = rank_positions(base_totals);
        let new_ranks = rank_positions(new_totals);
        ids.iter()
            .enumerate()
            .map(|(i, id)| {
                RankChange::new(
                    id.clone(),
                    base_ranks[i],
                    new_ranks[i],
                    new_totals[i] - base_totals[i],
                )
            })
            .collect()
    }

    /// Sweeps one criterion's weight and reports impact and stability.
    ///
    /// `baseline` must carry totals from the hierarchy aggregator;
    /// `base_weight` is the criterion's global weight in that baseline.
    pub fn analyze(
        baseline: &[AlternativeScore],
        criterion_id: &CriterionId,
        base_weight: f64,
        settings: &SensitivitySettings,
        policy: MissingValuePolicy,
    ) -> Result<ExtendedSensitivityResult, SensitivityError> {
        settings.validate()?;
        if !(base_weight.is_finite() && (0.0..=1.0).contains(&base_weight)) {
            return Err(SensitivityError::InvalidBaseWeight {
                criterion: criterion_id.clone(),
                weight: base_weight,
            });
        }

        let ids: Vec<AlternativeId> = baseline.iter().map(|a| a.alternative_id.clone()).collect();
        let base_totals: Vec<f64> = baseline.iter().map(|a| a.total_score).collect();
        let base_ranks = rank_positions(&base_totals);
        let criterion_scores = baseline
            .iter()
            .map(|a| a.score_for(criterion_id, policy))
            .collect::<Result<Vec<f64>, _>>()?;

        let samples: Vec<SweepSample> = settings
            .multipliers()
            .into_iter()
            .map(|multiplier| {
                let adjusted_weight = (base_weight * multiplier).clamp(0.0, 1.0);
                let scores: Vec<f64> = base_totals
                    .iter()
                    .zip(&criterion_scores)
                    .map(|(&total, &score)| {
                        Self::adjusted_score(total, score, base_weight, adjusted_weight)
                    })
                    .collect();
                let rank_changes = Self::rank_changes(&ids, &base_totals, &scores);
                let stability_index = stability_index(&rank_changes);
                SweepSample {
                    multiplier,
                    adjusted_weight,
                    scores,
                    rank_changes,
                    stability_index,
                }
            })
            .collect();

        let alternatives: Vec<AlternativeSensitivity> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let (min_score, max_score) = samples.iter().map(|s| s.scores[i]).fold(
                    (f64::INFINITY, f64::NEG_INFINITY),
                    |(lo, hi), v| (lo.min(v), hi.max(v)),
                );
                let impact = max_score - min_score;
                AlternativeSensitivity {
                    alternative_id: id.clone(),
                    base_score: base_totals[i],
                    base_rank: base_ranks[i],
                    criterion_score: criterion_scores[i],
                    min_score,
                    max_score,
                    impact,
                    rank_stability: RankStability::from_impact(impact),
                    critical_threshold: Self::critical_threshold(
                        base_totals[i],
                        criterion_scores[i],
                        base_weight,
                    ),
                }
            })
            .collect();

        let max_impact = alternatives.iter().map(|a| a.impact).fold(0.0, f64::max);
        let overall_impact = ImpactLevel::from_max_impact(max_impact);
        let stability_index = samples
            .iter()
            .map(|s| s.stability_index)
            .fold(1.0, f64::min);

        debug!(
            criterion = %criterion_id,
            base_weight,
            samples = samples.len(),
            max_impact,
            ?overall_impact,
            stability_index,
            "sensitivity sweep complete"
        );

        Ok(ExtendedSensitivityResult {
            criterion_id: criterion_id.clone(),
            base_weight,
            sensitivity_range: settings.range,
            alternatives,
            samples,
            max_impact,
            overall_impact,
            stability_index,
            recommendation: overall_impact.recommendation(criterion_id),
        })
    }

    /// Runs [`Self::analyze`] for every leaf criterion, most influential
    /// first (tornado order).
    pub fn analyze_all(
        baseline: &[AlternativeScore],
        leaf_weights: &[LeafWeight],
        settings: &SensitivitySettings,
        policy: MissingValuePolicy,
    ) -> Result<Vec<ExtendedSensitivityResult>, SensitivityError> {
        let mut results = leaf_weights
            .iter()
            .map(|leaf| {
                Self::analyze(baseline, &leaf.criterion_id, leaf.global_weight, settings, policy)
            })
            .collect::<Result<Vec<_>, _>>()?;
        results.sort_by(|a, b| b.max_impact.total_cmp(&a.max_impact));
        Ok(results)
    }
}
