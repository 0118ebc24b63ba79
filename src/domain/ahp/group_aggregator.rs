//! Group Aggregator - Consensus matrix from several evaluators' judgments.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::{MatrixError, MatrixValidator, PairwiseMatrix};
use crate::domain::foundation::{DomainError, ErrorCode, EvaluatorId, Tolerance, ZERO_EPS};

/// One evaluator's raw judgments for a shared comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorJudgments {
    pub evaluator_id: EvaluatorId,
    pub rows: Vec<Vec<f64>>,
    /// Relative importance of this evaluator (defaults to 1).
    #[serde(default = "default_evaluator_weight")]
    pub weight: f64,
}

fn default_evaluator_weight() -> f64 {
    1.0
}

impl EvaluatorJudgments {
    pub fn new(evaluator_id: impl Into<EvaluatorId>, rows: Vec<Vec<f64>>) -> Self {
        Self {
            evaluator_id: evaluator_id.into(),
            rows,
            weight: default_evaluator_weight(),
        }
    }

    /// Sets the evaluator's importance weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// Why an evaluator's matrix was left out of the consensus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExclusionReason {
    /// The matrix failed structural validation.
    InvalidMatrix { error: String },
    /// The matrix order differs from the first valid matrix.
    OrderMismatch { expected: usize, actual: usize },
    /// The evaluator weight is not a positive finite number.
    InvalidWeight { weight: f64 },
}

impl ExclusionReason {
    fn invalid(error: &MatrixError) -> Self {
        ExclusionReason::InvalidMatrix {
            error: error.to_string(),
        }
    }
}

/// An evaluator excluded from aggregation, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedEvaluator {
    pub evaluator_id: EvaluatorId,
    pub reason: ExclusionReason,
}

/// Result of aggregating a group's judgments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupConsensus {
    pub matrix: PairwiseMatrix,
    /// Evaluators whose judgments entered the consensus, in input order.
    pub contributors: Vec<EvaluatorId>,
    pub excluded: Vec<ExcludedEvaluator>,
}

/// Errors from group aggregation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GroupAggregationError {
    #[error("No valid evaluator matrices to aggregate ({excluded} excluded)")]
    NoValidMatrices { excluded: usize },
}

impl GroupAggregationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GroupAggregationError::NoValidMatrices { .. } => ErrorCode::NoValidMatrices,
        }
    }
}

impl From<GroupAggregationError> for DomainError {
    fn from(err: GroupAggregationError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}

/// Merges evaluators' matrices with the cell-wise geometric mean.
pub struct GroupAggregator;

impl GroupAggregator {
    /// Aggregates judgments into one consensus matrix.
    ///
    /// `a[i][j] = prod_e a_e[i][j] ^ (w_e / sum w)`, which with equal weights is
    /// the plain geometric mean. The geometric mean keeps the consensus
    /// reciprocal, so only the upper triangle is aggregated and the lower
    /// triangle is mirrored.
    ///
    /// Evaluators with invalid matrices, an order different from the first
    /// valid matrix, or a non-positive weight are excluded and reported.
    pub fn aggregate(
        judgments: &[EvaluatorJudgments],
        tolerance: &Tolerance,
    ) -> Result<GroupConsensus, GroupAggregationError> {
        let mut accepted: Vec<&EvaluatorJudgments> = Vec::new();
        let mut excluded = Vec::new();
        let mut order: Option<usize> = None;

        for entry in judgments {
            let reason = if !(entry.weight.is_finite() && entry.weight > 0.0) {
                Some(ExclusionReason::InvalidWeight {
                    weight: entry.weight,
                })
            } else if let Err(err) = MatrixValidator::validate(&entry.rows, tolerance) {
                Some(ExclusionReason::invalid(&err))
            } else {
                match order {
                    Some(expected) if expected != entry.rows.len() => {
                        Some(ExclusionReason::OrderMismatch {
                            expected,
                            actual: entry.rows.len(),
                        })
                    }
                    _ => None,
                }
            };

            match reason {
                Some(reason) => {
                    warn!(
                        evaluator = %entry.evaluator_id,
                        ?reason,
                        "excluding evaluator from group aggregation"
                    );
                    excluded.push(ExcludedEvaluator {
                        evaluator_id: entry.evaluator_id.clone(),
                        reason,
                    });
                }
                None => {
                    order.get_or_insert(entry.rows.len());
                    accepted.push(entry);
                }
            }
        }

        let n = match order {
            Some(n) if !accepted.is_empty() => n,
            _ => {
                return Err(GroupAggregationError::NoValidMatrices {
                    excluded: excluded.len(),
                })
            }
        };

        let total_weight: f64 = accepted.iter().map(|e| e.weight).sum();
        let mut rows = vec![vec![1.0; n]; n];
        for row in 0..n {
            for col in (row + 1)..n {
                let log_mean: f64 = accepted
                    .iter()
                    .map(|e| e.weight * e.rows[row][col].ln())
                    .sum::<f64>()
                    / total_weight.max(ZERO_EPS);
                let value = log_mean.exp();
                rows[row][col] = value;
                rows[col][row] = 1.0 / value;
            }
        }

        debug!(
            contributors = accepted.len(),
            excluded = excluded.len(),
            order = n,
            "aggregated group judgments"
        );

        Ok(GroupConsensus {
            matrix: PairwiseMatrix::from_validated_rows(rows),
            contributors: accepted.iter().map(|e| e.evaluator_id.clone()).collect(),
            excluded,
        })
    }
}
