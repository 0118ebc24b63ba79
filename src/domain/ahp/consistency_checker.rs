//! Consistency Checker - Consistency index and ratio of a judgment matrix.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{PairwiseMatrix, PriorityDeriver, PriorityMethod, PriorityResult, PriorityVector};
use crate::domain::foundation::{THRESHOLD_EPS, ZERO_EPS};

/// Saaty random consistency index, indexed by matrix order.
///
/// Orders 10-15 use the extended published values; larger orders reuse the
/// order-15 value.
pub const RANDOM_INDEX: [f64; 16] = [
    0.0, 0.0, 0.0, 0.58, 0.90, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49, 1.51, 1.48, 1.56, 1.57, 1.59,
];

/// Returns the random index RI(n).
pub fn random_index(order: usize) -> f64 {
    RANDOM_INDEX[order.min(RANDOM_INDEX.len() - 1)]
}

/// CR thresholds separating consistent, borderline, and inconsistent matrices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyThresholds {
    pub warn: f64,
    pub error: f64,
}

impl ConsistencyThresholds {
    pub fn new(warn: f64, error: f64) -> Self {
        Self { warn, error }
    }
}

impl Default for ConsistencyThresholds {
    fn default() -> Self {
        Self {
            warn: 0.1,
            error: 0.2,
        }
    }
}

/// Classification of a consistency ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsistencyLevel {
    /// CR within the acceptability threshold.
    Consistent,
    /// CR above the warn threshold but not above the error threshold.
    Borderline,
    /// CR above the error threshold.
    Inconsistent,
}

impl ConsistencyLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ConsistencyLevel::Consistent => "Consistent",
            ConsistencyLevel::Borderline => "Borderline",
            ConsistencyLevel::Inconsistent => "Inconsistent",
        }
    }
}

/// Caller-visible consistency finding carrying the offending CR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ConsistencyIssue {
    Warning { cr: f64, threshold: f64 },
    Error { cr: f64, threshold: f64 },
}

/// Consistency metrics of a (matrix, priority vector) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyMetrics {
    pub lambda_max: f64,
    pub ci: f64,
    pub cr: f64,
    pub level: ConsistencyLevel,
    pub thresholds: ConsistencyThresholds,
}

impl ConsistencyMetrics {
    /// True if CR is within the warn threshold.
    pub fn is_acceptable(&self) -> bool {
        self.level == ConsistencyLevel::Consistent
    }

    /// Returns the warning or error to surface, if any. Never blocks use of
    /// the weights; acceptance is the caller's decision.
    pub fn issue(&self) -> Option<ConsistencyIssue> {
        match self.level {
            ConsistencyLevel::Consistent => None,
            ConsistencyLevel::Borderline => Some(ConsistencyIssue::Warning {
                cr: self.cr,
                threshold: self.thresholds.warn,
            }),
            ConsistencyLevel::Inconsistent => Some(ConsistencyIssue::Error {
                cr: self.cr,
                threshold: self.thresholds.error,
            }),
        }
    }
}

/// The judgment that strays furthest from the ratio implied by the weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JudgmentRevision {
    pub row: usize,
    pub col: usize,
    pub current: f64,
    /// `w[row] / w[col]`, the value a perfectly consistent judge would give.
    pub implied: f64,
    /// `|ln(current / implied)|`
    pub deviation: f64,
}

/// Weights plus consistency for one comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonAnalysis {
    pub priorities: PriorityResult,
    pub consistency: ConsistencyMetrics,
}

/// Consistency index / ratio computations.
pub struct ConsistencyChecker;

impl ConsistencyChecker {
    /// Computes CI and CR from the matrix order and lambda_max.
    ///
    /// # Edge Cases
    /// - Order 1 or 2: CI = 0 and CR = 0 (RI is 0, every such matrix is consistent)
    /// - Round-off making lambda_max slightly below n is clamped to CI = 0
    pub fn check(
        order: usize,
        lambda_max: f64,
        thresholds: &ConsistencyThresholds,
    ) -> ConsistencyMetrics {
        let ci = if order > 1 {
            ((lambda_max - order as f64) / (order as f64 - 1.0)).max(0.0)
        } else {
            0.0
        };
        let ri = random_index(order);
        let cr = if ri > ZERO_EPS { ci / ri } else { 0.0 };
        let level = Self::classify(cr, thresholds);

        ConsistencyMetrics {
            lambda_max,
            ci,
            cr,
            level,
            thresholds: *thresholds,
        }
    }

    /// Classifies a consistency ratio.
    pub fn classify(cr: f64, thresholds: &ConsistencyThresholds) -> ConsistencyLevel {
        if cr <= thresholds.warn + THRESHOLD_EPS {
            ConsistencyLevel::Consistent
        } else if cr <= thresholds.error + THRESHOLD_EPS {
            ConsistencyLevel::Borderline
        } else {
            ConsistencyLevel::Inconsistent
        }
    }

    /// Derives priorities and checks their consistency in one pass.
    pub fn analyze(
        matrix: &PairwiseMatrix,
        method: PriorityMethod,
        thresholds: &ConsistencyThresholds,
    ) -> ComparisonAnalysis {
        let priorities = PriorityDeriver::derive(matrix, method);
        let consistency = Self::check(matrix.order(), priorities.lambda_max, thresholds);

        match consistency.level {
            ConsistencyLevel::Inconsistent => warn!(
                order = matrix.order(),
                cr = consistency.cr,
                "pairwise judgments are inconsistent"
            ),
            level => debug!(order = matrix.order(), cr = consistency.cr, ?level, "consistency checked"),
        }

        ComparisonAnalysis {
            priorities,
            consistency,
        }
    }

    /// Finds the judgment whose revision would most improve consistency.
    ///
    /// Returns None for matrices of order below 2 or when every judgment
    /// already matches its implied ratio.
    pub fn most_inconsistent_judgment(
        matrix: &PairwiseMatrix,
        vector: &PriorityVector,
    ) -> Option<JudgmentRevision> {
        let n = matrix.order();
        if n < 2 || vector.len() != n {
            return None;
        }
        let weights = vector.weights();

        let mut worst: Option<JudgmentRevision> = None;
        for row in 0..n {
            for col in (row + 1)..n {
                if weights[row] <= ZERO_EPS || weights[col] <= ZERO_EPS {
                    continue;
                }
                let Some(current) = matrix.get(row, col) else {
                    continue;
                };
                let implied = weights[row] / weights[col];
                let deviation = (current / implied).ln().abs();
                if deviation <= THRESHOLD_EPS {
                    continue;
                }
                if worst.map_or(true, |w| deviation > w.deviation) {
                    worst = Some(JudgmentRevision {
                        row,
                        col,
                        current,
                        implied,
                        deviation,
                    });
                }
            }
        }
        worst
    }
}
