//! Pareto Engine - Dominance, efficiency frontier, and criterion tradeoffs.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::domain::foundation::{AlternativeId, CriterionId, ZERO_EPS};
use crate::domain::hierarchy::{AlternativeScore, HierarchyError, MissingValuePolicy};

/// Correlation below which two criteria are reported as a tradeoff.
pub const TRADEOFF_CORRELATION_THRESHOLD: f64 = -0.3;

/// An alternative's position in criterion space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoPoint {
    pub alternative_id: AlternativeId,
    pub criteria_scores: HashMap<CriterionId, f64>,
    pub is_dominated: bool,
    /// Alternatives this point dominates.
    pub dominates: BTreeSet<AlternativeId>,
    /// 1.0 on the frontier, otherwise the best ratio to a frontier point.
    pub efficiency: f64,
}

/// Two criteria that pull against each other across the frontier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeoffRecord {
    pub criterion_pair: (CriterionId, CriterionId),
    pub correlation: f64,
    /// `|correlation|`
    pub tradeoff_strength: f64,
    /// Frontier alternatives the correlation was measured over.
    pub alternatives: Vec<AlternativeId>,
}

/// Result of a Pareto pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoAnalysis {
    /// Criteria considered, in column order.
    pub criteria: Vec<CriterionId>,
    /// One point per alternative, in input order.
    pub points: Vec<ParetoPoint>,
    pub frontier: Vec<AlternativeId>,
    pub dominated: Vec<AlternativeId>,
    pub efficiency_scores: HashMap<AlternativeId, f64>,
    pub tradeoff_analysis: Vec<TradeoffRecord>,
    /// Efficiency ratio terms skipped because the frontier value was zero.
    pub skipped_zero_denominators: usize,
}

impl ParetoAnalysis {
    pub fn point(&self, id: &AlternativeId) -> Option<&ParetoPoint> {
        self.points.iter().find(|p| &p.alternative_id == id)
    }

    pub fn is_on_frontier(&self, id: &AlternativeId) -> bool {
        self.frontier.contains(id)
    }
}

/// Pareto analysis over raw per-criterion performance (higher is better).
pub struct ParetoEngine;

impl ParetoEngine {
    /// Returns true if `x` dominates `y`.
    ///
    /// `x` must be at least as good on every criterion and strictly better
    /// on at least one. Comparisons are exact, which keeps the relation
    /// transitive.
    pub fn dominates(x: &[f64], y: &[f64]) -> bool {
        let mut strictly_better_on_one = false;

        for (a, b) in x.iter().zip(y) {
            if a < b {
                return false;
            }
            if a > b {
                strictly_better_on_one = true;
            }
        }

        strictly_better_on_one
    }

    /// Pearson correlation, or None with fewer than two values or zero variance.
    pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
        let n = xs.len().min(ys.len());
        if n < 2 {
            return None;
        }
        let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
        let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

        let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
        for (x, y) in xs[..n].iter().zip(&ys[..n]) {
            let dx = x - mean_x;
            let dy = y - mean_y;
            cov += dx * dy;
            var_x += dx * dx;
            var_y += dy * dy;
        }

        let denominator = (var_x * var_y).sqrt();
        if denominator <= ZERO_EPS {
            return None;
        }
        Some((cov / denominator).clamp(-1.0, 1.0))
    }

    /// Analyzes alternatives over every criterion any of them is scored on.
    pub fn analyze(
        alternatives: &[AlternativeScore],
        policy: MissingValuePolicy,
    ) -> Result<ParetoAnalysis, HierarchyError> {
        let criteria: Vec<CriterionId> = alternatives
            .iter()
            .flat_map(|a| a.scores_by_criterion.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Self::analyze_criteria(alternatives, &criteria, policy)
    }

    /// Analyzes alternatives over an explicit list of criteria.
    pub fn analyze_criteria(
        alternatives: &[AlternativeScore],
        criteria: &[CriterionId],
        policy: MissingValuePolicy,
    ) -> Result<ParetoAnalysis, HierarchyError> {
        let vectors: Vec<Vec<f64>> = alternatives
            .iter()
            .map(|alt| {
                criteria
                    .iter()
                    .map(|c| alt.score_for(c, policy))
                    .collect::<Result<Vec<f64>, _>>()
            })
            .collect::<Result<_, _>>()?;
        let n = alternatives.len();

        let mut dominated_by = vec![false; n];
        let mut dominates: Vec<BTreeSet<AlternativeId>> = vec![BTreeSet::new(); n];
        for i in 0..n {
            for j in 0..n {
                if i != j && Self::dominates(&vectors[i], &vectors[j]) {
                    dominates[i].insert(alternatives[j].alternative_id.clone());
                    dominated_by[j] = true;
                }
            }
        }

        let frontier_idx: Vec<usize> = (0..n).filter(|&i| !dominated_by[i]).collect();

        let mut skipped = 0;
        let efficiency: Vec<f64> = (0..n)
            .map(|i| {
                if !dominated_by[i] {
                    return 1.0;
                }
                let best = frontier_idx
                    .iter()
                    .map(|&f| Self::ratio_to(&vectors[i], &vectors[f], criteria, &mut skipped))
                    .fold(0.0, f64::max);
                best.clamp(0.0, 1.0)
            })
            .collect();

        let tradeoff_analysis = Self::tradeoffs(alternatives, criteria, &vectors, &frontier_idx);

        let points: Vec<ParetoPoint> = alternatives
            .iter()
            .enumerate()
            .map(|(i, alt)| ParetoPoint {
                alternative_id: alt.alternative_id.clone(),
                criteria_scores: criteria.iter().cloned().zip(vectors[i].iter().copied()).collect(),
                is_dominated: dominated_by[i],
                dominates: std::mem::take(&mut dominates[i]),
                efficiency: efficiency[i],
            })
            .collect();

        let frontier: Vec<AlternativeId> = points
            .iter()
            .filter(|p| !p.is_dominated)
            .map(|p| p.alternative_id.clone())
            .collect();
        let dominated: Vec<AlternativeId> = points
            .iter()
            .filter(|p| p.is_dominated)
            .map(|p| p.alternative_id.clone())
            .collect();
        let efficiency_scores = points
            .iter()
            .map(|p| (p.alternative_id.clone(), p.efficiency))
            .collect();

        debug!(
            alternatives = n,
            criteria = criteria.len(),
            frontier = frontier.len(),
            tradeoffs = tradeoff_analysis.len(),
            skipped_zero_denominators = skipped,
            "pareto analysis complete"
        );

        Ok(ParetoAnalysis {
            criteria: criteria.to_vec(),
            points,
            frontier,
            dominated,
            efficiency_scores,
            tradeoff_analysis,
            skipped_zero_denominators: skipped,
        })
    }

    /// `min_c point[c] / frontier[c]`; a zero frontier value leaves that
    /// criterion unconstrained (ratio 1).
    fn ratio_to(
        point: &[f64],
        frontier: &[f64],
        criteria: &[CriterionId],
        skipped: &mut usize,
    ) -> f64 {
        point
            .iter()
            .zip(frontier)
            .zip(criteria)
            .map(|((p, f), criterion)| {
                if f.abs() <= ZERO_EPS {
                    *skipped += 1;
                    debug!(criterion = %criterion, "division guard skipped zero frontier value");
                    1.0
                } else {
                    p / f
                }
            })
            .fold(f64::INFINITY, f64::min)
    }

    fn tradeoffs(
        alternatives: &[AlternativeScore],
        criteria: &[CriterionId],
        vectors: &[Vec<f64>],
        frontier_idx: &[usize],
    ) -> Vec<TradeoffRecord> {
        if frontier_idx.len() < 2 {
            return Vec::new();
        }
        let frontier_ids: Vec<AlternativeId> = frontier_idx
            .iter()
            .map(|&i| alternatives[i].alternative_id.clone())
            .collect();
        let column = |c: usize| -> Vec<f64> { frontier_idx.iter().map(|&i| vectors[i][c]).collect() };

        let mut records = Vec::new();
        for a in 0..criteria.len() {
            for b in (a + 1)..criteria.len() {
                if let Some(correlation) = Self::pearson(&column(a), &column(b)) {
                    if correlation < TRADEOFF_CORRELATION_THRESHOLD {
                        records.push(TradeoffRecord {
                            criterion_pair: (criteria[a].clone(), criteria[b].clone()),
                            correlation,
                            tradeoff_strength: correlation.abs(),
                            alternatives: frontier_ids.clone(),
                        });
                    }
                }
            }
        }
        records
    }
}
