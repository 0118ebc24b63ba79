//! AHP Module - Pairwise judgments to priority weights.
//!
//! # Components
//!
//! - `PairwiseMatrix` / `MatrixValidator` - Square, positive, reciprocal matrices
//! - `PriorityDeriver` - Eigenvector and geometric-mean priority vectors
//! - `ConsistencyChecker` - Consistency index / ratio and judgment revision hints
//! - `GroupAggregator` - Geometric-mean consensus over several evaluators
//!
//! All functions are pure and stateless; a new result is produced for every
//! input rather than mutating anything in place.

mod consistency_checker;
mod group_aggregator;
mod pairwise_matrix;
mod priority_deriver;

pub use consistency_checker::{
    random_index, ComparisonAnalysis, ConsistencyChecker, ConsistencyIssue, ConsistencyLevel,
    ConsistencyMetrics, ConsistencyThresholds, JudgmentRevision, RANDOM_INDEX,
};
pub use group_aggregator::{
    EvaluatorJudgments, ExcludedEvaluator, ExclusionReason, GroupAggregationError,
    GroupAggregator, GroupConsensus,
};
pub use pairwise_matrix::{
    MatrixError, MatrixErrorKind, MatrixValidator, PairwiseMatrix, PairwiseMatrixBuilder,
};
pub use priority_deriver::{
    PriorityDeriver, PriorityMethod, PriorityResult, PriorityVector, MAX_POWER_ITERATIONS,
    POWER_CONVERGENCE_EPS,
};
