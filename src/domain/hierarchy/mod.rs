//! Hierarchy Module - Criteria trees, global weights, and alternative ranking.
//!
//! # Components
//!
//! - `CriterionNode` - Criteria tree with local and global weights
//! - `AlternativeScore` - Per-criterion performance, total score, rank
//! - `HierarchyAggregator` - Top-down weight propagation, scoring, committing adjustments
//! - `WeightAdjustment` - What-if override of a single criterion weight

mod alternative_score;
mod criterion_tree;
mod errors;
mod hierarchy_aggregator;
mod weight_adjustment;

pub use alternative_score::{
    assign_ranks, rank_positions, sorted_by_rank, AlternativeScore, MissingValuePolicy,
    RANK_RESOLUTION,
};
pub use criterion_tree::{CriterionNode, CriterionRecord, LeafWeight};
pub use errors::HierarchyError;
pub use hierarchy_aggregator::{HierarchyAggregator, HierarchyEvaluation};
pub use weight_adjustment::WeightAdjustment;
