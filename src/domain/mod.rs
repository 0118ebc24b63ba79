//! Domain layer containing the decision analysis logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, Saaty scale, tolerances, errors)
//! - `ahp` - Pairwise matrices, priority derivation, consistency, group consensus
//! - `hierarchy` - Criteria trees, global weights, alternative scoring and ranking
//! - `analysis` - Sensitivity sweeps and Pareto dominance

pub mod ahp;
pub mod analysis;
pub mod foundation;
pub mod hierarchy;
