//! Analysis Module - Pure domain services for what-if and dominance analysis.
//!
//! # Components
//!
//! - `RankChange` - Ranking movement against a baseline, plus the stability index
//! - `SensitivityEngine` - One-criterion weight sweeps, impact classes, critical thresholds
//! - `ParetoEngine` - Dominance, efficiency frontier, criterion tradeoffs
//!
//! # Design Philosophy
//!
//! All functions are pure (no side effects) and stateless. They take a scored
//! baseline as input and return computed results without mutating it.

mod pareto_engine;
mod rank_change;
mod sensitivity_engine;

pub use pareto_engine::{
    ParetoAnalysis, ParetoEngine, ParetoPoint, TradeoffRecord, TRADEOFF_CORRELATION_THRESHOLD,
};
pub use rank_change::{stability_index, RankChange};
pub use sensitivity_engine::{
    AlternativeSensitivity, ExtendedSensitivityResult, ImpactLevel, RankStability,
    SensitivityEngine, SensitivityError, SensitivitySettings, SweepSample, CRITICAL_SCORE_DELTA,
    HIGH_IMPACT, MEDIUM_IMPACT, MODERATE_IMPACT, STABLE_IMPACT, THRESHOLD_SEARCH_WIDTH,
};
