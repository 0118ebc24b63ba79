//! AHP Core - Analytic Hierarchy Process decision analysis
//!
//! This crate derives criterion priorities from pairwise comparison matrices,
//! checks their consistency, aggregates them through a criteria hierarchy to
//! rank alternatives, and analyzes the ranking for weight sensitivity and
//! Pareto dominance.

pub mod config;
pub mod domain;
