//! End-to-end decision pipeline tests.
//!
//! Runs judgments through priority derivation, hierarchy aggregation,
//! sensitivity sweeps and Pareto analysis using default configuration.

use ahp_core::config::AnalysisConfig;
use ahp_core::domain::ahp::{
    ConsistencyChecker, ConsistencyLevel, EvaluatorJudgments, ExclusionReason, GroupAggregator,
    PairwiseMatrix, PriorityMethod,
};
use ahp_core::domain::analysis::{ImpactLevel, ParetoEngine, SensitivityEngine};
use ahp_core::domain::foundation::{AlternativeId, CriterionId, SaatyScale};
use ahp_core::domain::hierarchy::{
    AlternativeScore, CriterionNode, CriterionRecord, HierarchyAggregator, MissingValuePolicy,
    WeightAdjustment,
};

fn alternatives() -> Vec<AlternativeScore> {
    vec![
        AlternativeScore::new("1").with_score("cost", 0.9).with_score("quality", 0.2),
        AlternativeScore::new("2").with_score("cost", 0.5).with_score("quality", 0.6),
        AlternativeScore::new("3").with_score("cost", 0.3).with_score("quality", 0.8),
    ]
}

fn goal() -> CriterionNode {
    CriterionNode::root("goal")
        .with_child(CriterionNode::new("cost", 0.5))
        .with_child(CriterionNode::new("quality", 0.5))
}

#[test]
fn judgments_to_ranking_to_what_if() {
    let config = AnalysisConfig::default();
    let tolerance = config.priority.tolerance();

    // cost is 1.5 times as important as quality
    let judgments = PairwiseMatrix::with_tolerance(vec![vec![1.0, 1.5], vec![1.0 / 1.5, 1.0]], &tolerance)
        .unwrap();
    let analysis = ConsistencyChecker::analyze(
        &judgments,
        config.priority.method,
        &config.consistency.thresholds(),
    );
    assert_eq!(analysis.consistency.level, ConsistencyLevel::Consistent);
    assert_eq!(analysis.consistency.cr, 0.0);
    assert!(!analysis.priorities.degraded);

    let weighted = HierarchyAggregator::set_child_weights(
        &goal(),
        &CriterionId::from("goal"),
        &analysis.priorities.vector,
    )
    .unwrap();
    HierarchyAggregator::validate_local_weights(&weighted, 1e-9).unwrap();

    let evaluation =
        HierarchyAggregator::evaluate(&weighted, &alternatives(), MissingValuePolicy::Zero).unwrap();
    let totals: Vec<f64> = evaluation.scores.iter().map(|s| s.total_score).collect();
    assert!((totals[0] - 0.62).abs() < 1e-6);
    assert!((totals[1] - 0.54).abs() < 1e-6);
    assert!((totals[2] - 0.50).abs() < 1e-6);
    let ranks: Vec<usize> = evaluation.scores.iter().map(|s| s.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);

    let tornado = SensitivityEngine::analyze_all(
        &evaluation.scores,
        &evaluation.leaf_weights,
        &config.sensitivity.settings(),
        MissingValuePolicy::Zero,
    )
    .unwrap();
    assert_eq!(tornado.len(), 2);
    assert_eq!(tornado[0].criterion_id.as_str(), "cost");
    assert_eq!(tornado[0].samples.len(), 21);
    assert_eq!(tornado[0].overall_impact, ImpactLevel::High);
    assert!(tornado[0].max_impact >= tornado[1].max_impact);

    // The middle sample is the untouched baseline
    let identity = &tornado[0].samples[10];
    assert_eq!(identity.multiplier, 1.0);
    assert!(identity.rank_changes.iter().all(|c| c.rank_delta == 0));
    assert_eq!(identity.stability_index, 1.0);

    let committed = HierarchyAggregator::commit_adjustment(
        &evaluation.hierarchy,
        &WeightAdjustment::new("cost", 0.6, 0.5),
    )
    .unwrap();
    let leaf_total: f64 = committed.leaf_weights().iter().map(|l| l.global_weight).sum();
    assert!((leaf_total - 1.0).abs() < 1e-9);
    let cost = committed.find(&CriterionId::from("cost")).unwrap();
    assert!((cost.global_weight - 0.5).abs() < 1e-9);
}

#[test]
fn pareto_frontier_follows_the_dominance_rule() {
    let analysis = ParetoEngine::analyze(&alternatives(), MissingValuePolicy::Zero).unwrap();

    // Alternative 2 is better than 1 on quality and better than 3 on cost,
    // so nothing dominates it.
    assert_eq!(analysis.frontier.len(), 3);
    assert!(analysis.dominated.is_empty());
    for id in ["1", "2", "3"] {
        assert_eq!(analysis.efficiency_scores[&AlternativeId::from(id)], 1.0);
    }

    assert_eq!(analysis.tradeoff_analysis.len(), 1);
    let tradeoff = &analysis.tradeoff_analysis[0];
    assert_eq!(
        tradeoff.criterion_pair,
        (CriterionId::from("cost"), CriterionId::from("quality"))
    );
    assert!(tradeoff.tradeoff_strength > 0.99);
}

#[test]
fn three_level_hierarchy_from_records() {
    let records = vec![
        CriterionRecord::new("goal", None, 1.0),
        CriterionRecord::new("economics", Some("goal"), 0.7),
        CriterionRecord::new("quality", Some("goal"), 0.3),
        CriterionRecord::new("price", Some("economics"), 0.6),
        CriterionRecord::new("upkeep", Some("economics"), 0.4),
    ];
    let tree = CriterionNode::from_records(&records).unwrap();
    HierarchyAggregator::validate_local_weights(&tree, 1e-9).unwrap();

    let alts = vec![
        AlternativeScore::new("x")
            .with_score("price", 1.0)
            .with_score("upkeep", 0.5)
            .with_score("quality", 0.0),
        AlternativeScore::new("y")
            .with_score("price", 0.0)
            .with_score("upkeep", 0.5)
            .with_score("quality", 1.0),
    ];
    let evaluation = HierarchyAggregator::evaluate(&tree, &alts, MissingValuePolicy::Zero).unwrap();

    let leaves: Vec<(&str, f64)> = evaluation
        .leaf_weights
        .iter()
        .map(|l| (l.criterion_id.as_str(), l.global_weight))
        .collect();
    assert_eq!(leaves.len(), 3);
    assert!((leaves.iter().map(|(_, w)| w).sum::<f64>() - 1.0).abs() < 1e-9);

    // x = 0.42 + 0.14, y = 0.14 + 0.3
    assert!((evaluation.scores[0].total_score - 0.56).abs() < 1e-9);
    assert!((evaluation.scores[1].total_score - 0.44).abs() < 1e-9);
    assert_eq!(evaluation.scores[0].rank, 1);
}

#[test]
fn group_judgments_feed_priority_derivation() {
    let config = AnalysisConfig::default();
    let tolerance = config.priority.tolerance();
    let strong = SaatyScale::Strong.value();

    let judgments = vec![
        EvaluatorJudgments::new("alice", vec![vec![1.0, strong], vec![1.0 / strong, 1.0]]),
        EvaluatorJudgments::new("bob", vec![vec![1.0, 1.0 / strong], vec![strong, 1.0]]),
        EvaluatorJudgments::new("carol", vec![vec![1.0, 2.0], vec![2.0, 1.0]]),
    ];
    let consensus = GroupAggregator::aggregate(&judgments, &tolerance).unwrap();

    assert_eq!(consensus.contributors.len(), 2);
    assert_eq!(consensus.excluded.len(), 1);
    assert_eq!(consensus.excluded[0].evaluator_id.as_str(), "carol");
    assert!(matches!(
        consensus.excluded[0].reason,
        ExclusionReason::InvalidMatrix { .. }
    ));

    // Opposing judgments cancel out to indifference
    assert!((consensus.matrix.get(0, 1).unwrap() - 1.0).abs() < 1e-9);
    let analysis = ConsistencyChecker::analyze(
        &consensus.matrix,
        PriorityMethod::GeometricMean,
        &config.consistency.thresholds(),
    );
    assert!((analysis.priorities.vector.weights()[0] - 0.5).abs() < 1e-9);
}
