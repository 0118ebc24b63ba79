//! Hierarchy Aggregator - Global weight propagation and alternative scoring.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    assign_ranks, AlternativeScore, CriterionNode, HierarchyError, LeafWeight,
    MissingValuePolicy, WeightAdjustment,
};
use crate::domain::ahp::PriorityVector;
use crate::domain::foundation::{CriterionId, ZERO_EPS};

/// A weighted hierarchy together with the ranking it produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyEvaluation {
    pub hierarchy: CriterionNode,
    pub leaf_weights: Vec<LeafWeight>,
    /// Scored alternatives in input order, each carrying its rank.
    pub scores: Vec<AlternativeScore>,
}

/// Weight propagation and scoring over a criteria hierarchy.
///
/// Every operation recomputes the full tree and the full ranking from the
/// snapshot it is given; nothing is updated incrementally.
pub struct HierarchyAggregator;

impl HierarchyAggregator {
    /// Returns a copy of the tree with global weights filled in top-down.
    ///
    /// `global(root) = 1`, `global(node) = local(node) * global(parent)`.
    pub fn propagate(root: &CriterionNode) -> CriterionNode {
        let mut tree = root.clone();
        tree.global_weight = 1.0;
        Self::propagate_children(&mut tree);
        tree
    }

    fn propagate_children(node: &mut CriterionNode) {
        let parent_global = node.global_weight;
        for child in &mut node.children {
            child.global_weight = child.local_weight * parent_global;
            Self::propagate_children(child);
        }
    }

    /// Checks that every parent's children have local weights summing to 1.
    pub fn validate_local_weights(
        root: &CriterionNode,
        tolerance: f64,
    ) -> Result<(), HierarchyError> {
        let mut failure = None;
        root.walk(&mut |node| {
            if failure.is_some() || node.is_leaf() {
                return;
            }
            let sum = node.children_local_sum();
            if (sum - 1.0).abs() > tolerance {
                failure = Some(HierarchyError::ChildWeightsNotNormalized {
                    parent: node.id.clone(),
                    sum,
                });
            }
        });
        failure.map_or(Ok(()), Err)
    }

    /// Assigns a priority vector to a node's children, in child order, and
    /// recomputes global weights.
    pub fn set_child_weights(
        root: &CriterionNode,
        parent_id: &CriterionId,
        weights: &PriorityVector,
    ) -> Result<CriterionNode, HierarchyError> {
        let mut tree = root.clone();
        let parent = tree
            .find_mut(parent_id)
            .ok_or_else(|| HierarchyError::CriterionNotFound(parent_id.clone()))?;

        if parent.children.len() != weights.len() {
            return Err(HierarchyError::ChildCountMismatch {
                parent: parent_id.clone(),
                expected: weights.len(),
                actual: parent.children.len(),
            });
        }
        for (child, &weight) in parent.children.iter_mut().zip(weights.weights()) {
            child.local_weight = weight;
        }

        Ok(Self::propagate(&tree))
    }

    /// Computes each alternative's total score over the leaf criteria and
    /// ranks them.
    ///
    /// `total = sum_c global(c) * score[c]`. Returns the alternatives in input
    /// order with `total_score` and `rank` filled in.
    pub fn score_alternatives(
        leaf_weights: &[LeafWeight],
        alternatives: &[AlternativeScore],
        policy: MissingValuePolicy,
    ) -> Result<Vec<AlternativeScore>, HierarchyError> {
        let mut scored = Vec::with_capacity(alternatives.len());
        for alternative in alternatives {
            let mut total = 0.0;
            for leaf in leaf_weights {
                total += leaf.global_weight * alternative.score_for(&leaf.criterion_id, policy)?;
            }
            let mut result = alternative.clone();
            result.total_score = total;
            scored.push(result);
        }

        assign_ranks(&mut scored);
        Ok(scored)
    }

    /// Propagates weights and scores the alternatives in one pass.
    pub fn evaluate(
        root: &CriterionNode,
        alternatives: &[AlternativeScore],
        policy: MissingValuePolicy,
    ) -> Result<HierarchyEvaluation, HierarchyError> {
        let hierarchy = Self::propagate(root);
        let leaf_weights = hierarchy.leaf_weights();
        let scores = Self::score_alternatives(&leaf_weights, alternatives, policy)?;

        debug!(
            criteria = hierarchy.node_count(),
            leaves = leaf_weights.len(),
            alternatives = scores.len(),
            "evaluated hierarchy"
        );

        Ok(HierarchyEvaluation {
            hierarchy,
            leaf_weights,
            scores,
        })
    }

    /// Commits a what-if weight as canonical.
    ///
    /// Sets the criterion's local weight so that its global weight equals
    /// `new_weight` (capped at the parent's global weight), rescales its
    /// siblings proportionally so they again sum to 1, and recomputes all
    /// global weights. An only child always keeps local weight 1.
    pub fn commit_adjustment(
        root: &CriterionNode,
        adjustment: &WeightAdjustment,
    ) -> Result<CriterionNode, HierarchyError> {
        let target = &adjustment.criterion_id;
        let new_weight = adjustment.new_weight;
        if !(new_weight.is_finite() && (0.0..=1.0).contains(&new_weight)) {
            return Err(HierarchyError::InvalidWeight {
                criterion: target.clone(),
                weight: new_weight,
            });
        }

        let mut tree = Self::propagate(root);
        let parent_id = tree
            .find(target)
            .ok_or_else(|| HierarchyError::CriterionNotFound(target.clone()))?
            .parent_id
            .clone()
            .ok_or_else(|| HierarchyError::CannotAdjustRoot(target.clone()))?;
        let parent = tree
            .find_mut(&parent_id)
            .ok_or_else(|| HierarchyError::CriterionNotFound(parent_id.clone()))?;

        if parent.children.len() == 1 {
            parent.children[0].local_weight = 1.0;
            return Ok(Self::propagate(&tree));
        }

        let new_local = if parent.global_weight > ZERO_EPS {
            (new_weight / parent.global_weight).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let siblings_sum: f64 = parent
            .children
            .iter()
            .filter(|c| &c.id != target)
            .map(|c| c.local_weight)
            .sum();
        let remaining = 1.0 - new_local;
        let sibling_count = (parent.children.len() - 1) as f64;

        for child in &mut parent.children {
            if &child.id == target {
                child.local_weight = new_local;
            } else if siblings_sum > ZERO_EPS {
                child.local_weight *= remaining / siblings_sum;
            } else {
                child.local_weight = remaining / sibling_count;
            }
        }

        debug!(
            criterion = %target,
            original = adjustment.original_weight,
            new_weight,
            new_local,
            "committed weight adjustment"
        );

        Ok(Self::propagate(&tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hierarchy::CriterionRecord;
    use proptest::prelude::*;

    fn hierarchy() -> CriterionNode {
        CriterionNode::from_records(&[
            CriterionRecord::new("goal", None, 1.0),
            CriterionRecord::new("cost", Some("goal"), 0.6),
            CriterionRecord::new("quality", Some("goal"), 0.4),
            CriterionRecord::new("capex", Some("cost"), 0.75),
            CriterionRecord::new("opex", Some("cost"), 0.25),
        ])
        .unwrap()
    }

    fn alternatives() -> Vec<AlternativeScore> {
        vec![
            AlternativeScore::new("a")
                .with_score("capex", 1.0)
                .with_score("opex", 0.0)
                .with_score("quality", 0.5),
            AlternativeScore::new("b")
                .with_score("capex", 0.2)
                .with_score("opex", 1.0)
                .with_score("quality", 1.0),
        ]
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn propagate_multiplies_down_the_tree() {
        let tree = HierarchyAggregator::propagate(&hierarchy());
        assert_eq!(tree.global_weight, 1.0);
        assert!(close(tree.find(&"capex".into()).unwrap().global_weight, 0.45));
        assert!(close(tree.find(&"opex".into()).unwrap().global_weight, 0.15));
        assert!(close(tree.find(&"quality".into()).unwrap().global_weight, 0.4));
    }

    #[test]
    fn score_alternatives_weights_leaves() {
        let evaluation =
            HierarchyAggregator::evaluate(&hierarchy(), &alternatives(), MissingValuePolicy::Zero)
                .unwrap();
        let a = &evaluation.scores[0];
        let b = &evaluation.scores[1];
        // a: 0.45 * 1 + 0.15 * 0 + 0.4 * 0.5 = 0.65
        assert!(close(a.total_score, 0.65));
        // b: 0.45 * 0.2 + 0.15 * 1 + 0.4 * 1 = 0.64
        assert!(close(b.total_score, 0.64));
        assert_eq!(a.rank, 1);
        assert_eq!(b.rank, 2);
    }

    #[test]
    fn equal_totals_keep_input_order_despite_round_off() {
        let leaves = vec![
            LeafWeight::new("x", 0.1),
            LeafWeight::new("y", 0.2),
            LeafWeight::new("z", 0.3),
            LeafWeight::new("w", 0.4),
        ];
        let alts = vec![
            AlternativeScore::new("b").with_score("z", 1.0),
            AlternativeScore::new("a").with_score("x", 1.0).with_score("y", 1.0),
        ];

        let scored =
            HierarchyAggregator::score_alternatives(&leaves, &alts, MissingValuePolicy::Zero)
                .unwrap();
        assert!(scored[1].total_score > scored[0].total_score);
        assert_eq!(scored[0].rank, 1);
        assert_eq!(scored[1].rank, 2);
    }

    #[test]
    fn score_alternatives_rejects_missing_when_asked() {
        let alts = vec![AlternativeScore::new("c").with_score("capex", 1.0)];
        let err =
            HierarchyAggregator::evaluate(&hierarchy(), &alts, MissingValuePolicy::Reject).unwrap_err();
        assert!(matches!(err, HierarchyError::MissingScore { .. }));
    }

    #[test]
    fn validate_local_weights_reports_parent() {
        assert!(HierarchyAggregator::validate_local_weights(&hierarchy(), 1e-6).is_ok());

        let mut broken = hierarchy();
        broken.find_mut(&"opex".into()).unwrap().local_weight = 0.5;
        match HierarchyAggregator::validate_local_weights(&broken, 1e-6) {
            Err(HierarchyError::ChildWeightsNotNormalized { parent, sum }) => {
                assert_eq!(parent.as_str(), "cost");
                assert!(close(sum, 1.25));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn set_child_weights_assigns_in_order() {
        let weights = PriorityVector::from_weights(vec![0.2, 0.8]).unwrap();
        let tree =
            HierarchyAggregator::set_child_weights(&hierarchy(), &"goal".into(), &weights).unwrap();
        assert!(close(tree.find(&"cost".into()).unwrap().global_weight, 0.2));
        assert!(close(tree.find(&"capex".into()).unwrap().global_weight, 0.15));

        let three = PriorityVector::from_weights(vec![0.2, 0.3, 0.5]).unwrap();
        assert!(matches!(
            HierarchyAggregator::set_child_weights(&hierarchy(), &"goal".into(), &three),
            Err(HierarchyError::ChildCountMismatch { .. })
        ));
    }

    #[test]
    fn commit_adjustment_renormalizes_siblings() {
        let adjustment = WeightAdjustment::new("quality", 0.4, 0.5);
        let tree = HierarchyAggregator::commit_adjustment(&hierarchy(), &adjustment).unwrap();

        assert!(close(tree.find(&"quality".into()).unwrap().global_weight, 0.5));
        assert!(close(tree.find(&"cost".into()).unwrap().global_weight, 0.5));
        assert!(HierarchyAggregator::validate_local_weights(&tree, 1e-9).is_ok());
        let leaf_sum: f64 = tree.leaf_weights().iter().map(|l| l.global_weight).sum();
        assert!(close(leaf_sum, 1.0));
    }

    #[test]
    fn commit_adjustment_on_nested_leaf_caps_at_parent() {
        let adjustment = WeightAdjustment::new("opex", 0.15, 0.9);
        let tree = HierarchyAggregator::commit_adjustment(&hierarchy(), &adjustment).unwrap();
        assert!(close(tree.find(&"opex".into()).unwrap().global_weight, 0.6));
        assert!(close(tree.find(&"capex".into()).unwrap().global_weight, 0.0));
    }

    #[test]
    fn commit_adjustment_rejects_root_and_unknown() {
        assert!(matches!(
            HierarchyAggregator::commit_adjustment(
                &hierarchy(),
                &WeightAdjustment::new("goal", 1.0, 0.5)
            ),
            Err(HierarchyError::CannotAdjustRoot(_))
        ));
        assert!(matches!(
            HierarchyAggregator::commit_adjustment(
                &hierarchy(),
                &WeightAdjustment::new("nope", 0.1, 0.5)
            ),
            Err(HierarchyError::CriterionNotFound(_))
        ));
        assert!(matches!(
            HierarchyAggregator::commit_adjustment(
                &hierarchy(),
                &WeightAdjustment::new("cost", 0.6, 1.5)
            ),
            Err(HierarchyError::InvalidWeight { .. })
        ));
    }

    /// Random tree: each node gets up to three children with normalized
    /// local weights, three levels deep.
    fn random_tree() -> impl Strategy<Value = CriterionNode> {
        prop::collection::vec(prop::collection::vec(0.01f64..1.0, 1..4), 1..4).prop_map(|groups| {
            let mut root = CriterionNode::root("goal");
            for (g, raw) in groups.iter().enumerate() {
                let total: f64 = raw.iter().sum();
                let mut mid = CriterionNode::new(format!("c{}", g), 0.0);
                for (i, w) in raw.iter().enumerate() {
                    mid = mid.with_child(CriterionNode::new(format!("c{}_{}", g, i), w / total));
                }
                root = root.with_child(mid);
            }
            let n = root.children.len() as f64;
            for child in &mut root.children {
                child.local_weight = 1.0 / n;
            }
            root
        })
    }

    proptest! {
        #[test]
        fn global_weights_conserve_parent_mass(tree in random_tree()) {
            let tree = HierarchyAggregator::propagate(&tree);
            prop_assert_eq!(tree.global_weight, 1.0);

            let mut violations = Vec::new();
            tree.walk(&mut |node| {
                if node.is_leaf() {
                    return;
                }
                let child_sum: f64 = node.children.iter().map(|c| c.global_weight).sum();
                if (child_sum - node.global_weight).abs() > 1e-9 {
                    violations.push(node.id.clone());
                }
            });
            prop_assert!(violations.is_empty(), "violations: {:?}", violations);

            let leaf_sum: f64 = tree.leaf_weights().iter().map(|l| l.global_weight).sum();
            prop_assert!((leaf_sum - 1.0).abs() < 1e-9);
        }
    }
}
