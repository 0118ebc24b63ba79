//! Criterion Tree - Multi-level criteria hierarchy with local and global weights.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::HierarchyError;
use crate::domain::foundation::CriterionId;

/// A node in the criteria hierarchy.
///
/// `local_weight` is relative to the node's siblings; `global_weight` is
/// relative to the overall goal and is only meaningful after
/// [`HierarchyAggregator::propagate`](super::HierarchyAggregator::propagate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionNode {
    pub id: CriterionId,
    pub parent_id: Option<CriterionId>,
    pub level: usize,
    pub local_weight: f64,
    pub global_weight: f64,
    #[serde(default)]
    pub children: Vec<CriterionNode>,
}

/// Flat storage row describing one criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionRecord {
    pub id: CriterionId,
    pub parent_id: Option<CriterionId>,
    pub local_weight: f64,
}

impl CriterionRecord {
    pub fn new(
        id: impl Into<CriterionId>,
        parent_id: Option<&str>,
        local_weight: f64,
    ) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.map(CriterionId::from),
            local_weight,
        }
    }
}

/// Global weight of a leaf criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafWeight {
    pub criterion_id: CriterionId,
    pub global_weight: f64,
}

impl LeafWeight {
    pub fn new(criterion_id: impl Into<CriterionId>, global_weight: f64) -> Self {
        Self {
            criterion_id: criterion_id.into(),
            global_weight,
        }
    }
}

impl CriterionNode {
    /// Creates the goal node: level 0, local and global weight 1.
    pub fn root(id: impl Into<CriterionId>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            level: 0,
            local_weight: 1.0,
            global_weight: 1.0,
            children: Vec::new(),
        }
    }

    /// Creates a detached node with a local weight; attach it with [`Self::with_child`].
    pub fn new(id: impl Into<CriterionId>, local_weight: f64) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            level: 0,
            local_weight,
            global_weight: 0.0,
            children: Vec::new(),
        }
    }

    /// Attaches a child, fixing its parent link and the levels of its subtree.
    pub fn with_child(mut self, mut child: CriterionNode) -> Self {
        child.parent_id = Some(self.id.clone());
        child.set_level(self.level + 1);
        self.children.push(child);
        self
    }

    fn set_level(&mut self, level: usize) {
        self.level = level;
        for child in &mut self.children {
            child.set_level(level + 1);
        }
    }

    /// Builds a tree from flat records.
    ///
    /// Requires exactly one record without a parent. Children keep the
    /// relative order of their records.
    pub fn from_records(records: &[CriterionRecord]) -> Result<Self, HierarchyError> {
        let mut seen = HashSet::new();
        for record in records {
            if !seen.insert(&record.id) {
                return Err(HierarchyError::DuplicateCriterion(record.id.clone()));
            }
        }

        let roots: Vec<&CriterionRecord> =
            records.iter().filter(|r| r.parent_id.is_none()).collect();
        let root = match roots.as_slice() {
            [] => return Err(HierarchyError::NoRoot),
            [root] => *root,
            many => {
                return Err(HierarchyError::MultipleRoots(
                    many.iter().map(|r| r.id.clone()).collect(),
                ))
            }
        };

        let mut children_of: HashMap<&CriterionId, Vec<&CriterionRecord>> = HashMap::new();
        for record in records {
            if let Some(parent) = &record.parent_id {
                if !seen.contains(parent) {
                    return Err(HierarchyError::UnknownParent {
                        id: record.id.clone(),
                        parent: parent.clone(),
                    });
                }
                children_of.entry(parent).or_default().push(record);
            }
        }

        let mut node = CriterionNode::root(root.id.clone());
        node.local_weight = root.local_weight;
        let mut placed = 1;
        Self::attach_children(&mut node, &children_of, &mut placed);

        if placed != records.len() {
            let mut reachable = HashSet::new();
            node.walk(&mut |n| {
                reachable.insert(n.id.clone());
            });
            return Err(HierarchyError::Unreachable(
                records
                    .iter()
                    .filter(|r| !reachable.contains(&r.id))
                    .map(|r| r.id.clone())
                    .collect(),
            ));
        }

        Ok(node)
    }

    fn attach_children(
        node: &mut CriterionNode,
        children_of: &HashMap<&CriterionId, Vec<&CriterionRecord>>,
        placed: &mut usize,
    ) {
        if let Some(records) = children_of.get(&node.id) {
            for record in records {
                let mut child = CriterionNode::new(record.id.clone(), record.local_weight);
                child.parent_id = Some(node.id.clone());
                child.level = node.level + 1;
                *placed += 1;
                Self::attach_children(&mut child, children_of, placed);
                node.children.push(child);
            }
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Visits this node and every descendant, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a CriterionNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Finds a node by id anywhere in the subtree.
    pub fn find(&self, id: &CriterionId) -> Option<&CriterionNode> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub(crate) fn find_mut(&mut self, id: &CriterionId) -> Option<&mut CriterionNode> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Leaf criteria in depth-first order.
    pub fn leaves(&self) -> Vec<&CriterionNode> {
        let mut leaves = Vec::new();
        self.walk(&mut |node| {
            if node.is_leaf() {
                leaves.push(node);
            }
        });
        leaves
    }

    /// Global weights of the leaf criteria.
    pub fn leaf_weights(&self) -> Vec<LeafWeight> {
        self.leaves()
            .into_iter()
            .map(|leaf| LeafWeight::new(leaf.id.clone(), leaf.global_weight))
            .collect()
    }

    /// Total number of nodes in the subtree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Sum of the children's local weights (0 for a leaf).
    pub fn children_local_sum(&self) -> f64 {
        self.children.iter().map(|c| c.local_weight).sum()
    }
}
