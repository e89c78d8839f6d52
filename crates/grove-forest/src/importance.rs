//! Feature-usage importance aggregation across trees.

use crate::node::Node;
use crate::tree::DecisionTree;

/// A ranked attribute with its split-usage count across a forest.
#[derive(Debug, Clone)]
pub struct RankedFeature {
    /// Attribute name.
    pub name: String,
    /// Number of split nodes, across all trees, that split on this attribute.
    pub usage_count: usize,
    /// 1-based rank (1 = most used).
    pub rank: usize,
}

/// Count split-attribute usage over every tree and rank the attributes.
///
/// Trees are walked in forest order; each arena is stored in pre-order, so a
/// linear scan visits parents before children. The sort is stable: equal
/// counts keep first-encountered traversal order.
pub(crate) fn aggregate_usage(trees: &[DecisionTree]) -> Vec<RankedFeature> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for tree in trees {
        for node in tree.nodes() {
            if let Node::Split { attribute, .. } = node {
                match counts.iter_mut().find(|(name, _)| name == attribute) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((attribute.clone(), 1)),
                }
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .enumerate()
        .map(|(i, (name, usage_count))| RankedFeature {
            name,
            usage_count,
            rank: i + 1,
        })
        .collect()
}
