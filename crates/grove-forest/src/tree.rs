//! ID3 decision-tree induction and classification.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::{
    ForestError,
    dataset::{Dataset, Example},
    gain::best_attribute,
    node::{Node, NodeIndex},
};

/// Configuration for inducing a single ID3 decision tree.
///
/// Construct via [`DecisionTreeConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter      | Default                  |
/// |----------------|--------------------------|
/// | `max_features` | `None` (all attributes)  |
/// | `seed`         | 42                       |
#[derive(Debug, Clone)]
pub struct DecisionTreeConfig {
    max_features: Option<usize>,
    seed: u64,
}

impl DecisionTreeConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_features: None,
            seed: 42,
        }
    }

    /// Set the number of attributes considered at each split.
    ///
    /// `None` means every remaining attribute is a candidate; a cap larger
    /// than the remaining attribute count behaves like `None`.
    #[must_use]
    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.max_features = max_features;
        self
    }

    /// Set the random seed for candidate-attribute subsampling.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Return the per-split candidate cap, if set.
    #[must_use]
    pub fn max_features(&self) -> Option<usize> {
        self.max_features
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Induce a decision tree from the dataset with the ID3 algorithm.
    ///
    /// Splits greedily on the candidate attribute with the highest
    /// information gain until a partition is pure or no attributes remain,
    /// in which case the leaf holds the partition's majority target.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`ForestError::EmptyDataset`] | `dataset` has no examples |
    /// | [`ForestError::InvalidMaxFeatures`] | the candidate cap is `Some(0)` |
    #[instrument(skip(self, dataset), fields(n_examples = dataset.len()))]
    pub fn fit(&self, dataset: &Dataset) -> Result<DecisionTree, ForestError> {
        if dataset.is_empty() {
            return Err(ForestError::EmptyDataset);
        }
        if self.max_features == Some(0) {
            return Err(ForestError::InvalidMaxFeatures { max_features: 0 });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut arena: Vec<Node> = Vec::new();
        let root = build_tree(dataset, self.max_features, &mut rng, &mut arena);

        debug!(
            root_index = root.index(),
            n_nodes = arena.len(),
            "decision tree built"
        );

        Ok(DecisionTree { nodes: arena })
    }
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursively build the arena-backed tree.
///
/// Returns the [`NodeIndex`] of the node just created in `arena`. Children
/// are pushed directly after their parent in child-key order, so a linear
/// scan of the arena is a pre-order traversal.
fn build_tree(
    dataset: &Dataset,
    max_features: Option<usize>,
    rng: &mut impl Rng,
    arena: &mut Vec<Node>,
) -> NodeIndex {
    fn push(arena: &mut Vec<Node>, node: Node) -> NodeIndex {
        let index = arena.len();
        arena.push(node);
        NodeIndex::new(index)
    }

    // Pure partition.
    if let [single] = dataset.target_values().as_slice() {
        return push(
            arena,
            Node::Leaf {
                target: (*single).to_string(),
            },
        );
    }

    let majority = dataset
        .majority_target()
        .expect("fit rejects empty datasets and partitions are never empty")
        .to_string();

    // Attributes exhausted; the leaf may legitimately be impure.
    let Some(attribute) = best_attribute(dataset, max_features, rng) else {
        return push(arena, Node::Leaf { target: majority });
    };

    // Reserve the split's slot so children land right after it, then
    // overwrite once the children exist.
    let node_index = push(
        arena,
        Node::Leaf {
            target: majority.clone(),
        },
    );

    let values: Vec<String> = dataset
        .attribute_values(&attribute)
        .into_iter()
        .map(String::from)
        .collect();
    let mut children = Vec::with_capacity(values.len());
    for value in values {
        // A value with no matching examples gets the parent's majority.
        let child = if dataset.count_matching(None, Some((attribute.as_str(), value.as_str()))) == 0
        {
            push(
                arena,
                Node::Leaf {
                    target: majority.clone(),
                },
            )
        } else {
            build_tree(
                &dataset.partition(&attribute, &value),
                max_features,
                rng,
                arena,
            )
        };
        children.push((value, child));
    }

    arena[node_index.index()] = Node::Split {
        attribute,
        children,
    };
    node_index
}

/// A fitted ID3 decision tree.
///
/// Stored as a pre-order `Vec<Node>` arena with index references. Immutable
/// once induced; classification never locks.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    pub(crate) nodes: Vec<Node>,
}

impl DecisionTree {
    /// Classify a single example.
    ///
    /// Walks from the root; at each split the example's value for the split
    /// attribute selects the child with the exactly-equal key. Returns `None`
    /// when the example carries a value never observed during induction:
    /// a reportable outcome, not an error.
    #[must_use]
    pub fn classify(&self, example: &Example) -> Option<&str> {
        let mut index = 0usize;
        loop {
            match &self.nodes[index] {
                Node::Leaf { target } => return Some(target),
                Node::Split {
                    attribute,
                    children,
                } => {
                    let value = example.attribute_value(attribute)?;
                    let (_, child) = children.iter().find(|(key, _)| key.as_str() == value)?;
                    index = child.index();
                }
            }
        }
    }

    /// Borrow the arena nodes in pre-order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return the total number of nodes (both splits and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of split nodes.
    #[must_use]
    pub fn n_splits(&self) -> usize {
        self.nodes.iter().filter(|n| !n.is_leaf()).count()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return the maximum depth of the tree.
    ///
    /// A single-leaf tree has depth 0. Uses an iterative BFS approach.
    #[must_use]
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }

        let mut max_depth = 0usize;
        let mut queue = std::collections::VecDeque::new();
        queue.push_back((0usize, 0usize));

        while let Some((index, d)) = queue.pop_front() {
            match &self.nodes[index] {
                Node::Leaf { .. } => {
                    if d > max_depth {
                        max_depth = d;
                    }
                }
                Node::Split { children, .. } => {
                    for (_, child) in children {
                        queue.push_back((child.index(), d + 1));
                    }
                }
            }
        }

        max_depth
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn make_dataset(attributes: &[&str], target: &str, rows: &[(&[&str], &str)]) -> Dataset {
        let examples = rows
            .iter()
            .map(|(values, target_value)| {
                let attrs = attributes
                    .iter()
                    .zip(values.iter())
                    .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
                    .collect();
                Example::new(attrs, (*target_value).to_string())
            })
            .collect();
        Dataset::new(
            attributes.iter().map(|s| (*s).to_string()).collect(),
            target.to_string(),
            examples,
        )
        .unwrap()
    }

    fn weather_dataset() -> Dataset {
        make_dataset(
            &["weather", "temp"],
            "play",
            &[
                (&["sunny", "hot"], "yes"),
                (&["sunny", "hot"], "yes"),
                (&["rainy", "cool"], "no"),
                (&["rainy", "cool"], "no"),
            ],
        )
    }

    fn probe(values: &[(&str, &str)]) -> Example {
        let attrs: HashMap<String, String> = values
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect();
        Example::new(attrs, String::new())
    }

    #[test]
    fn pure_dataset_single_leaf() {
        let ds = make_dataset(
            &["x", "y"],
            "label",
            &[(&["1", "2"], "a"), (&["3", "4"], "a"), (&["5", "6"], "a")],
        );
        let tree = DecisionTreeConfig::new().fit(&ds).unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.n_leaves(), 1);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.classify(&probe(&[("x", "9"), ("y", "9")])), Some("a"));
    }

    #[test]
    fn zero_attributes_majority_leaf() {
        let ds = make_dataset(
            &[],
            "label",
            &[(&[], "a"), (&[], "a"), (&[], "a"), (&[], "b")],
        );
        let tree = DecisionTreeConfig::new().fit(&ds).unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.classify(&probe(&[])), Some("a"));
    }

    #[test]
    fn weather_table_splits_on_weather() {
        let tree = DecisionTreeConfig::new().fit(&weather_dataset()).unwrap();
        let Node::Split {
            attribute,
            children,
        } = &tree.nodes()[0]
        else {
            panic!("root should be a split");
        };
        assert_eq!(attribute, "weather");
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].0, "sunny");
        assert_eq!(children[1].0, "rainy");
        assert!(tree.nodes()[children[0].1.index()].is_leaf());
        assert!(tree.nodes()[children[1].1.index()].is_leaf());
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn fits_training_set_exactly() {
        let ds = make_dataset(
            &["weather", "temp", "wind"],
            "play",
            &[
                (&["sunny", "hot", "weak"], "yes"),
                (&["sunny", "cool", "strong"], "no"),
                (&["rainy", "hot", "weak"], "no"),
                (&["rainy", "cool", "weak"], "yes"),
                (&["overcast", "hot", "strong"], "yes"),
                (&["overcast", "cool", "weak"], "no"),
            ],
        );
        let tree = DecisionTreeConfig::new().fit(&ds).unwrap();
        for example in ds.examples() {
            assert_eq!(tree.classify(example), Some(example.target()));
        }
    }

    #[test]
    fn fits_training_set_with_single_candidate_cap() {
        let ds = make_dataset(
            &["weather", "temp"],
            "play",
            &[
                (&["sunny", "hot"], "yes"),
                (&["sunny", "cool"], "no"),
                (&["rainy", "hot"], "no"),
                (&["rainy", "cool"], "yes"),
            ],
        );
        let tree = DecisionTreeConfig::new()
            .with_max_features(Some(1))
            .with_seed(7)
            .fit(&ds)
            .unwrap();
        for example in ds.examples() {
            assert_eq!(tree.classify(example), Some(example.target()));
        }
    }

    #[test]
    fn unseen_value_is_unrouted() {
        let tree = DecisionTreeConfig::new().fit(&weather_dataset()).unwrap();
        let example = probe(&[("weather", "foggy"), ("temp", "hot")]);
        assert_eq!(tree.classify(&example), None);
    }

    #[test]
    fn missing_attribute_is_unrouted() {
        let tree = DecisionTreeConfig::new().fit(&weather_dataset()).unwrap();
        assert_eq!(tree.classify(&probe(&[("temp", "hot")])), None);
    }

    #[test]
    fn empty_dataset_error() {
        let ds = make_dataset(&["x"], "label", &[]);
        let err = DecisionTreeConfig::new().fit(&ds).unwrap_err();
        assert!(matches!(err, ForestError::EmptyDataset));
    }

    #[test]
    fn zero_max_features_error() {
        let err = DecisionTreeConfig::new()
            .with_max_features(Some(0))
            .fit(&weather_dataset())
            .unwrap_err();
        assert!(matches!(
            err,
            ForestError::InvalidMaxFeatures { max_features: 0 }
        ));
    }

    #[test]
    fn deterministic_with_same_seed() {
        let ds = make_dataset(
            &["a", "b", "c"],
            "label",
            &[
                (&["1", "1", "2"], "x"),
                (&["1", "2", "1"], "y"),
                (&["2", "1", "1"], "x"),
                (&["2", "2", "2"], "y"),
            ],
        );
        let tree1 = DecisionTreeConfig::new()
            .with_max_features(Some(1))
            .with_seed(123)
            .fit(&ds)
            .unwrap();
        let tree2 = DecisionTreeConfig::new()
            .with_max_features(Some(1))
            .with_seed(123)
            .fit(&ds)
            .unwrap();
        assert_eq!(tree1.n_nodes(), tree2.n_nodes());
        for example in ds.examples() {
            assert_eq!(tree1.classify(example), tree2.classify(example));
        }
    }

    #[test]
    fn split_and_leaf_counts_add_up() {
        let tree = DecisionTreeConfig::new().fit(&weather_dataset()).unwrap();
        assert_eq!(tree.n_splits() + tree.n_leaves(), tree.n_nodes());
        assert_eq!(tree.n_splits(), 1);
        assert_eq!(tree.n_leaves(), 2);
    }
}
