//! Random-forest training with parallel tree construction and majority-vote
//! classification.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, instrument};

use crate::{
    ForestError,
    dataset::{Dataset, Example},
    importance::{RankedFeature, aggregate_usage},
    tree::{DecisionTree, DecisionTreeConfig},
};

/// Configuration for random-forest training.
///
/// Construct via [`RandomForestConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter      | Default                  |
/// |----------------|--------------------------|
/// | `max_features` | `None` (all attributes)  |
/// | `seed`         | 42                       |
#[derive(Debug, Clone)]
pub struct RandomForestConfig {
    n_trees: usize,
    max_features: Option<usize>,
    seed: u64,
}

impl RandomForestConfig {
    /// Create a new config with the given number of trees.
    ///
    /// # Errors
    ///
    /// Returns [`ForestError::InvalidTreeCount`] if `n_trees` is zero.
    pub fn new(n_trees: usize) -> Result<Self, ForestError> {
        if n_trees == 0 {
            return Err(ForestError::InvalidTreeCount { n_trees });
        }
        Ok(Self {
            n_trees,
            max_features: None,
            seed: 42,
        })
    }

    /// Set the number of attributes considered at each split.
    #[must_use]
    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.max_features = max_features;
        self
    }

    /// Set the random seed for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Return the number of trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.n_trees
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

    /// Train the ensemble.
    ///
    /// Each tree is induced from an independent bootstrap resample of
    /// `dataset` (same size, drawn with replacement) with `max_features` as
    /// the per-split candidate cap. Trees are built in parallel; every tree
    /// derives its own ChaCha8 seed from the config seed, so results do not
    /// depend on thread scheduling.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`ForestError::EmptyDataset`] | `dataset` has no examples |
    /// | [`ForestError::InvalidMaxFeatures`] | the candidate cap is `Some(0)` |
    #[instrument(skip(self, dataset), fields(n_trees = self.n_trees, n_examples = dataset.len()))]
    pub fn fit(&self, dataset: &Dataset) -> Result<RandomForest, ForestError> {
        if dataset.is_empty() {
            return Err(ForestError::EmptyDataset);
        }
        if self.max_features == Some(0) {
            return Err(ForestError::InvalidMaxFeatures { max_features: 0 });
        }

        let n_examples = dataset.len();
        info!(
            n_trees = self.n_trees,
            n_examples,
            n_attributes = dataset.attribute_names().len(),
            max_features = ?self.max_features,
            "training random forest"
        );

        // Generate per-tree seeds from the master RNG.
        let mut master_rng = ChaCha8Rng::seed_from_u64(self.seed);
        let tree_seeds: Vec<u64> = (0..self.n_trees).map(|_| master_rng.r#gen()).collect();

        let max_features = self.max_features;
        let trees: Vec<DecisionTree> = tree_seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let indices = bootstrap_sample(n_examples, &mut rng);
                let resample = dataset.subset(&indices);

                // The resample is non-empty and the cap was checked above.
                DecisionTreeConfig::new()
                    .with_max_features(max_features)
                    .with_seed(rng.r#gen())
                    .fit(&resample)
                    .expect("tree fit cannot fail on a validated resample")
            })
            .collect();

        debug!(n_trees_trained = trees.len(), "tree training complete");

        Ok(RandomForest { trees })
    }
}

/// Draw a bootstrap sample: `n` indices in `[0, n)`, each drawn independently
/// and uniformly, with replacement.
fn bootstrap_sample(n: usize, rng: &mut impl Rng) -> Vec<usize> {
    (0..n).map(|_| rng.gen_range(0..n)).collect()
}

/// A fitted random-forest ensemble: independently trained trees in training
/// order. Never mutated after training completes.
#[derive(Debug, Clone)]
pub struct RandomForest {
    pub(crate) trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Classify one example by majority vote.
    ///
    /// Unrouted trees abstain. Tallies accumulate in forest order and a
    /// strictly greater count is required to displace the running winner, so
    /// ties keep the earliest-voted value. Returns `None` when every tree is
    /// unrouted; callers must surface that, not hide it.
    #[must_use]
    pub fn classify(&self, example: &Example) -> Option<String> {
        let mut tallies: Vec<(&str, usize)> = Vec::new();
        for tree in &self.trees {
            if let Some(vote) = tree.classify(example) {
                match tallies.iter_mut().find(|(value, _)| *value == vote) {
                    Some((_, count)) => *count += 1,
                    None => tallies.push((vote, 1)),
                }
            }
        }
        let mut best: Option<(&str, usize)> = None;
        for (value, count) in tallies {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((value, count));
            }
        }
        best.map(|(value, _)| value.to_string())
    }

    /// Classify every example of `dataset` in parallel.
    ///
    /// The forest is read-only during classification, so examples are
    /// processed concurrently without locking. Predictions are returned in
    /// dataset order.
    #[must_use]
    pub fn classify_batch(&self, dataset: &Dataset) -> Vec<Option<String>> {
        dataset
            .examples()
            .into_par_iter()
            .map(|example| self.classify(example))
            .collect()
    }

    /// Rank attributes by how often the forest splits on them.
    ///
    /// Usage counts sum to the total number of split nodes across all trees.
    #[must_use]
    pub fn feature_importances(&self) -> Vec<RankedFeature> {
        aggregate_usage(&self.trees)
    }

    /// Return the number of trees in the ensemble.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Borrow the trees in training order.
    #[must_use]
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }
}
