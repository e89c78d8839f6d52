//! Train/test partitioning by seeded random sampling.

use grove_forest::Dataset;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::IoError;

/// A disjoint train/test partition of one dataset.
#[derive(Debug)]
pub struct TrainTestSplit {
    /// Training examples, in original dataset order.
    pub train: Dataset,
    /// Held-out test examples, in original dataset order.
    pub test: Dataset,
}

/// Split a dataset for training and evaluation.
///
/// Draws `round(n * training_fraction)` distinct indices without replacement
/// for the training side; the remainder forms the test side. No example lands
/// on both sides, and each side preserves the original dataset order.
///
/// # Errors
///
/// Returns [`IoError::InvalidTrainingFraction`] unless `training_fraction`
/// lies strictly between 0 and 1.
pub fn train_test_split(
    dataset: &Dataset,
    training_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit, IoError> {
    if !(training_fraction > 0.0 && training_fraction < 1.0) {
        return Err(IoError::InvalidTrainingFraction {
            fraction: training_fraction,
        });
    }

    let n = dataset.len();
    let n_train = (n as f64 * training_fraction).round() as usize;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng);

    let mut train_indices = indices[..n_train].to_vec();
    let mut test_indices = indices[n_train..].to_vec();
    train_indices.sort_unstable();
    test_indices.sort_unstable();

    info!(
        n_train = train_indices.len(),
        n_test = test_indices.len(),
        "dataset split"
    );

    Ok(TrainTestSplit {
        train: dataset.subset(&train_indices),
        test: dataset.subset(&test_indices),
    })
}
