//! Classification accuracy against ground truth.

use crate::ForestError;
use crate::dataset::Dataset;

/// Fraction of predictions matching the true target, aligned by position.
///
/// Comparison is exact value equality; unrouted predictions (`None`) never
/// match.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`ForestError::PredictionCountMismatch`] | `predictions.len() != dataset.len()` |
/// | [`ForestError::EmptyDataset`] | `dataset` has no examples |
pub fn accuracy(dataset: &Dataset, predictions: &[Option<String>]) -> Result<f64, ForestError> {
    if predictions.len() != dataset.len() {
        return Err(ForestError::PredictionCountMismatch {
            expected: dataset.len(),
            got: predictions.len(),
        });
    }
    if dataset.is_empty() {
        return Err(ForestError::EmptyDataset);
    }

    let correct = dataset
        .examples()
        .iter()
        .zip(predictions)
        .filter(|(example, prediction)| prediction.as_deref() == Some(example.target()))
        .count();
    Ok(correct as f64 / dataset.len() as f64)
}
