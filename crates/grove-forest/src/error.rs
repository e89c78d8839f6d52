/// Errors from dataset construction, tree induction, ensemble training, and
/// evaluation.
#[derive(Debug, thiserror::Error)]
pub enum ForestError {
    /// Returned when n_trees is zero.
    #[error("n_trees must be at least 1, got {n_trees}")]
    InvalidTreeCount {
        /// The invalid n_trees value provided.
        n_trees: usize,
    },

    /// Returned when the per-split candidate-attribute cap is zero.
    #[error("max_features must be at least 1, got {max_features}")]
    InvalidMaxFeatures {
        /// The invalid max_features value provided.
        max_features: usize,
    },

    /// Returned when an empty dataset is passed to induction or evaluation.
    #[error("dataset has zero examples")]
    EmptyDataset,

    /// Returned when predictions are not position-aligned with the dataset.
    #[error("got {got} predictions for {expected} examples")]
    PredictionCountMismatch {
        /// The number of examples in the dataset.
        expected: usize,
        /// The number of predictions provided.
        got: usize,
    },

    /// Returned when the target name also appears among the attribute names.
    #[error("target \"{name}\" is also declared as an attribute")]
    TargetIsAttribute {
        /// The offending column name.
        name: String,
    },

    /// Returned when an attribute name is declared more than once.
    #[error("attribute \"{name}\" is declared more than once")]
    DuplicateAttribute {
        /// The duplicated attribute name.
        name: String,
    },

    /// Returned when an example lacks a value for a declared attribute.
    #[error("example {example_index} has no value for attribute \"{attribute}\"")]
    MissingAttributeValue {
        /// The attribute with no value.
        attribute: String,
        /// The zero-based index of the offending example.
        example_index: usize,
    },
}
