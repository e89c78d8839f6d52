//! ID3 decision trees and random-forest ensembles over categorical data.
//!
//! Provides an in-memory categorical [`Dataset`], entropy-based ID3 tree
//! induction, a bootstrap/majority-vote random forest with usage-count
//! feature importances, and accuracy evaluation.

mod dataset;
mod error;
mod eval;
mod forest;
mod gain;
mod importance;
mod node;
mod tree;

pub use dataset::{Dataset, Example};
pub use error::ForestError;
pub use eval::accuracy;
pub use forest::{RandomForest, RandomForestConfig};
pub use gain::{entropy, information_gain};
pub use importance::RankedFeature;
pub use node::{Node, NodeIndex};
pub use tree::{DecisionTree, DecisionTreeConfig};
