//! JSON summary and Graphviz tree writers for a training run.

use std::fs;
use std::path::{Path, PathBuf};

use grove_forest::{DecisionTree, RankedFeature};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::dot::render_dot;

/// Summary of one train/evaluate run.
#[derive(Debug)]
pub struct RunSummary<'a> {
    /// Number of training examples.
    pub n_training_examples: usize,
    /// Number of test examples.
    pub n_test_examples: usize,
    /// Number of trees in the ensemble.
    pub n_trees: usize,
    /// Test-set accuracy in [0, 1].
    pub accuracy: f64,
    /// Test examples no tree could route.
    pub n_unrouted: usize,
    /// Attributes ranked by split-usage count.
    pub importances: &'a [RankedFeature],
}

/// Writes run artifacts into an output directory.
///
/// Creates the directory on construction if it does not exist. Output files
/// are `summary.json` and one `tree_{index}.dot` per ensemble member.
pub struct ResultWriter {
    output_dir: PathBuf,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display()))]
    pub fn new(output_dir: &Path) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Write the run summary to `summary.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all)]
    pub fn write_summary(&self, summary: &RunSummary<'_>) -> Result<(), IoError> {
        let path = self.output_dir.join("summary.json");

        let feature_importances: Vec<FeatureEntry<'_>> = summary
            .importances
            .iter()
            .map(|f| FeatureEntry {
                name: f.name.as_str(),
                usage_count: f.usage_count,
                rank: f.rank,
            })
            .collect();

        let artifact = SummaryArtifact {
            n_training_examples: summary.n_training_examples,
            n_test_examples: summary.n_test_examples,
            n_trees: summary.n_trees,
            accuracy: summary.accuracy,
            n_unrouted: summary.n_unrouted,
            feature_importances,
        };

        let json = serde_json::to_string_pretty(&artifact).expect("serialization cannot fail");
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "summary written");
        Ok(())
    }

    /// Write one tree to `tree_{index}.dot`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all, fields(index))]
    pub fn write_tree(&self, index: usize, tree: &DecisionTree) -> Result<(), IoError> {
        let path = self.output_dir.join(format!("tree_{index}.dot"));
        fs::write(&path, render_dot(tree)).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;
        debug!(path = %path.display(), "tree exported");
        Ok(())
    }
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct SummaryArtifact<'a> {
    n_training_examples: usize,
    n_test_examples: usize,
    n_trees: usize,
    accuracy: f64,
    n_unrouted: usize,
    feature_importances: Vec<FeatureEntry<'a>>,
}

#[derive(Serialize)]
struct FeatureEntry<'a> {
    name: &'a str,
    usage_count: usize,
    rank: usize,
}
