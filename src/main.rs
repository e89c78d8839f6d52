use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use grove_forest::{RandomForestConfig, accuracy};
use grove_io::{DatasetReader, ResultWriter, RunSummary, train_test_split};

#[derive(Parser)]
#[command(name = "grove")]
#[command(about = "Random forests of ID3 decision trees over categorical CSV data")]
#[command(version)]
struct Cli {
    /// Path to the input CSV dataset
    #[arg(long)]
    data: PathBuf,

    /// Name of the target (label) column
    #[arg(long)]
    target: String,

    /// Output directory for the summary and exported trees
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Fraction of examples reserved for training (strictly between 0 and 1)
    #[arg(long, default_value_t = 0.8)]
    training_fraction: f64,

    /// Number of trees to train
    #[arg(long, default_value_t = 10)]
    n_trees: usize,

    /// Number of attributes to consider at each split (all when unset)
    #[arg(long)]
    max_features: Option<usize>,

    /// RNG seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long)]
    quiet: bool,

    /// Number of threads for parallel training (defaults to all cores)
    #[arg(long)]
    threads: Option<usize>,
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct SummaryOutput {
    n_training_examples: usize,
    n_test_examples: usize,
    n_trees: usize,
    accuracy: f64,
    n_unrouted: usize,
    feature_importances: Vec<FeatureOutput>,
}

#[derive(Serialize)]
struct FeatureOutput {
    name: String,
    usage_count: usize,
    rank: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure the Rayon thread pool.
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    // 1. Read the dataset.
    let dataset = DatasetReader::new(&cli.data, &cli.target)
        .read()
        .context("failed to read input CSV")?;
    info!(
        n_examples = dataset.len(),
        n_attributes = dataset.attribute_names().len(),
        "dataset loaded"
    );

    // 2. Split into train/test.
    let split = train_test_split(&dataset, cli.training_fraction, cli.seed)
        .context("failed to split dataset")?;

    // 3. Train the forest.
    let forest = RandomForestConfig::new(cli.n_trees)?
        .with_max_features(cli.max_features)
        .with_seed(cli.seed)
        .fit(&split.train)
        .context("forest training failed")?;

    // 4. Export one DOT file per ensemble member.
    let writer = ResultWriter::new(&cli.output_dir)?;
    for (index, tree) in forest.trees().iter().enumerate() {
        writer
            .write_tree(index, tree)
            .with_context(|| format!("failed to export tree {index}"))?;
    }

    // 5. Classify the test set and evaluate.
    let predictions = forest.classify_batch(&split.test);
    let n_unrouted = predictions.iter().filter(|p| p.is_none()).count();
    let test_accuracy =
        accuracy(&split.test, &predictions).context("failed to compute accuracy")?;
    info!(test_accuracy, n_unrouted, "test set evaluated");

    // 6. Rank feature importances and write the summary.
    let importances = forest.feature_importances();
    writer.write_summary(&RunSummary {
        n_training_examples: split.train.len(),
        n_test_examples: split.test.len(),
        n_trees: forest.n_trees(),
        accuracy: test_accuracy,
        n_unrouted,
        importances: &importances,
    })?;

    // 7. Print the same summary on stdout.
    let output = SummaryOutput {
        n_training_examples: split.train.len(),
        n_test_examples: split.test.len(),
        n_trees: forest.n_trees(),
        accuracy: test_accuracy,
        n_unrouted,
        feature_importances: importances
            .into_iter()
            .map(|f| FeatureOutput {
                name: f.name,
                usage_count: f.usage_count,
                rank: f.rank,
            })
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
