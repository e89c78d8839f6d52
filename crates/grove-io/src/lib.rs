//! File I/O for grove: CSV dataset ingestion, train/test splitting, Graphviz
//! export, and run-report writing.

mod dot;
mod error;
mod reader;
mod split;
mod writer;

pub use dot::render_dot;
pub use error::IoError;
pub use reader::DatasetReader;
pub use split::{TrainTestSplit, train_test_split};
pub use writer::{ResultWriter, RunSummary};
