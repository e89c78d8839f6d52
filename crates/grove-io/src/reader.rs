//! CSV dataset reader with full input validation.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use grove_forest::{Dataset, Example};
use tracing::{debug, info, instrument};

use crate::IoError;

/// Reads a categorical dataset from a delimited file.
///
/// Expected CSV format:
/// - Header row required; exactly one column must match the target name,
///   at any position.
/// - Every non-target column becomes an attribute.
/// - Cell values are taken verbatim as categorical tokens: no numeric
///   parsing, no missing-value handling.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::DuplicateColumn`] | Same column name appears twice in the header |
/// | [`IoError::TargetColumnMissing`] | No header column matches the target name |
/// | [`IoError::NoAttributeColumns`] | Only the target column, no attributes |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
pub struct DatasetReader {
    path: PathBuf,
    target: String,
}

impl DatasetReader {
    /// Create a new reader for the given CSV path and target column name.
    pub fn new(path: &Path, target: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            target: target.to_string(),
        }
    }

    /// Read and validate the CSV file, returning a [`Dataset`].
    #[instrument(skip(self), fields(path = %self.path.display(), target = %self.target))]
    pub fn read(&self) -> Result<Dataset, IoError> {
        // 1. Open file (FileNotFound on failure)
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // 2. Build CSV reader with headers.
        // flexible(true) allows rows with varying column counts so that our own
        // InconsistentRowLength check fires instead of a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        // 3. Read and validate the header.
        let header = rdr.headers().map_err(|e| IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        })?;
        let columns: Vec<String> = header.iter().map(String::from).collect();
        let expected_cols = columns.len();
        debug!(expected_cols, "read CSV header");

        let mut seen = HashSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(IoError::DuplicateColumn {
                    path: self.path.clone(),
                    name: name.clone(),
                });
            }
        }

        let Some(target_index) = columns.iter().position(|c| c == &self.target) else {
            return Err(IoError::TargetColumnMissing {
                path: self.path.clone(),
                target: self.target.clone(),
            });
        };
        if expected_cols < 2 {
            return Err(IoError::NoAttributeColumns {
                path: self.path.clone(),
            });
        }

        let attribute_names: Vec<String> = columns
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != target_index)
            .map(|(_, name)| name.clone())
            .collect();

        // 4. Iterate rows with validation.
        let mut examples = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| IoError::CsvParse {
                path: self.path.clone(),
                offset: e.position().map_or(0, |p| p.byte()),
                source: e,
            })?;

            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            let mut attributes = HashMap::with_capacity(attribute_names.len());
            let mut target_value = String::new();
            for (col_index, raw) in record.iter().enumerate() {
                if col_index == target_index {
                    target_value = raw.to_string();
                } else {
                    attributes.insert(columns[col_index].clone(), raw.to_string());
                }
            }
            examples.push(Example::new(attributes, target_value));
        }

        // 5. Check for empty dataset.
        if examples.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        let n_examples = examples.len();
        // Columns were checked for duplicates and the target was excluded
        // from the attribute set, so construction cannot fail.
        let dataset = Dataset::new(attribute_names, self.target.clone(), examples)
            .expect("dataset construction cannot fail on validated columns");

        info!(
            n_examples,
            n_attributes = dataset.attribute_names().len(),
            "dataset loaded"
        );

        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn read_valid_dataset() {
        let csv = "weather,temp,play\nsunny,hot,yes\nrainy,cool,no\n";
        let f = write_csv(csv);
        let ds = DatasetReader::new(f.path(), "play").read().unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.attribute_names(), &["weather", "temp"]);
        assert_eq!(ds.target_name(), "play");
        assert_eq!(ds.examples()[0].attribute_value("weather"), Some("sunny"));
        assert_eq!(ds.examples()[0].target(), "yes");
        assert_eq!(ds.examples()[1].target(), "no");
    }

    #[test]
    fn target_column_position_is_arbitrary() {
        let csv = "weather,play,temp\nsunny,yes,hot\nrainy,no,cool\n";
        let f = write_csv(csv);
        let ds = DatasetReader::new(f.path(), "play").read().unwrap();
        assert_eq!(ds.attribute_names(), &["weather", "temp"]);
        assert_eq!(ds.examples()[0].target(), "yes");
        assert_eq!(ds.examples()[0].attribute_value("temp"), Some("hot"));
    }

    #[test]
    fn values_are_taken_verbatim() {
        // Numeric-looking tokens stay strings: "1.0" and "1" are distinct.
        let csv = "x,label\n1.0,a\n1,b\n";
        let f = write_csv(csv);
        let ds = DatasetReader::new(f.path(), "label").read().unwrap();
        assert_eq!(ds.examples()[0].attribute_value("x"), Some("1.0"));
        assert_eq!(ds.examples()[1].attribute_value("x"), Some("1"));
        assert_eq!(ds.attribute_values("x"), vec!["1.0", "1"]);
    }

    #[test]
    fn error_file_not_found() {
        let result = DatasetReader::new(Path::new("/nonexistent/file.csv"), "play").read();
        assert!(matches!(result, Err(IoError::FileNotFound { .. })));
    }

    #[test]
    fn error_target_column_missing() {
        let csv = "weather,temp\nsunny,hot\n";
        let f = write_csv(csv);
        let result = DatasetReader::new(f.path(), "play").read();
        assert!(matches!(result, Err(IoError::TargetColumnMissing { .. })));
    }

    #[test]
    fn error_duplicate_column() {
        let csv = "weather,weather,play\nsunny,rainy,yes\n";
        let f = write_csv(csv);
        let result = DatasetReader::new(f.path(), "play").read();
        assert!(matches!(result, Err(IoError::DuplicateColumn { .. })));
    }

    #[test]
    fn error_no_attribute_columns() {
        let csv = "play\nyes\nno\n";
        let f = write_csv(csv);
        let result = DatasetReader::new(f.path(), "play").read();
        assert!(matches!(result, Err(IoError::NoAttributeColumns { .. })));
    }

    #[test]
    fn error_empty_dataset() {
        let csv = "weather,temp,play\n";
        let f = write_csv(csv);
        let result = DatasetReader::new(f.path(), "play").read();
        assert!(matches!(result, Err(IoError::EmptyDataset { .. })));
    }

    #[test]
    fn error_inconsistent_row_length() {
        let csv = "weather,temp,play\nsunny,hot,yes\nrainy,cool\n";
        let f = write_csv(csv);
        let result = DatasetReader::new(f.path(), "play").read();
        assert!(matches!(
            result,
            Err(IoError::InconsistentRowLength { row_index: 1, .. })
        ));
    }
}
