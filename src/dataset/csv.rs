//! CSV review loader.
//!
//! Reads a headered CSV file and picks out the text and label columns:
//! ```csv
//! review,sentiment
//! "Great acting, great plot",positive
//! Terrible plot,negative
//! ```
//! Other columns are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::dataset::ReviewDataset;
use crate::error::{Result, SentibenchError};

/// Column selection and parsing options for review CSV files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Header name of the free-text column.
    pub text_field: String,
    /// Header name of the sentiment column.
    pub label_field: String,
    /// Field delimiter (default: ',').
    pub delimiter: char,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig {
            text_field: "review".to_string(),
            label_field: "sentiment".to_string(),
            delimiter: ',',
        }
    }
}

impl DatasetConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() {
            return Err(SentibenchError::invalid_config(format!(
                "dataset delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            )));
        }
        if self.text_field == self.label_field {
            return Err(SentibenchError::invalid_config(format!(
                "text and label columns are both '{}'",
                self.text_field
            )));
        }
        Ok(())
    }
}

/// Load a review dataset from a CSV file.
pub fn load_reviews<P: AsRef<Path>>(path: P, config: &DatasetConfig) -> Result<ReviewDataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        SentibenchError::dataset(format!("failed to open {}: {e}", path.display()))
    })?;
    let dataset = read_reviews(file, config)?;
    info!("loaded {} reviews from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Read a review dataset from any CSV source.
pub fn read_reviews<R: Read>(input: R, config: &DatasetConfig) -> Result<ReviewDataset> {
    config.validate()?;

    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter as u8)
        .trim(csv::Trim::Headers)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            SentibenchError::dataset(format!(
                "CSV header has no '{name}' column (found: {})",
                headers.iter().collect::<Vec<_>>().join(", ")
            ))
        })
    };
    let text_column = column(&config.text_field)?;
    let label_column = column(&config.label_field)?;
    debug!(
        "reading text from column {text_column} and labels from column {label_column}"
    );

    let mut dataset = ReviewDataset::default();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let field = |index: usize, name: &str| {
            record.get(index).ok_or_else(|| {
                SentibenchError::dataset(format!("record {} is missing '{name}'", line + 1))
            })
        };
        let text = field(text_column, &config.text_field)?;
        let label = field(label_column, &config.label_field)?.trim();
        dataset.push(text, label);
    }

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_read_selects_columns() {
        let csv = "id,review,sentiment\n\
                   1,\"Great acting, great plot\",positive\n\
                   2,Terrible plot,negative\n";
        let dataset = read_reviews(csv.as_bytes(), &DatasetConfig::default()).unwrap();

        assert_eq!(dataset.documents, vec!["Great acting, great plot", "Terrible plot"]);
        assert_eq!(dataset.labels, vec!["positive", "negative"]);
    }

    #[test]
    fn test_missing_column_is_dataset_error() {
        let csv = "text,sentiment\nhello,positive\n";
        let err = read_reviews(csv.as_bytes(), &DatasetConfig::default()).unwrap_err();
        assert!(matches!(err, SentibenchError::Dataset(_)));
        assert!(err.to_string().contains("review"));
    }

    #[test]
    fn test_header_only_is_empty() {
        let dataset =
            read_reviews("review,sentiment\n".as_bytes(), &DatasetConfig::default()).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let csv = "review,sentiment\ngood,positive\nbad\n";
        let err = read_reviews(csv.as_bytes(), &DatasetConfig::default()).unwrap_err();
        assert!(matches!(err, SentibenchError::Csv(_)));
    }

    #[test]
    fn test_custom_fields_and_delimiter() {
        let config = DatasetConfig {
            text_field: "body".to_string(),
            label_field: "label".to_string(),
            delimiter: '\t',
        };
        let csv = "label\tbody\npos\tnice film\n";
        let dataset = read_reviews(csv.as_bytes(), &config).unwrap();
        assert_eq!(dataset.documents, vec!["nice film"]);
        assert_eq!(dataset.labels, vec!["pos"]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "review,sentiment").unwrap();
        writeln!(file, "loved it,positive").unwrap();
        writeln!(file, "hated it,negative").unwrap();
        file.flush().unwrap();

        let dataset = load_reviews(file.path(), &DatasetConfig::default()).unwrap();
        assert_eq!(dataset.len(), 2);

        let err = load_reviews("/nonexistent/reviews.csv", &DatasetConfig::default()).unwrap_err();
        assert!(matches!(err, SentibenchError::Dataset(_)));
    }
}
