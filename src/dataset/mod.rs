//! Labelled review datasets.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SentibenchError};

pub mod csv;
pub mod label;

pub use self::csv::{DatasetConfig, load_reviews, read_reviews};
pub use self::label::LabelEncoder;

/// Review texts with their raw sentiment values, in file order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewDataset {
    pub documents: Vec<String>,
    pub labels: Vec<String>,
}

impl ReviewDataset {
    /// Pair documents with labels; both must have the same length.
    pub fn new(documents: Vec<String>, labels: Vec<String>) -> Result<Self> {
        if documents.len() != labels.len() {
            return Err(SentibenchError::dataset(format!(
                "{} documents but {} labels",
                documents.len(),
                labels.len()
            )));
        }
        Ok(ReviewDataset { documents, labels })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn push(&mut self, document: impl Into<String>, label: impl Into<String>) {
        self.documents.push(document.into());
        self.labels.push(label.into());
    }

    /// Fit a [`LabelEncoder`] on the labels and encode them.
    pub fn encode_labels(&self) -> Result<(LabelEncoder, Vec<usize>)> {
        let encoder = LabelEncoder::fit(&self.labels)?;
        let encoded = encoder.encode_all(&self.labels)?;
        Ok((encoder, encoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = ReviewDataset::new(vec!["a".into()], vec![]).unwrap_err();
        assert!(matches!(err, SentibenchError::Dataset(_)));
    }

    #[test]
    fn test_encode_labels() {
        let mut dataset = ReviewDataset::default();
        dataset.push("loved it", "positive");
        dataset.push("hated it", "negative");
        dataset.push("fine", "positive");

        let (encoder, encoded) = dataset.encode_labels().unwrap();
        assert_eq!(encoder.classes(), ["negative", "positive"]);
        assert_eq!(encoded, vec![1, 0, 1]);
        assert_eq!(dataset.len(), 3);
    }
}
