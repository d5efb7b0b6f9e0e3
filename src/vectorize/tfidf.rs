//! TF-IDF vectorizer.
//!
//! Weights are `tf(t, d) * ln((1 + N) / (1 + df(t)))`, where `N` and `df`
//! come from the training corpus only. The [`DocumentFrequencyTable`]
//! captured at fit time is reused unchanged for every later transform.
//! Rows are L2-normalized unless [`TfIdfOptions::l2_normalize`] is off; the
//! same setting applies to train and test transforms.

use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::error::{Result, SentibenchError};
use crate::vectorize::count::CountVectorizer;
use crate::vectorize::sparse::FeatureMatrix;
use crate::vectorize::vocabulary::Vocabulary;

/// Knobs for the TF-IDF weighting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TfIdfOptions {
    /// Scale each row to unit Euclidean length.
    pub l2_normalize: bool,
}

impl Default for TfIdfOptions {
    fn default() -> Self {
        Self { l2_normalize: true }
    }
}

/// Per-term document counts from the training corpus.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFrequencyTable {
    /// Number of training documents (`N`).
    n_documents: usize,
    /// `frequencies[i]` = training documents containing column `i`.
    frequencies: Vec<usize>,
}

impl DocumentFrequencyTable {
    /// Count, for each column, how many rows of a term-count matrix are non-zero.
    pub fn from_counts(counts: &FeatureMatrix) -> Self {
        let mut frequencies = vec![0usize; counts.n_features()];
        for row in counts.rows() {
            for index in row.indices() {
                frequencies[index] += 1;
            }
        }

        DocumentFrequencyTable {
            n_documents: counts.n_rows(),
            frequencies,
        }
    }

    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// Number of columns covered.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Document frequency of column `index`.
    pub fn frequency(&self, index: usize) -> Option<usize> {
        self.frequencies.get(index).copied()
    }

    pub fn frequencies(&self) -> &[usize] {
        &self.frequencies
    }

    /// Smoothed inverse document frequency `ln((1 + N) / (1 + df))`.
    ///
    /// Columns outside the table count as `df = 0`.
    pub fn idf(&self, index: usize) -> f64 {
        let df = self.frequency(index).unwrap_or(0) as f64;
        ((1.0 + self.n_documents as f64) / (1.0 + df)).ln()
    }
}

/// Builds TF-IDF weighted sparse vectors.
#[derive(Clone, Debug)]
pub struct TfIdfVectorizer {
    counter: CountVectorizer,
    options: TfIdfOptions,
}

impl TfIdfVectorizer {
    /// Create a vectorizer with default options (L2 normalization on).
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self::with_options(analyzer, TfIdfOptions::default())
    }

    pub fn with_options(analyzer: Arc<dyn Analyzer>, options: TfIdfOptions) -> Self {
        TfIdfVectorizer {
            counter: CountVectorizer::new(analyzer),
            options,
        }
    }

    pub fn options(&self) -> &TfIdfOptions {
        &self.options
    }

    /// Fit vocabulary and document frequencies on `corpus` and weight it.
    pub fn fit_transform<S: AsRef<str>>(
        &self,
        corpus: &[S],
    ) -> Result<(Vocabulary, DocumentFrequencyTable, FeatureMatrix)> {
        let (vocabulary, counts) = self.counter.fit_transform(corpus)?;
        let frequencies = DocumentFrequencyTable::from_counts(&counts);
        debug!(
            "tf-idf statistics captured over {} documents, {} terms",
            frequencies.n_documents(),
            frequencies.len()
        );

        let weighted = self.weight(counts, &frequencies);
        Ok((vocabulary, frequencies, weighted))
    }

    /// Weight `corpus` with statistics frozen at fit time.
    ///
    /// Document frequencies are never recomputed from `corpus`.
    pub fn transform<S: AsRef<str>>(
        &self,
        vocabulary: &Vocabulary,
        frequencies: &DocumentFrequencyTable,
        corpus: &[S],
    ) -> Result<FeatureMatrix> {
        if frequencies.len() != vocabulary.len() {
            return Err(SentibenchError::other(format!(
                "document frequency table covers {} terms but the vocabulary has {}",
                frequencies.len(),
                vocabulary.len()
            )));
        }

        let counts = self.counter.transform(vocabulary, corpus)?;
        Ok(self.weight(counts, frequencies))
    }

    fn weight(
        &self,
        mut counts: FeatureMatrix,
        frequencies: &DocumentFrequencyTable,
    ) -> FeatureMatrix {
        for row in counts.rows_mut() {
            row.map_weights(|index, tf| tf * frequencies.idf(index));
            if self.options.l2_normalize {
                row.normalize_l2();
            }
        }
        counts
    }
}
