//! Text-to-feature vectorization.
//!
//! Two weighting schemes share one vocabulary builder:
//!
//! - [`CountVectorizer`]: raw term frequencies
//! - [`TfIdfVectorizer`]: term frequencies scaled by smoothed inverse document
//!   frequency, with statistics frozen at fit time
//!
//! [`FeatureMethod`] is the closed set of schemes the evaluation harness can
//! select by name.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::error::{Result, SentibenchError};

pub mod count;
pub mod sparse;
pub mod tfidf;
pub mod vocabulary;

pub use count::CountVectorizer;
pub use sparse::{FeatureMatrix, SparseVector};
pub use tfidf::{DocumentFrequencyTable, TfIdfOptions, TfIdfVectorizer};
pub use vocabulary::Vocabulary;

/// A feature weighting scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureMethod {
    /// Raw term counts.
    #[serde(rename = "count", alias = "count-vectorizer")]
    Count,
    /// TF-IDF weights.
    #[serde(rename = "tfidf", alias = "tfidf-vectorizer")]
    TfIdf,
}

/// Train and test features produced by one fitted vectorizer.
#[derive(Clone, Debug)]
pub struct FeaturePair {
    pub train: FeatureMatrix,
    pub test: FeatureMatrix,
    /// Terms fitted from the training corpus.
    pub vocabulary_size: usize,
}

impl FeatureMethod {
    /// Every method, in default evaluation order.
    pub const ALL: [FeatureMethod; 2] = [FeatureMethod::Count, FeatureMethod::TfIdf];

    /// Name used in result keys and configuration.
    pub fn name(&self) -> &'static str {
        match self {
            FeatureMethod::Count => "count",
            FeatureMethod::TfIdf => "tfidf",
        }
    }

    /// Fit this method on `train` and transform `test` with the fitted state.
    ///
    /// The vocabulary (and, for TF-IDF, the document frequency table) is
    /// built from `train` alone and dropped when this call returns.
    pub fn vectorize<S: AsRef<str>>(
        &self,
        analyzer: Arc<dyn Analyzer>,
        tfidf: &TfIdfOptions,
        train: &[S],
        test: &[S],
    ) -> Result<FeaturePair> {
        match self {
            FeatureMethod::Count => {
                let vectorizer = CountVectorizer::new(analyzer);
                let (vocabulary, train) = vectorizer.fit_transform(train)?;
                let test = vectorizer.transform(&vocabulary, test)?;
                Ok(FeaturePair {
                    train,
                    test,
                    vocabulary_size: vocabulary.len(),
                })
            }
            FeatureMethod::TfIdf => {
                let vectorizer = TfIdfVectorizer::with_options(analyzer, tfidf.clone());
                let (vocabulary, frequencies, train) = vectorizer.fit_transform(train)?;
                let test = vectorizer.transform(&vocabulary, &frequencies, test)?;
                Ok(FeaturePair {
                    train,
                    test,
                    vocabulary_size: vocabulary.len(),
                })
            }
        }
    }
}

impl fmt::Display for FeatureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FeatureMethod {
    type Err = SentibenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" | "count-vectorizer" | "countvectorizer" => Ok(FeatureMethod::Count),
            "tfidf" | "tf-idf" | "tfidf-vectorizer" | "tfidfvectorizer" => {
                Ok(FeatureMethod::TfIdf)
            }
            other => Err(SentibenchError::invalid_config(format!(
                "unknown feature method '{other}' (expected 'count' or 'tfidf')"
            ))),
        }
    }
}
