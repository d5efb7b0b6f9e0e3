//! # sentibench
//!
//! Turns short review texts into sparse count or TF-IDF features and compares
//! a family of binary classifiers on them over a seeded train/test split.
//!
//! ## Features
//!
//! - Regex tokenizer with lowercasing and configurable stop words
//! - Count and TF-IDF vectorizers with statistics frozen at fit time
//! - Naive Bayes, logistic regression, decision tree, random forest and
//!   gradient boosting behind one `Classifier` trait
//! - A harness that evaluates every (method, classifier) combination

pub mod analysis;
pub mod classifier;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod model_selection;
pub mod vectorize;

pub mod prelude {
    pub use crate::analysis::analyzer::{Analyzer, StandardAnalyzer};
    pub use crate::analysis::token_filter::StopWords;
    pub use crate::classifier::{Classifier, ClassifierKind, ClassifierParams, Label};
    pub use crate::dataset::{DatasetConfig, LabelEncoder, ReviewDataset, load_reviews};
    pub use crate::error::{Result, SentibenchError};
    pub use crate::evaluation::{EvaluationConfig, EvaluationHarness, ResultEntry, ResultTable};
    pub use crate::model_selection::{Partitioner, Split};
    pub use crate::vectorize::{
        CountVectorizer, FeatureMatrix, FeatureMethod, SparseVector, TfIdfOptions,
        TfIdfVectorizer, Vocabulary,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
