//! Evaluation configuration.

use std::collections::HashSet;
use std::fs;
use std::hash::Hash;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::token_filter::StopWords;
use crate::classifier::{ClassifierKind, ClassifierParams};
use crate::dataset::DatasetConfig;
use crate::error::{Result, SentibenchError};
use crate::model_selection::Partitioner;
use crate::model_selection::split::{DEFAULT_SEED, DEFAULT_TEST_FRACTION};
use crate::vectorize::{FeatureMethod, TfIdfOptions};

/// Everything one evaluation run depends on.
///
/// Missing fields in a config file fall back to their defaults, so
/// `{"methods": ["tfidf"]}` is a complete configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Feature methods, in evaluation order.
    pub methods: Vec<FeatureMethod>,
    /// Classifiers, in evaluation order.
    pub classifiers: Vec<ClassifierKind>,
    /// Share of rows held out for testing.
    pub test_fraction: f64,
    /// Seed for the train/test shuffle.
    pub seed: u64,
    pub stop_words: StopWords,
    pub tfidf: TfIdfOptions,
    pub classifier: ClassifierParams,
    pub dataset: DatasetConfig,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        EvaluationConfig {
            methods: FeatureMethod::ALL.to_vec(),
            classifiers: ClassifierKind::ALL.to_vec(),
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
            stop_words: StopWords::default(),
            tfidf: TfIdfOptions::default(),
            classifier: ClassifierParams::default(),
            dataset: DatasetConfig::default(),
        }
    }
}

impl EvaluationConfig {
    /// Read a JSON config file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SentibenchError::invalid_config(format!(
                "failed to read config {}: {e}",
                path.display()
            ))
        })?;
        let config: EvaluationConfig = serde_json::from_str(&content)?;
        config.validate()?;
        debug!("loaded evaluation config from {}", path.display());
        Ok(config)
    }

    /// Number of result rows this configuration produces.
    pub fn n_combinations(&self) -> usize {
        self.methods.len() * self.classifiers.len()
    }

    pub fn partitioner(&self) -> Result<Partitioner> {
        Partitioner::new(self.test_fraction, self.seed)
    }

    pub fn validate(&self) -> Result<()> {
        if self.methods.is_empty() {
            return Err(SentibenchError::invalid_config(
                "at least one feature method is required",
            ));
        }
        if self.classifiers.is_empty() {
            return Err(SentibenchError::invalid_config(
                "at least one classifier is required",
            ));
        }
        check_unique("feature method", &self.methods)?;
        check_unique("classifier", &self.classifiers)?;
        self.partitioner()?;
        self.classifier.validate()?;
        self.dataset.validate()?;
        Ok(())
    }
}

/// Reject repeated entries, which would produce duplicate result keys.
pub(crate) fn check_unique<T>(what: &str, items: &[T]) -> Result<()>
where
    T: Eq + Hash + std::fmt::Display,
{
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item) {
            return Err(SentibenchError::invalid_config(format!(
                "{what} '{item}' is listed more than once"
            )));
        }
    }
    Ok(())
}
