//! Evaluation results.

use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierKind;
use crate::error::{Result, SentibenchError};
use crate::vectorize::FeatureMethod;

/// Accuracy of one (feature method, classifier) combination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub method: FeatureMethod,
    pub classifier: ClassifierKind,
    /// Fraction of test rows predicted correctly, in `[0, 1]`.
    pub accuracy: f64,
    /// Terms fitted from the training split.
    pub vocabulary_size: usize,
    pub n_train: usize,
    pub n_test: usize,
}

impl ResultEntry {
    /// Result key, e.g. `count_naive-bayes`.
    pub fn key(&self) -> String {
        result_key(self.method, self.classifier)
    }
}

pub fn result_key(method: FeatureMethod, classifier: ClassifierKind) -> String {
    format!("{method}_{classifier}")
}

/// Ordered result rows with unique keys.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    entries: Vec<ResultEntry>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row; a row with the same key is an error.
    pub fn push(&mut self, entry: ResultEntry) -> Result<()> {
        if self.get(entry.method, entry.classifier).is_some() {
            return Err(SentibenchError::evaluation(format!(
                "duplicate result key '{}'",
                entry.key()
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn get(&self, method: FeatureMethod, classifier: ClassifierKind) -> Option<&ResultEntry> {
        self.entries
            .iter()
            .find(|e| e.method == method && e.classifier == classifier)
    }

    /// Look up a row by its rendered key.
    pub fn get_key(&self, key: &str) -> Option<&ResultEntry> {
        self.entries.iter().find(|e| e.key() == key)
    }

    /// Accuracy for a rendered key.
    pub fn accuracy(&self, key: &str) -> Option<f64> {
        self.get_key(key).map(|e| e.accuracy)
    }

    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultEntry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(ResultEntry::key).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest-accuracy row; the earliest wins ties.
    pub fn best(&self) -> Option<&ResultEntry> {
        self.entries.iter().fold(None, |best, entry| match best {
            Some(b) if b.accuracy >= entry.accuracy => Some(b),
            _ => Some(entry),
        })
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a ResultEntry;
    type IntoIter = std::slice::Iter<'a, ResultEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(method: FeatureMethod, classifier: ClassifierKind, accuracy: f64) -> ResultEntry {
        ResultEntry {
            method,
            classifier,
            accuracy,
            vocabulary_size: 3,
            n_train: 8,
            n_test: 2,
        }
    }

    #[test]
    fn test_keys_and_lookup() {
        let mut table = ResultTable::new();
        table
            .push(entry(FeatureMethod::Count, ClassifierKind::NaiveBayes, 1.0))
            .unwrap();
        table
            .push(entry(FeatureMethod::TfIdf, ClassifierKind::GradientBoosting, 0.5))
            .unwrap();

        assert_eq!(table.keys(), vec!["count_naive-bayes", "tfidf_gradient-boosting"]);
        assert_eq!(table.accuracy("tfidf_gradient-boosting"), Some(0.5));
        assert_eq!(table.accuracy("count_decision-tree"), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut table = ResultTable::new();
        table
            .push(entry(FeatureMethod::Count, ClassifierKind::DecisionTree, 0.5))
            .unwrap();
        let err = table
            .push(entry(FeatureMethod::Count, ClassifierKind::DecisionTree, 0.7))
            .unwrap_err();
        assert!(matches!(err, SentibenchError::Evaluation(_)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_best_prefers_earliest_on_tie() {
        let mut table = ResultTable::new();
        assert!(table.best().is_none());
        table
            .push(entry(FeatureMethod::Count, ClassifierKind::NaiveBayes, 0.8))
            .unwrap();
        table
            .push(entry(FeatureMethod::Count, ClassifierKind::RandomForest, 0.9))
            .unwrap();
        table
            .push(entry(FeatureMethod::TfIdf, ClassifierKind::NaiveBayes, 0.9))
            .unwrap();
        assert_eq!(table.best().unwrap().key(), "count_random-forest");
    }
}
