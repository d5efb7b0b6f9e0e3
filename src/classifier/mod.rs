//! Binary classifiers over sparse feature matrices.
//!
//! Every model implements [`Classifier`]; the evaluation harness only ever
//! sees `Box<dyn Classifier>` values built from a [`ClassifierKind`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SentibenchError};
use crate::vectorize::FeatureMatrix;

pub mod boosting;
pub mod forest;
pub mod logistic;
pub mod naive_bayes;
pub mod tree;

pub use boosting::{BoostingParams, GradientBoostingClassifier};
pub use forest::{ForestParams, RandomForestClassifier};
pub use logistic::{LogisticParams, LogisticRegression};
pub use naive_bayes::{MultinomialNaiveBayes, NaiveBayesParams};
pub use tree::{DecisionTreeClassifier, TreeParams};

/// Encoded class label, `0` or `1`.
pub type Label = usize;

/// Number of classes every classifier supports.
pub const N_CLASSES: usize = 2;

/// A trainable binary classifier.
pub trait Classifier: Send + Sync {
    /// Train on `features` (one row per example) and the parallel `labels`.
    ///
    /// Calling `fit` again discards the previous model.
    fn fit(&mut self, features: &FeatureMatrix, labels: &[Label]) -> Result<()>;

    /// Predict one label per row of `features`, in row order.
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<Label>>;

    /// Get the classifier name.
    fn name(&self) -> &str;

    /// Whether `fit` has completed successfully.
    fn is_fitted(&self) -> bool;
}

/// Reject training data a binary classifier cannot learn from.
pub(crate) fn validate_training_data(features: &FeatureMatrix, labels: &[Label]) -> Result<()> {
    if features.n_rows() != labels.len() {
        return Err(SentibenchError::classifier(format!(
            "{} feature rows but {} labels",
            features.n_rows(),
            labels.len()
        )));
    }
    if labels.is_empty() {
        return Err(SentibenchError::classifier("cannot fit on an empty training set"));
    }
    if let Some(&bad) = labels.iter().find(|&&label| label >= N_CLASSES) {
        return Err(SentibenchError::classifier(format!(
            "label {bad} is not binary (expected 0 or 1)"
        )));
    }
    Ok(())
}

/// Reject prediction input that does not match the fitted feature space.
pub(crate) fn validate_prediction_input(
    name: &str,
    fitted_features: Option<usize>,
    features: &FeatureMatrix,
) -> Result<()> {
    let expected = fitted_features
        .ok_or_else(|| SentibenchError::classifier(format!("{name} has not been fitted")))?;
    if features.n_features() != expected {
        return Err(SentibenchError::classifier(format!(
            "{name} was fitted on {expected} features but got {}",
            features.n_features()
        )));
    }
    Ok(())
}

/// Per-class example counts.
pub(crate) fn class_counts(labels: &[Label]) -> [usize; N_CLASSES] {
    let mut counts = [0usize; N_CLASSES];
    for &label in labels {
        counts[label] += 1;
    }
    counts
}

/// The most frequent label; ties go to `0`.
pub(crate) fn majority_class(labels: &[Label]) -> Label {
    let counts = class_counts(labels);
    if counts[1] > counts[0] { 1 } else { 0 }
}

/// Hyperparameters for every classifier family.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    /// Seed for the stochastic models (random forest).
    pub seed: u64,
    pub naive_bayes: NaiveBayesParams,
    pub logistic_regression: LogisticParams,
    pub decision_tree: TreeParams,
    pub random_forest: ForestParams,
    pub gradient_boosting: BoostingParams,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        ClassifierParams {
            seed: 42,
            naive_bayes: NaiveBayesParams::default(),
            logistic_regression: LogisticParams::default(),
            decision_tree: TreeParams::default(),
            random_forest: ForestParams::default(),
            gradient_boosting: BoostingParams::default(),
        }
    }
}

impl ClassifierParams {
    /// Check every family's parameters.
    pub fn validate(&self) -> Result<()> {
        self.naive_bayes.validate()?;
        self.logistic_regression.validate()?;
        self.decision_tree.validate()?;
        self.random_forest.validate()?;
        self.gradient_boosting.validate()?;
        Ok(())
    }
}

/// The closed set of classifier families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassifierKind {
    NaiveBayes,
    LogisticRegression,
    DecisionTree,
    RandomForest,
    GradientBoosting,
}

impl ClassifierKind {
    /// Every family, in default evaluation order.
    pub const ALL: [ClassifierKind; 5] = [
        ClassifierKind::NaiveBayes,
        ClassifierKind::LogisticRegression,
        ClassifierKind::DecisionTree,
        ClassifierKind::RandomForest,
        ClassifierKind::GradientBoosting,
    ];

    /// Name used in result keys and configuration.
    pub fn name(&self) -> &'static str {
        match self {
            ClassifierKind::NaiveBayes => "naive-bayes",
            ClassifierKind::LogisticRegression => "logistic-regression",
            ClassifierKind::DecisionTree => "decision-tree",
            ClassifierKind::RandomForest => "random-forest",
            ClassifierKind::GradientBoosting => "gradient-boosting",
        }
    }

    /// Construct a fresh, untrained instance.
    pub fn build(&self, params: &ClassifierParams) -> Box<dyn Classifier> {
        match self {
            ClassifierKind::NaiveBayes => {
                Box::new(MultinomialNaiveBayes::new(params.naive_bayes.clone()))
            }
            ClassifierKind::LogisticRegression => {
                Box::new(LogisticRegression::new(params.logistic_regression.clone()))
            }
            ClassifierKind::DecisionTree => {
                Box::new(DecisionTreeClassifier::new(params.decision_tree.clone()))
            }
            ClassifierKind::RandomForest => Box::new(RandomForestClassifier::new(
                params.random_forest.clone(),
                params.seed,
            )),
            ClassifierKind::GradientBoosting => Box::new(GradientBoostingClassifier::new(
                params.gradient_boosting.clone(),
            )),
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ClassifierKind {
    type Err = SentibenchError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "naive-bayes" | "nb" | "multinomial-nb" => Ok(ClassifierKind::NaiveBayes),
            "logistic-regression" | "logistic" | "lr" => Ok(ClassifierKind::LogisticRegression),
            "decision-tree" | "tree" | "dt" => Ok(ClassifierKind::DecisionTree),
            "random-forest" | "forest" | "rf" => Ok(ClassifierKind::RandomForest),
            "gradient-boosting" | "gbdt" | "gb" => Ok(ClassifierKind::GradientBoosting),
            _ => Err(SentibenchError::invalid_config(format!(
                "unknown classifier '{s}' (expected one of: {})",
                ClassifierKind::ALL.map(|kind| kind.name()).join(", ")
            ))),
        }
    }
}
