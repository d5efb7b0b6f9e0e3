//! Gradient-boosted trees for binary classification.
//!
//! Each stage fits a regression tree to the residuals `y - p` of the current
//! model under binomial deviance, then sets every leaf to the Newton step
//! `Σ r / Σ p(1 - p)` for the samples in it. The raw score starts at the
//! training log-odds and accumulates `learning_rate * tree(x)` per stage.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::classifier::logistic::sigmoid;
use crate::classifier::tree::{TreeBuilder, TreeNode, TreeParams};
use crate::classifier::{Classifier, Label, validate_prediction_input, validate_training_data};
use crate::error::{Result, SentibenchError};
use crate::vectorize::{FeatureMatrix, SparseVector};

/// Probabilities are clamped away from 0 and 1 before taking log-odds.
const PROBABILITY_EPSILON: f64 = 1e-6;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostingParams {
    pub n_estimators: usize,
    /// Shrinkage applied to every stage.
    pub learning_rate: f64,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for BoostingParams {
    fn default() -> Self {
        BoostingParams {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl BoostingParams {
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(SentibenchError::invalid_config(
                "gradient_boosting.n_estimators must be at least 1",
            ));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(SentibenchError::invalid_config(format!(
                "gradient_boosting.learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        self.tree_params().validate()
    }

    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: Some(self.max_depth),
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        }
    }
}

/// Binomial-deviance gradient boosting.
#[derive(Clone, Debug)]
pub struct GradientBoostingClassifier {
    params: BoostingParams,
    initial_score: f64,
    trees: Vec<TreeNode>,
    n_features: Option<usize>,
}

impl GradientBoostingClassifier {
    pub fn new(params: BoostingParams) -> Self {
        GradientBoostingClassifier {
            params,
            initial_score: 0.0,
            trees: Vec::new(),
            n_features: None,
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn raw_score(&self, row: &SparseVector) -> f64 {
        let boosted: f64 = self.trees.iter().map(|tree| tree.predict(row)).sum();
        self.initial_score + self.params.learning_rate * boosted
    }

    /// Probability of class `1` for every row.
    pub fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        validate_prediction_input(self.name(), self.n_features, features)?;
        Ok(features
            .rows()
            .iter()
            .map(|row| sigmoid(self.raw_score(row)))
            .collect())
    }

    /// Mean binomial deviance of `scores` against `labels`.
    fn deviance(scores: &[f64], labels: &[Label]) -> f64 {
        scores
            .iter()
            .zip(labels)
            .map(|(&score, &label)| {
                let p = sigmoid(score).clamp(PROBABILITY_EPSILON, 1.0 - PROBABILITY_EPSILON);
                if label == 1 { -p.ln() } else { -(1.0 - p).ln() }
            })
            .sum::<f64>()
            / scores.len() as f64
    }
}

impl Classifier for GradientBoostingClassifier {
    fn fit(&mut self, features: &FeatureMatrix, labels: &[Label]) -> Result<()> {
        validate_training_data(features, labels)?;
        self.params.validate()?;

        let n = labels.len();
        let targets: Vec<f64> = labels.iter().map(|&label| label as f64).collect();
        let prior = (targets.iter().sum::<f64>() / n as f64)
            .clamp(PROBABILITY_EPSILON, 1.0 - PROBABILITY_EPSILON);
        let initial_score = (prior / (1.0 - prior)).ln();

        let tree_params = self.params.tree_params();
        let samples: Vec<usize> = (0..n).collect();
        let mut scores = vec![initial_score; n];
        let mut trees = Vec::with_capacity(self.params.n_estimators);

        for _ in 0..self.params.n_estimators {
            let probabilities: Vec<f64> = scores.iter().map(|&s| sigmoid(s)).collect();
            let residuals: Vec<f64> = targets
                .iter()
                .zip(&probabilities)
                .map(|(y, p)| y - p)
                .collect();
            let hessians: Vec<f64> = probabilities.iter().map(|p| p * (1.0 - p)).collect();

            let newton_step = |leaf: &[usize]| {
                let numerator: f64 = leaf.iter().map(|&i| residuals[i]).sum();
                let denominator: f64 = leaf.iter().map(|&i| hessians[i]).sum();
                numerator / denominator.max(1e-12)
            };
            let tree = TreeBuilder::new(features, &residuals, &tree_params)
                .build(&samples, &newton_step);

            for (score, row) in scores.iter_mut().zip(features.rows()) {
                *score += self.params.learning_rate * tree.predict(row);
            }
            trees.push(tree);
        }

        debug!(
            "gradient-boosting fitted {} stages, training deviance {:.4}",
            trees.len(),
            Self::deviance(&scores, labels)
        );
        self.initial_score = initial_score;
        self.trees = trees;
        self.n_features = Some(features.n_features());
        Ok(())
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<Label>> {
        Ok(self
            .predict_proba(features)?
            .into_iter()
            .map(|p| if p > 0.5 { 1 } else { 0 })
            .collect())
    }

    fn name(&self) -> &str {
        "gradient-boosting"
    }

    fn is_fitted(&self) -> bool {
        self.n_features.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threshold_data() -> (FeatureMatrix, Vec<Label>) {
        let rows = (0..12)
            .map(|i| SparseVector::from_pairs(2, vec![(0, i as f64 + 1.0), (1, 1.0)]).unwrap())
            .collect();
        let labels = (0..12).map(|i| if i >= 6 { 1 } else { 0 }).collect();
        (FeatureMatrix::from_rows(2, rows).unwrap(), labels)
    }

    #[test]
    fn test_initial_score_is_log_odds() {
        let features = FeatureMatrix::from_rows(1, vec![SparseVector::zeros(1); 4]).unwrap();
        let labels = [1, 1, 1, 0];
        let mut model = GradientBoostingClassifier::new(BoostingParams::default());
        model.fit(&features, &labels).unwrap();

        assert!((model.initial_score - 3.0f64.ln()).abs() < 1e-12);
        let proba = model.predict_proba(&features).unwrap();
        assert!((proba[0] - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_boosting_reduces_deviance() {
        let (features, labels) = threshold_data();
        let short = BoostingParams {
            n_estimators: 1,
            ..BoostingParams::default()
        };
        let mut one = GradientBoostingClassifier::new(short);
        let mut many = GradientBoostingClassifier::new(BoostingParams::default());
        one.fit(&features, &labels).unwrap();
        many.fit(&features, &labels).unwrap();

        let score = |model: &GradientBoostingClassifier| {
            let scores: Vec<f64> = features.rows().iter().map(|row| model.raw_score(row)).collect();
            GradientBoostingClassifier::deviance(&scores, &labels)
        };
        assert!(score(&many) < score(&one));
        assert_eq!(many.n_trees(), 100);
        assert_eq!(many.predict(&features).unwrap(), labels);
    }

    #[test]
    fn test_invalid_learning_rate_rejected() {
        let params = BoostingParams {
            learning_rate: 0.0,
            ..BoostingParams::default()
        };
        assert!(params.validate().unwrap_err().is_config_error());
    }
}
