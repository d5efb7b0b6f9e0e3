//! Multinomial naive Bayes.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::classifier::{
    Classifier, Label, N_CLASSES, class_counts, validate_prediction_input, validate_training_data,
};
use crate::error::{Result, SentibenchError};
use crate::vectorize::FeatureMatrix;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NaiveBayesParams {
    /// Additive (Laplace/Lidstone) smoothing.
    pub alpha: f64,
}

impl Default for NaiveBayesParams {
    fn default() -> Self {
        NaiveBayesParams { alpha: 1.0 }
    }
}

impl NaiveBayesParams {
    pub fn validate(&self) -> Result<()> {
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(SentibenchError::invalid_config(format!(
                "naive_bayes.alpha must be a finite non-negative number, got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}

/// Multinomial naive Bayes over term weights.
///
/// Scores each class as `ln P(c) + Σ x_f ln P(f | c)` with
/// `P(f | c) = (N_cf + α) / (N_c + α·d)`. A class absent from training gets a
/// prior of zero and is never predicted.
#[derive(Clone, Debug)]
pub struct MultinomialNaiveBayes {
    params: NaiveBayesParams,
    model: Option<NaiveBayesModel>,
}

#[derive(Clone, Debug)]
struct NaiveBayesModel {
    n_features: usize,
    class_log_prior: [f64; N_CLASSES],
    /// `feature_log_prob[c][f]`.
    feature_log_prob: [Vec<f64>; N_CLASSES],
}

impl MultinomialNaiveBayes {
    pub fn new(params: NaiveBayesParams) -> Self {
        MultinomialNaiveBayes {
            params,
            model: None,
        }
    }

    /// Joint log-likelihood of each class for every row.
    pub fn log_likelihood(&self, features: &FeatureMatrix) -> Result<Vec<[f64; N_CLASSES]>> {
        validate_prediction_input(
            self.name(),
            self.model.as_ref().map(|m| m.n_features),
            features,
        )?;
        let Some(model) = self.model.as_ref() else {
            return Err(SentibenchError::classifier("naive-bayes has not been fitted"));
        };

        Ok(features
            .rows()
            .iter()
            .map(|row| {
                let mut scores = model.class_log_prior;
                for (class, score) in scores.iter_mut().enumerate() {
                    for (index, weight) in row.iter() {
                        *score += weight * model.feature_log_prob[class][index];
                    }
                }
                scores
            })
            .collect())
    }
}

impl Classifier for MultinomialNaiveBayes {
    fn fit(&mut self, features: &FeatureMatrix, labels: &[Label]) -> Result<()> {
        validate_training_data(features, labels)?;
        self.params.validate()?;

        let n_features = features.n_features();
        let n_samples = labels.len() as f64;
        let counts = class_counts(labels);

        let mut feature_totals = [vec![0.0; n_features], vec![0.0; n_features]];
        for (row, &label) in features.rows().iter().zip(labels) {
            for (index, weight) in row.iter() {
                feature_totals[label][index] += weight;
            }
        }

        let alpha = self.params.alpha;
        let class_log_prior = counts.map(|count| (count as f64 / n_samples).ln());
        let feature_log_prob = feature_totals.map(|totals| {
            let denominator = totals.iter().sum::<f64>() + alpha * n_features as f64;
            totals
                .iter()
                .map(|&total| ((total + alpha) / denominator).ln())
                .collect()
        });

        debug!(
            "naive-bayes fitted on {} rows ({} negative / {} positive), {n_features} features",
            labels.len(),
            counts[0],
            counts[1]
        );
        self.model = Some(NaiveBayesModel {
            n_features,
            class_log_prior,
            feature_log_prob,
        });
        Ok(())
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<Label>> {
        Ok(self
            .log_likelihood(features)?
            .into_iter()
            .map(|scores| if scores[1] > scores[0] { 1 } else { 0 })
            .collect())
    }

    fn name(&self) -> &str {
        "naive-bayes"
    }

    fn is_fitted(&self) -> bool {
        self.model.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorize::SparseVector;

    fn matrix(rows: Vec<Vec<(usize, f64)>>, dim: usize) -> FeatureMatrix {
        FeatureMatrix::from_rows(
            dim,
            rows.into_iter()
                .map(|pairs| SparseVector::from_pairs(dim, pairs).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_log_likelihood_matches_formula() {
        // feature 0 = "great", feature 1 = "terrible"
        let train = matrix(vec![vec![(0, 2.0)], vec![(1, 1.0)], vec![(0, 1.0), (1, 1.0)]], 2);
        let labels = [1, 0, 1];
        let mut nb = MultinomialNaiveBayes::new(NaiveBayesParams::default());
        nb.fit(&train, &labels).unwrap();

        let test = matrix(vec![vec![(0, 1.0)]], 2);
        let scores = nb.log_likelihood(&test).unwrap()[0];

        // positive: N = 4 (great 3, terrible 1); P(great|pos) = (3+1)/(4+2)
        let expected_pos = (2.0f64 / 3.0).ln() + (4.0f64 / 6.0).ln();
        // negative: N = 1 (terrible 1); P(great|neg) = (0+1)/(1+2)
        let expected_neg = (1.0f64 / 3.0).ln() + (1.0f64 / 3.0).ln();
        assert!((scores[1] - expected_pos).abs() < 1e-12);
        assert!((scores[0] - expected_neg).abs() < 1e-12);
        assert_eq!(nb.predict(&test).unwrap(), vec![1]);
    }

    #[test]
    fn test_single_class_training_never_predicts_absent_class() {
        let train = matrix(vec![vec![(0, 1.0)], vec![(1, 1.0)]], 2);
        let mut nb = MultinomialNaiveBayes::new(NaiveBayesParams::default());
        nb.fit(&train, &[0, 0]).unwrap();

        let test = matrix(vec![vec![(0, 5.0)], vec![]], 2);
        assert_eq!(nb.predict(&test).unwrap(), vec![0, 0]);
    }

    #[test]
    fn test_refit_replaces_model() {
        let train = matrix(vec![vec![(0, 1.0)], vec![(1, 1.0)]], 2);
        let mut nb = MultinomialNaiveBayes::new(NaiveBayesParams::default());
        nb.fit(&train, &[1, 0]).unwrap();
        nb.fit(&train, &[0, 1]).unwrap();

        let test = matrix(vec![vec![(0, 1.0)]], 2);
        assert_eq!(nb.predict(&test).unwrap(), vec![0]);
    }

    #[test]
    fn test_negative_alpha_rejected() {
        let params = NaiveBayesParams { alpha: -1.0 };
        assert!(params.validate().unwrap_err().is_config_error());
    }
}
