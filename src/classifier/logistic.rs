//! Logistic regression trained by batch gradient descent.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::classifier::{Classifier, Label, validate_prediction_input, validate_training_data};
use crate::error::{Result, SentibenchError};
use crate::vectorize::{FeatureMatrix, SparseVector};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticParams {
    pub learning_rate: f64,
    pub max_iterations: usize,
    /// L2 penalty on the coefficients (not the intercept).
    pub l2_penalty: f64,
    /// Stop once every gradient component is below this magnitude.
    pub tolerance: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        LogisticParams {
            learning_rate: 0.1,
            max_iterations: 500,
            l2_penalty: 1e-4,
            tolerance: 1e-6,
        }
    }
}

impl LogisticParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(SentibenchError::invalid_config(format!(
                "logistic_regression.learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.max_iterations == 0 {
            return Err(SentibenchError::invalid_config(
                "logistic_regression.max_iterations must be at least 1",
            ));
        }
        if !(self.l2_penalty >= 0.0 && self.l2_penalty.is_finite()) {
            return Err(SentibenchError::invalid_config(format!(
                "logistic_regression.l2_penalty must be non-negative, got {}",
                self.l2_penalty
            )));
        }
        Ok(())
    }
}

pub(crate) fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Binary logistic regression.
#[derive(Clone, Debug)]
pub struct LogisticRegression {
    params: LogisticParams,
    coefficients: Option<Vec<f64>>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(params: LogisticParams) -> Self {
        LogisticRegression {
            params,
            coefficients: None,
            intercept: 0.0,
        }
    }

    /// Fitted coefficients, one per feature.
    pub fn coefficients(&self) -> Option<&[f64]> {
        self.coefficients.as_deref()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    fn decision(&self, coefficients: &[f64], row: &SparseVector) -> f64 {
        row.dot(coefficients) + self.intercept
    }

    /// Probability of class `1` for every row.
    pub fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        validate_prediction_input(
            self.name(),
            self.coefficients.as_ref().map(Vec::len),
            features,
        )?;
        let coefficients = self.coefficients.as_deref().unwrap_or_default();
        Ok(features
            .rows()
            .iter()
            .map(|row| sigmoid(self.decision(coefficients, row)))
            .collect())
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, features: &FeatureMatrix, labels: &[Label]) -> Result<()> {
        validate_training_data(features, labels)?;
        self.params.validate()?;

        let n_features = features.n_features();
        let n = labels.len() as f64;
        let mut coefficients = vec![0.0; n_features];
        self.intercept = 0.0;

        let mut iterations = 0;
        for _ in 0..self.params.max_iterations {
            iterations += 1;
            let mut coef_grad = vec![0.0; n_features];
            let mut intercept_grad = 0.0;

            for (row, &label) in features.rows().iter().zip(labels) {
                let error = sigmoid(self.decision(&coefficients, row)) - label as f64;
                intercept_grad += error;
                for (index, weight) in row.iter() {
                    coef_grad[index] += error * weight;
                }
            }

            intercept_grad /= n;
            let mut max_grad = intercept_grad.abs();
            for (grad, &coef) in coef_grad.iter_mut().zip(&coefficients) {
                *grad = *grad / n + self.params.l2_penalty * coef;
                max_grad = max_grad.max(grad.abs());
            }

            self.intercept -= self.params.learning_rate * intercept_grad;
            for (coef, grad) in coefficients.iter_mut().zip(&coef_grad) {
                *coef -= self.params.learning_rate * grad;
            }

            if max_grad < self.params.tolerance {
                break;
            }
        }

        debug!("logistic-regression converged after {iterations} iterations");
        self.coefficients = Some(coefficients);
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
        "logistic-regression"
    }

    fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_feature(values: &[f64]) -> FeatureMatrix {
        FeatureMatrix::from_rows(
            1,
            values
                .iter()
                .map(|&v| SparseVector::from_pairs(1, vec![(0, v)]).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_learns_positive_coefficient() {
        let features = one_feature(&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let labels = [0, 0, 0, 1, 1, 1];
        let mut model = LogisticRegression::new(LogisticParams::default());
        model.fit(&features, &labels).unwrap();

        assert!(model.coefficients().unwrap()[0] > 0.0);
        assert!(model.intercept() < 0.0);
        assert_eq!(model.predict(&features).unwrap(), labels);

        let proba = model.predict_proba(&features).unwrap();
        assert!(proba.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_training_is_deterministic() {
        let features = one_feature(&[0.5, 1.0, 2.0, 0.0]);
        let labels = [0, 1, 1, 0];
        let mut a = LogisticRegression::new(LogisticParams::default());
        let mut b = LogisticRegression::new(LogisticParams::default());
        a.fit(&features, &labels).unwrap();
        b.fit(&features, &labels).unwrap();
        assert_eq!(a.coefficients(), b.coefficients());
        assert_eq!(a.intercept(), b.intercept());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let mut params = LogisticParams::default();
        params.learning_rate = 0.0;
        assert!(params.validate().is_err());

        let mut params = LogisticParams::default();
        params.max_iterations = 0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(40.0) > 0.999);
        assert!(sigmoid(-40.0) < 0.001);
    }
}
