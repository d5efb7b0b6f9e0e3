//! Scoring predictions against held-out labels.

use crate::classifier::{Label, majority_class};
use crate::error::{Result, SentibenchError};

/// Fraction of positions where `predicted` equals `actual`.
pub fn accuracy(predicted: &[Label], actual: &[Label]) -> Result<f64> {
    if predicted.len() != actual.len() {
        return Err(SentibenchError::evaluation(format!(
            "{} predictions for {} labels",
            predicted.len(),
            actual.len()
        )));
    }
    if actual.is_empty() {
        return Err(SentibenchError::evaluation(
            "accuracy is undefined for an empty test set",
        ));
    }

    let matches = predicted
        .iter()
        .zip(actual)
        .filter(|(p, a)| p == a)
        .count();
    Ok(matches as f64 / actual.len() as f64)
}

/// Accuracy of always predicting the majority class of `train` on `test`.
pub fn majority_baseline(train: &[Label], test: &[Label]) -> Result<f64> {
    let majority = majority_class(train);
    accuracy(&vec![majority; test.len()], test)
}
