//! Binary label encoding.

use std::collections::BTreeSet;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SentibenchError};

/// Maps the two distinct label strings of a dataset to `0` and `1`.
///
/// Classes are sorted lexicographically before codes are assigned, so
/// `"negative"` becomes `0` and `"positive"` becomes `1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Learn the encoding from raw labels.
    ///
    /// Fails when there are more than two distinct values. A single distinct
    /// value is accepted and encoded as `0`.
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Result<Self> {
        let distinct: BTreeSet<&str> = labels.iter().map(|label| label.as_ref()).collect();
        if distinct.len() > 2 {
            return Err(SentibenchError::dataset(format!(
                "expected at most 2 distinct labels, found {}: {}",
                distinct.len(),
                distinct.into_iter().collect::<Vec<_>>().join(", ")
            )));
        }

        let classes: Vec<String> = distinct.into_iter().map(str::to_string).collect();
        let mapping = classes
            .iter()
            .enumerate()
            .map(|(code, class)| format!("'{class}' -> {code}"))
            .collect::<Vec<_>>()
            .join(", ");
        info!("label encoding: {mapping}");

        Ok(LabelEncoder { classes })
    }

    /// Class names in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Code for a single label.
    pub fn encode(&self, label: &str) -> Result<usize> {
        self.classes
            .iter()
            .position(|class| class == label)
            .ok_or_else(|| SentibenchError::dataset(format!("unknown label '{label}'")))
    }

    pub fn encode_all<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>> {
        labels.iter().map(|label| self.encode(label.as_ref())).collect()
    }

    /// Class name for a code.
    pub fn decode(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }
}
