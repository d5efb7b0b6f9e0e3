//! Random forest of bagged CART trees.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::classifier::tree::{TreeBuilder, TreeNode, TreeParams, mean_target};
use crate::classifier::{Classifier, Label, validate_prediction_input, validate_training_data};
use crate::error::{Result, SentibenchError};
use crate::vectorize::FeatureMatrix;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    pub n_estimators: usize,
    /// Per-tree growth limits.
    pub tree: TreeParams,
    /// Candidate columns per node; `None` uses `sqrt(n_features)`.
    pub max_features: Option<usize>,
    /// Draw a bootstrap sample of the rows for each tree.
    pub bootstrap: bool,
}

impl Default for ForestParams {
    fn default() -> Self {
        ForestParams {
            n_estimators: 100,
            tree: TreeParams::default(),
            max_features: None,
            bootstrap: true,
        }
    }
}

impl ForestParams {
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(SentibenchError::invalid_config(
                "random_forest.n_estimators must be at least 1",
            ));
        }
        if self.max_features == Some(0) {
            return Err(SentibenchError::invalid_config(
                "random_forest.max_features must be at least 1",
            ));
        }
        self.tree.validate()
    }
}

/// Averages the positive-class fractions of independently grown trees.
///
/// Every source of randomness (bootstrap rows, per-node feature subsets) is
/// drawn from a single `StdRng` seeded at construction, so a fit is fully
/// reproducible.
#[derive(Clone, Debug)]
pub struct RandomForestClassifier {
    params: ForestParams,
    seed: u64,
    trees: Vec<TreeNode>,
    n_features: Option<usize>,
}

impl RandomForestClassifier {
    pub fn new(params: ForestParams, seed: u64) -> Self {
        RandomForestClassifier {
            params,
            seed,
            trees: Vec::new(),
            n_features: None,
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn max_features(&self, n_features: usize) -> usize {
        self.params
            .max_features
            .unwrap_or_else(|| (n_features as f64).sqrt().round() as usize)
            .max(1)
    }

    /// Mean positive-class fraction across trees for every row.
    pub fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        validate_prediction_input(self.name(), self.n_features, features)?;
        let n_trees = self.trees.len() as f64;
        Ok(features
            .rows()
            .iter()
            .map(|row| self.trees.iter().map(|tree| tree.predict(row)).sum::<f64>() / n_trees)
            .collect())
    }
}

impl Classifier for RandomForestClassifier {
    fn fit(&mut self, features: &FeatureMatrix, labels: &[Label]) -> Result<()> {
        validate_training_data(features, labels)?;
        self.params.validate()?;

        let n = labels.len();
        let targets: Vec<f64> = labels.iter().map(|&label| label as f64).collect();
        let max_features = self.max_features(features.n_features());
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut trees = Vec::with_capacity(self.params.n_estimators);
        for _ in 0..self.params.n_estimators {
            let samples: Vec<usize> = if self.params.bootstrap {
                (0..n).map(|_| rng.random_range(0..n)).collect()
            } else {
                (0..n).collect()
            };

            let tree = TreeBuilder::new(features, &targets, &self.params.tree)
                .with_feature_sampling(max_features, &mut rng)
                .build(&samples, &|leaf: &[usize]| mean_target(&targets, leaf));
            trees.push(tree);
        }

        debug!(
            "random-forest grew {} trees with {max_features} candidate features per node",
            trees.len()
        );
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
        "random-forest"
    }

    fn is_fitted(&self) -> bool {
        self.n_features.is_some()
    }
}
