//! CART decision trees over sparse features.
//!
//! Splits are binary thresholds `x[f] <= t`. At each node only the columns
//! that are non-zero for at least one sample in the node are candidates,
//! since an all-zero column cannot separate anything. A column's absent
//! entries are treated as `0.0`.
//!
//! The same builder grows classification trees (targets are the labels,
//! leaves hold the positive-class fraction) and the regression trees used by
//! gradient boosting (targets are residuals, leaves are set by the caller).
//! Both use the gain `S_l² / n_l + S_r² / n_r`: for `0/1` targets, maximizing
//! it is equivalent to minimizing the weighted Gini impurity of the children.

use ahash::AHashMap;
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::classifier::{Classifier, Label, validate_prediction_input, validate_training_data};
use crate::error::{Result, SentibenchError};
use crate::vectorize::{FeatureMatrix, SparseVector};

/// Minimum gain improvement for a split to be kept.
const MIN_GAIN: f64 = 1e-12;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    /// Maximum depth; `None` grows until leaves are pure.
    pub max_depth: Option<usize>,
    /// Nodes with fewer samples become leaves.
    pub min_samples_split: usize,
    /// Each child must keep at least this many samples.
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        TreeParams {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl TreeParams {
    pub fn validate(&self) -> Result<()> {
        if self.min_samples_split < 2 {
            return Err(SentibenchError::invalid_config(format!(
                "min_samples_split must be at least 2, got {}",
                self.min_samples_split
            )));
        }
        if self.min_samples_leaf == 0 {
            return Err(SentibenchError::invalid_config(
                "min_samples_leaf must be at least 1",
            ));
        }
        if self.max_depth == Some(0) {
            return Err(SentibenchError::invalid_config("max_depth must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    pub(crate) fn predict(&self, row: &SparseVector) -> f64 {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row.get(*feature) <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    pub(crate) fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub(crate) fn n_leaves(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// Grows one tree over a fixed feature matrix and target vector.
pub(crate) struct TreeBuilder<'a> {
    features: &'a FeatureMatrix,
    targets: &'a [f64],
    params: &'a TreeParams,
    /// Random subset size of candidate columns per node (random forest).
    max_features: Option<usize>,
    rng: Option<&'a mut StdRng>,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(
        features: &'a FeatureMatrix,
        targets: &'a [f64],
        params: &'a TreeParams,
    ) -> Self {
        TreeBuilder {
            features,
            targets,
            params,
            max_features: None,
            rng: None,
        }
    }

    pub(crate) fn with_feature_sampling(
        mut self,
        max_features: usize,
        rng: &'a mut StdRng,
    ) -> Self {
        self.max_features = Some(max_features.max(1));
        self.rng = Some(rng);
        self
    }

    /// Grow a tree over `samples` (indices into the matrix; repeats allowed).
    ///
    /// `leaf_value` computes a leaf's output from the samples that reach it.
    pub(crate) fn build<F>(&mut self, samples: &[usize], leaf_value: &F) -> TreeNode
    where
        F: Fn(&[usize]) -> f64,
    {
        self.grow(samples, 0, leaf_value)
    }

    fn grow<F>(&mut self, samples: &[usize], depth: usize, leaf_value: &F) -> TreeNode
    where
        F: Fn(&[usize]) -> f64,
    {
        let at_max_depth = self.params.max_depth.is_some_and(|max| depth >= max);
        if samples.len() < self.params.min_samples_split || at_max_depth {
            return TreeNode::Leaf {
                value: leaf_value(samples),
            };
        }

        let Some(best) = self.find_best_split(samples) else {
            return TreeNode::Leaf {
                value: leaf_value(samples),
            };
        };

        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .iter()
            .copied()
            .partition(|&i| self.value(i, best.feature) <= best.threshold);

        TreeNode::Split {
            feature: best.feature,
            threshold: best.threshold,
            left: Box::new(self.grow(&left, depth + 1, leaf_value)),
            right: Box::new(self.grow(&right, depth + 1, leaf_value)),
        }
    }

    fn value(&self, sample: usize, feature: usize) -> f64 {
        self.features.get(sample, feature)
    }

    fn find_best_split(&mut self, samples: &[usize]) -> Option<BestSplit> {
        let n = samples.len();
        let total: f64 = samples.iter().map(|&i| self.targets[i]).sum();
        let parent_gain = total * total / n as f64;
        let min_leaf = self.params.min_samples_leaf;

        // column -> (value, target) for the node's non-zero entries
        let mut columns: AHashMap<usize, Vec<(f64, f64)>> = AHashMap::new();
        for &sample in samples {
            if let Some(row) = self.features.row(sample) {
                for (feature, value) in row.iter() {
                    columns
                        .entry(feature)
                        .or_default()
                        .push((value, self.targets[sample]));
                }
            }
        }

        // Sorted so ties and feature sampling are reproducible.
        let mut candidates: Vec<usize> = columns.keys().copied().collect();
        candidates.sort_unstable();
        if let (Some(k), Some(rng)) = (self.max_features, self.rng.as_deref_mut()) {
            if k < candidates.len() {
                let mut chosen = candidates.partial_shuffle(rng, k).0.to_vec();
                chosen.sort_unstable();
                candidates = chosen;
            }
        }

        let mut best: Option<BestSplit> = None;
        for feature in candidates {
            let Some(entries) = columns.get_mut(&feature) else {
                continue;
            };
            entries.sort_by(|a, b| a.0.total_cmp(&b.0));

            let nonzero_sum: f64 = entries.iter().map(|&(_, target)| target).sum();
            let mut left_n = n - entries.len();
            let mut left_sum = total - nonzero_sum;

            let mut consider = |left_n: usize, left_sum: f64, threshold: f64| {
                let right_n = n - left_n;
                if left_n < min_leaf || right_n < min_leaf {
                    return;
                }
                let right_sum = total - left_sum;
                let gain = left_sum * left_sum / left_n as f64
                    + right_sum * right_sum / right_n as f64;
                if gain > parent_gain + MIN_GAIN && best.as_ref().is_none_or(|b| gain > b.gain) {
                    best = Some(BestSplit {
                        feature,
                        threshold,
                        gain,
                    });
                }
            };

            if left_n > 0 {
                consider(left_n, left_sum, entries[0].0 / 2.0);
            }
            for i in 0..entries.len() - 1 {
                left_n += 1;
                left_sum += entries[i].1;
                if entries[i].0 < entries[i + 1].0 {
                    consider(left_n, left_sum, (entries[i].0 + entries[i + 1].0) / 2.0);
                }
            }
        }

        best
    }
}

/// Mean of the targets reaching a leaf; zero for an empty leaf.
pub(crate) fn mean_target(targets: &[f64], samples: &[usize]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|&i| targets[i]).sum::<f64>() / samples.len() as f64
}

/// A single CART classification tree.
#[derive(Clone, Debug)]
pub struct DecisionTreeClassifier {
    params: TreeParams,
    root: Option<TreeNode>,
    n_features: Option<usize>,
}

impl DecisionTreeClassifier {
    pub fn new(params: TreeParams) -> Self {
        DecisionTreeClassifier {
            params,
            root: None,
            n_features: None,
        }
    }

    /// Depth of the fitted tree (a lone leaf has depth 0).
    pub fn depth(&self) -> Option<usize> {
        self.root.as_ref().map(TreeNode::depth)
    }

    pub fn n_leaves(&self) -> Option<usize> {
        self.root.as_ref().map(TreeNode::n_leaves)
    }

    /// Fraction of positive training samples in the leaf each row falls into.
    pub fn predict_proba(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        validate_prediction_input(self.name(), self.n_features, features)?;
        let Some(root) = self.root.as_ref() else {
            return Err(SentibenchError::classifier("decision-tree has not been fitted"));
        };
        Ok(features.rows().iter().map(|row| root.predict(row)).collect())
    }
}

impl Classifier for DecisionTreeClassifier {
    fn fit(&mut self, features: &FeatureMatrix, labels: &[Label]) -> Result<()> {
        validate_training_data(features, labels)?;
        self.params.validate()?;

        let targets: Vec<f64> = labels.iter().map(|&label| label as f64).collect();
        let samples: Vec<usize> = (0..labels.len()).collect();
        let root = TreeBuilder::new(features, &targets, &self.params)
            .build(&samples, &|leaf: &[usize]| mean_target(&targets, leaf));

        debug!(
            "decision-tree grown to depth {} with {} leaves",
            root.depth(),
            root.n_leaves()
        );
        self.root = Some(root);
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
        "decision-tree"
    }

    fn is_fitted(&self) -> bool {
        self.root.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(dim: usize, rows: Vec<Vec<(usize, f64)>>) -> FeatureMatrix {
        FeatureMatrix::from_rows(
            dim,
            rows.into_iter()
                .map(|pairs| SparseVector::from_pairs(dim, pairs).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_splits_on_presence_of_term() {
        // feature 1 present <=> positive; feature 0 is noise.
        let features = matrix(
            2,
            vec![
                vec![(0, 1.0), (1, 1.0)],
                vec![(1, 2.0)],
                vec![(0, 1.0)],
                vec![],
            ],
        );
        let labels = [1, 1, 0, 0];
        let mut tree = DecisionTreeClassifier::new(TreeParams::default());
        tree.fit(&features, &labels).unwrap();

        assert_eq!(tree.depth(), Some(1));
        assert_eq!(tree.n_leaves(), Some(2));
        assert_eq!(tree.predict(&features).unwrap(), labels);

        let unseen = matrix(2, vec![vec![(1, 3.0)], vec![(0, 3.0)]]);
        assert_eq!(tree.predict(&unseen).unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_threshold_between_values() {
        let features = matrix(
            1,
            vec![vec![(0, 1.0)], vec![(0, 2.0)], vec![(0, 5.0)], vec![(0, 6.0)]],
        );
        let labels = [0, 0, 1, 1];
        let mut tree = DecisionTreeClassifier::new(TreeParams::default());
        tree.fit(&features, &labels).unwrap();

        match tree.root.as_ref().unwrap() {
            TreeNode::Split { threshold, .. } => assert_eq!(*threshold, 3.5),
            TreeNode::Leaf { .. } => panic!("expected a split"),
        }
    }

    #[test]
    fn test_max_depth_limits_growth() {
        // XOR-like layout needs depth 2.
        let features = matrix(
            2,
            vec![vec![], vec![(0, 1.0)], vec![(1, 1.0)], vec![(0, 1.0), (1, 1.0)]],
        );
        let labels = [0, 1, 1, 0];

        let mut full = DecisionTreeClassifier::new(TreeParams::default());
        full.fit(&features, &labels).unwrap();
        // No single split improves Gini on XOR, so the root stays a leaf.
        assert_eq!(full.depth(), Some(0));

        let skewed = matrix(1, vec![vec![], vec![(0, 1.0)], vec![(0, 2.0)], vec![(0, 3.0)]]);
        let labels = [0, 1, 0, 1];
        let params = TreeParams {
            max_depth: Some(1),
            ..TreeParams::default()
        };
        let mut shallow = DecisionTreeClassifier::new(params);
        shallow.fit(&skewed, &labels).unwrap();
        assert!(shallow.depth().unwrap() <= 1);
    }

    #[test]
    fn test_min_samples_leaf_respected() {
        let features = matrix(1, vec![vec![(0, 1.0)], vec![], vec![], vec![]]);
        let labels = [1, 0, 0, 0];
        let params = TreeParams {
            min_samples_leaf: 2,
            ..TreeParams::default()
        };
        let mut tree = DecisionTreeClassifier::new(params);
        tree.fit(&features, &labels).unwrap();
        assert_eq!(tree.depth(), Some(0));
        assert_eq!(tree.predict(&features).unwrap(), vec![0; 4]);
    }

    #[test]
    fn test_params_validation() {
        let params = TreeParams {
            min_samples_split: 1,
            ..TreeParams::default()
        };
        assert!(params.validate().is_err());
        let params = TreeParams {
            max_depth: Some(0),
            ..TreeParams::default()
        };
        assert!(params.validate().is_err());
    }
}
