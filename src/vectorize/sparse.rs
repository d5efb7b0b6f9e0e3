//! Sparse feature vectors and matrices.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SentibenchError};

/// A sparse, non-negative feature vector.
///
/// Entries are kept sorted by column index and never store explicit zeros,
/// so `nnz()` equals the number of distinct vocabulary terms present.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Create an all-zero vector of the given dimensionality.
    pub fn zeros(dim: usize) -> Self {
        SparseVector {
            dim,
            entries: Vec::new(),
        }
    }

    /// Build a vector from `(index, weight)` pairs.
    ///
    /// Pairs may arrive in any order; duplicates are summed and zero weights
    /// are dropped. Indices outside `[0, dim)` and negative or non-finite
    /// weights are rejected.
    pub fn from_pairs<I>(dim: usize, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let mut entries: Vec<(usize, f64)> = pairs.into_iter().collect();
        for &(index, weight) in &entries {
            if index >= dim {
                return Err(SentibenchError::other(format!(
                    "feature index {index} out of bounds for dimension {dim}"
                )));
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(SentibenchError::other(format!(
                    "feature weight {weight} at index {index} is not a finite non-negative value"
                )));
            }
        }

        entries.sort_by_key(|&(index, _)| index);
        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (index, weight) in entries {
            match merged.last_mut() {
                Some(last) if last.0 == index => last.1 += weight,
                _ => merged.push((index, weight)),
            }
        }
        merged.retain(|&(_, weight)| weight != 0.0);

        Ok(SparseVector {
            dim,
            entries: merged,
        })
    }

    /// Dimensionality (the vocabulary size this vector was built against).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Whether every component is zero.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Weight at `index`, zero when absent.
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Iterate the stored `(index, weight)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Stored column indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|&(index, _)| index)
    }

    /// Sum of the weights.
    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|&(_, weight)| weight).sum()
    }

    /// Euclidean norm.
    pub fn l2_norm(&self) -> f64 {
        self.entries
            .iter()
            .map(|&(_, weight)| weight * weight)
            .sum::<f64>()
            .sqrt()
    }

    /// Scale the vector to unit Euclidean length; zero vectors stay zero.
    pub fn normalize_l2(&mut self) {
        let norm = self.l2_norm();
        if norm > 0.0 {
            for (_, weight) in &mut self.entries {
                *weight /= norm;
            }
        }
    }

    /// Dot product with a dense weight vector of at least `dim` entries.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|&(index, weight)| weight * dense.get(index).copied().unwrap_or(0.0))
            .sum()
    }

    pub(crate) fn map_weights<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, f64) -> f64,
    {
        for (index, weight) in &mut self.entries {
            *weight = f(*index, *weight);
        }
        self.entries.retain(|&(_, weight)| weight != 0.0);
    }
}

/// Ordered feature vectors, one per document, all of the same dimensionality.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    n_features: usize,
    rows: Vec<SparseVector>,
}

impl FeatureMatrix {
    /// Build a matrix from rows, checking that every row has `n_features` columns.
    pub fn from_rows(n_features: usize, rows: Vec<SparseVector>) -> Result<Self> {
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.dim() != n_features) {
            return Err(SentibenchError::other(format!(
                "row {i} has dimension {}, expected {n_features}",
                row.dim()
            )));
        }
        Ok(FeatureMatrix { n_features, rows })
    }

    /// Number of rows (documents).
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (vocabulary size).
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&SparseVector> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    /// Mutable row access; callers may rescale weights but not change dimensions.
    pub(crate) fn rows_mut(&mut self) -> &mut [SparseVector] {
        &mut self.rows
    }

    /// Total stored non-zero entries across all rows.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(SparseVector::nnz).sum()
    }

    /// Value at `(row, column)`; zero for absent entries or out-of-range rows.
    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.rows.get(row).map_or(0.0, |r| r.get(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_sorts_and_merges() {
        let v = SparseVector::from_pairs(5, vec![(3, 1.0), (0, 2.0), (3, 1.0), (4, 0.0)]).unwrap();
        assert_eq!(v.dim(), 5);
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![(0, 2.0), (3, 2.0)]);
        assert_eq!(v.get(3), 2.0);
        assert_eq!(v.get(1), 0.0);
    }

    #[test]
    fn test_from_pairs_rejects_bad_input() {
        assert!(SparseVector::from_pairs(2, vec![(2, 1.0)]).is_err());
        assert!(SparseVector::from_pairs(2, vec![(0, -1.0)]).is_err());
        assert!(SparseVector::from_pairs(2, vec![(0, f64::NAN)]).is_err());
    }

    #[test]
    fn test_normalize_l2() {
        let mut v = SparseVector::from_pairs(3, vec![(0, 3.0), (2, 4.0)]).unwrap();
        assert_eq!(v.l2_norm(), 5.0);
        v.normalize_l2();
        assert!((v.get(0) - 0.6).abs() < 1e-12);
        assert!((v.get(2) - 0.8).abs() < 1e-12);
        assert!((v.l2_norm() - 1.0).abs() < 1e-12);

        let mut zero = SparseVector::zeros(3);
        zero.normalize_l2();
        assert!(zero.is_zero());
    }

    #[test]
    fn test_dot_and_sum() {
        let v = SparseVector::from_pairs(3, vec![(0, 1.0), (2, 2.0)]).unwrap();
        assert_eq!(v.dot(&[0.5, 10.0, 0.25]), 1.0);
        assert_eq!(v.sum(), 3.0);
    }

    #[test]
    fn test_map_weights_drops_zeros() {
        let mut v = SparseVector::from_pairs(3, vec![(0, 1.0), (1, 1.0)]).unwrap();
        v.map_weights(|index, w| if index == 0 { 0.0 } else { w * 2.0 });
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![(1, 2.0)]);
    }

    #[test]
    fn test_feature_matrix_dimension_checks() {
        let rows = vec![SparseVector::zeros(2), SparseVector::zeros(3)];
        assert!(FeatureMatrix::from_rows(2, rows).is_err());

        let row = SparseVector::from_pairs(2, vec![(1, 4.0)]).unwrap();
        let m = FeatureMatrix::from_rows(2, vec![row]).unwrap();
        assert_eq!(m.n_rows(), 1);
        assert_eq!(m.nnz(), 1);
        assert_eq!(m.get(0, 1), 4.0);
        assert_eq!(m.get(7, 1), 0.0);
    }
}
