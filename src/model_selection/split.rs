//! Seeded train/test split.
//!
//! The row permutation is a Fisher-Yates shuffle driven by
//! `StdRng::seed_from_u64(seed)`. The first `ceil(test_fraction * n)` permuted
//! rows form the test split and the remainder the train split, both in
//! permutation order.

use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SentibenchError};

/// Default share of rows held out for testing.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Default shuffle seed.
pub const DEFAULT_SEED: u64 = 42;

/// The outcome of partitioning a labelled corpus.
#[derive(Clone, Debug, PartialEq)]
pub struct Split<D, L> {
    pub train_documents: Vec<D>,
    pub test_documents: Vec<D>,
    pub train_labels: Vec<L>,
    pub test_labels: Vec<L>,
    /// Positions in the input that landed in the train split.
    pub train_indices: Vec<usize>,
    /// Positions in the input that landed in the test split.
    pub test_indices: Vec<usize>,
}

impl<D, L> Split<D, L> {
    pub fn n_train(&self) -> usize {
        self.train_indices.len()
    }

    pub fn n_test(&self) -> usize {
        self.test_indices.len()
    }
}

/// Splits parallel document/label sequences at a fixed ratio and seed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Partitioner {
    test_fraction: f64,
    seed: u64,
}

impl Default for Partitioner {
    fn default() -> Self {
        Partitioner {
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
        }
    }
}

impl Partitioner {
    /// Create a partitioner; `test_fraction` must lie strictly between 0 and 1.
    pub fn new(test_fraction: f64, seed: u64) -> Result<Self> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(SentibenchError::invalid_config(format!(
                "test_fraction must be in (0, 1), got {test_fraction}"
            )));
        }
        Ok(Partitioner {
            test_fraction,
            seed,
        })
    }

    pub fn test_fraction(&self) -> f64 {
        self.test_fraction
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of rows the test split receives out of `n`.
    pub fn test_size(&self, n: usize) -> usize {
        let raw = self.test_fraction * n as f64;
        // 0.3 * 10 is 3.0000000000000004 in f64; treat near-integers as exact.
        let rounded = raw.round();
        if (raw - rounded).abs() < 1e-9 {
            rounded as usize
        } else {
            raw.ceil() as usize
        }
    }

    /// The shuffled row order for `n` rows under this seed.
    pub fn permutation(&self, n: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);
        indices
    }

    /// Partition `documents` and `labels`, which must have equal length of at least 2.
    ///
    /// Fails when either side of the split would be empty.
    pub fn split<D: Clone, L: Clone>(&self, documents: &[D], labels: &[L]) -> Result<Split<D, L>> {
        let n = documents.len();
        if n != labels.len() {
            return Err(SentibenchError::invalid_config(format!(
                "{n} documents but {} labels",
                labels.len()
            )));
        }
        if n < 2 {
            return Err(SentibenchError::invalid_config(format!(
                "at least 2 rows are required to split, got {n}"
            )));
        }

        let n_test = self.test_size(n);
        if n_test == 0 || n_test >= n {
            return Err(SentibenchError::invalid_config(format!(
                "test_fraction {} leaves an empty split for {n} rows",
                self.test_fraction
            )));
        }

        let permutation = self.permutation(n);
        let (test_indices, train_indices) = permutation.split_at(n_test);
        debug!(
            "split {n} rows into {} train / {} test (seed {})",
            train_indices.len(),
            test_indices.len(),
            self.seed
        );

        let pick_documents =
            |indices: &[usize]| indices.iter().map(|&i| documents[i].clone()).collect();
        let pick_labels = |indices: &[usize]| indices.iter().map(|&i| labels[i].clone()).collect();

        Ok(Split {
            train_documents: pick_documents(train_indices),
            test_documents: pick_documents(test_indices),
            train_labels: pick_labels(train_indices),
            test_labels: pick_labels(test_indices),
            train_indices: train_indices.to_vec(),
            test_indices: test_indices.to_vec(),
        })
    }
}

/// Partition `documents` and `labels` with a one-off [`Partitioner`].
pub fn split<D: Clone, L: Clone>(
    documents: &[D],
    labels: &[L],
    test_fraction: f64,
    seed: u64,
) -> Result<Split<D, L>> {
    Partitioner::new(test_fraction, seed)?.split(documents, labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(n: usize) -> (Vec<String>, Vec<usize>) {
        let documents = (0..n).map(|i| format!("doc {i}")).collect();
        let labels = (0..n).map(|i| i % 2).collect();
        (documents, labels)
    }

    #[test]
    fn test_split_is_deterministic() {
        let (documents, labels) = corpus(50);
        let first = split(&documents, &labels, 0.2, 7).unwrap();
        let second = split(&documents, &labels, 0.2, 7).unwrap();
        assert_eq!(first, second);

        let other_seed = split(&documents, &labels, 0.2, 8).unwrap();
        assert_ne!(first.test_indices, other_seed.test_indices);
    }

    #[test]
    fn test_split_is_disjoint_and_exhaustive() {
        let (documents, labels) = corpus(23);
        for seed in 0..20 {
            for fraction in [0.05, 0.2, 0.5, 0.9] {
                let s = split(&documents, &labels, fraction, seed).unwrap();
                assert_eq!(s.n_train() + s.n_test(), documents.len());

                let mut all: Vec<usize> = s
                    .train_indices
                    .iter()
                    .chain(s.test_indices.iter())
                    .copied()
                    .collect();
                all.sort_unstable();
                assert_eq!(all, (0..documents.len()).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn test_documents_and_labels_stay_aligned() {
        let (documents, labels) = corpus(10);
        let s = split(&documents, &labels, 0.3, 42).unwrap();
        for (position, &index) in s.test_indices.iter().enumerate() {
            assert_eq!(s.test_documents[position], documents[index]);
            assert_eq!(s.test_labels[position], labels[index]);
        }
        for (position, &index) in s.train_indices.iter().enumerate() {
            assert_eq!(s.train_documents[position], documents[index]);
            assert_eq!(s.train_labels[position], labels[index]);
        }
    }

    #[test]
    fn test_test_size_rounds_up() {
        let p = Partitioner::new(0.2, 42).unwrap();
        assert_eq!(p.test_size(10), 2);
        assert_eq!(p.test_size(11), 3);
        assert_eq!(Partitioner::new(0.3, 42).unwrap().test_size(10), 3);
    }

    #[test]
    fn test_invalid_inputs_are_config_errors() {
        let (documents, labels) = corpus(10);

        for fraction in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let err = split(&documents, &labels, fraction, 1).unwrap_err();
            assert!(err.is_config_error());
        }

        let err = split(&documents, &labels[..9], 0.2, 1).unwrap_err();
        assert!(err.is_config_error());

        let err = split(&documents[..1], &labels[..1], 0.5, 1).unwrap_err();
        assert!(err.is_config_error());

        // ceil(0.99 * 2) == 2 leaves no training rows.
        let err = split(&documents[..2], &labels[..2], 0.99, 1).unwrap_err();
        assert!(err.is_config_error());
    }
}
