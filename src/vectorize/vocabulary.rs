//! Vocabulary construction.
//!
//! A [`Vocabulary`] maps each normalized term seen in a training corpus to a
//! dense column index. Indices are assigned in lexicographic order of the
//! distinct terms, so fitting the same corpus twice always yields the same
//! column layout regardless of document order.

use std::collections::BTreeSet;

use ahash::AHashMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::error::Result;

/// Frozen term→column mapping.
///
/// Serializes as the plain term list; deserializing rebuilds the lookup
/// table, so a restored vocabulary resolves terms like the original.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    /// Terms in column order.
    terms: Vec<String>,
    /// Reverse lookup: term -> column.
    index: AHashMap<String, usize>,
}

impl Vocabulary {
    /// Tokenize every document and collect the surviving terms.
    ///
    /// An empty corpus, or one that is entirely stop words, yields an empty
    /// vocabulary.
    pub fn fit<S: AsRef<str>>(analyzer: &dyn Analyzer, corpus: &[S]) -> Result<Self> {
        let mut distinct = BTreeSet::new();
        for document in corpus {
            distinct.extend(analyzer.terms(document.as_ref())?);
        }

        let vocabulary = Self::from_sorted(distinct.into_iter().collect());
        debug!(
            "fitted vocabulary of {} terms from {} documents",
            vocabulary.len(),
            corpus.len()
        );
        Ok(vocabulary)
    }

    /// Build a vocabulary from arbitrary terms; duplicates collapse.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let distinct: BTreeSet<String> = terms.into_iter().map(Into::into).collect();
        Self::from_sorted(distinct.into_iter().collect())
    }

    fn from_sorted(terms: Vec<String>) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();
        Vocabulary { terms, index }
    }

    /// Number of terms (and feature columns).
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Column index of `term`, if it was seen during fitting.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    /// Term stored at column `index`.
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    /// Iterate `(term, index)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.as_str(), i))
    }

    /// Count in-vocabulary occurrences of `terms`, keyed by column.
    ///
    /// Out-of-vocabulary terms are skipped.
    pub(crate) fn count_terms(&self, terms: &[String]) -> AHashMap<usize, usize> {
        let mut counts = AHashMap::new();
        for term in terms {
            if let Some(index) = self.index_of(term) {
                *counts.entry(index).or_insert(0) += 1;
            }
        }
        counts
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(terms: Vec<String>) -> Self {
        Self::from_terms(terms)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.terms
    }
}

impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms
    }
}

impl Eq for Vocabulary {}
