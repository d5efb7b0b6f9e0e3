//! Term-count vectorizer.

use std::sync::Arc;

use log::debug;

use crate::analysis::analyzer::Analyzer;
use crate::error::Result;
use crate::vectorize::sparse::{FeatureMatrix, SparseVector};
use crate::vectorize::vocabulary::Vocabulary;

/// Builds sparse term-frequency vectors over a fitted [`Vocabulary`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use sentibench::analysis::analyzer::StandardAnalyzer;
/// use sentibench::vectorize::CountVectorizer;
///
/// let vectorizer = CountVectorizer::new(Arc::new(StandardAnalyzer::new().unwrap()));
/// let (vocab, train) = vectorizer.fit_transform(&["great great acting"]).unwrap();
/// let test = vectorizer.transform(&vocab, &["great twist"]).unwrap();
///
/// assert_eq!(train.get(0, vocab.index_of("great").unwrap()), 2.0);
/// assert_eq!(test.row(0).unwrap().nnz(), 1); // "twist" was never fitted
/// ```
#[derive(Clone)]
pub struct CountVectorizer {
    analyzer: Arc<dyn Analyzer>,
}

impl CountVectorizer {
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        CountVectorizer { analyzer }
    }

    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    /// Fit a vocabulary without producing features.
    pub fn fit<S: AsRef<str>>(&self, corpus: &[S]) -> Result<Vocabulary> {
        Vocabulary::fit(self.analyzer.as_ref(), corpus)
    }

    /// Fit a vocabulary on `corpus` and count its terms in one pass over the text.
    pub fn fit_transform<S: AsRef<str>>(
        &self,
        corpus: &[S],
    ) -> Result<(Vocabulary, FeatureMatrix)> {
        let tokenized = self.tokenize_all(corpus)?;
        let vocabulary = Vocabulary::from_terms(tokenized.iter().flatten().cloned());
        debug!(
            "count vectorizer fitted {} terms from {} documents",
            vocabulary.len(),
            corpus.len()
        );

        let matrix = Self::count_tokenized(&vocabulary, &tokenized)?;
        Ok((vocabulary, matrix))
    }

    /// Count terms of `corpus` against an already-fitted vocabulary.
    ///
    /// Unknown terms are dropped; the vocabulary is never extended.
    pub fn transform<S: AsRef<str>>(
        &self,
        vocabulary: &Vocabulary,
        corpus: &[S],
    ) -> Result<FeatureMatrix> {
        let tokenized = self.tokenize_all(corpus)?;
        Self::count_tokenized(vocabulary, &tokenized)
    }

    fn tokenize_all<S: AsRef<str>>(&self, corpus: &[S]) -> Result<Vec<Vec<String>>> {
        corpus
            .iter()
            .map(|document| self.analyzer.terms(document.as_ref()))
            .collect()
    }

    fn count_tokenized(
        vocabulary: &Vocabulary,
        tokenized: &[Vec<String>],
    ) -> Result<FeatureMatrix> {
        let rows = tokenized
            .iter()
            .map(|terms| {
                let counts = vocabulary.count_terms(terms);
                SparseVector::from_pairs(
                    vocabulary.len(),
                    counts.into_iter().map(|(index, count)| (index, count as f64)),
                )
            })
            .collect::<Result<Vec<_>>>()?;

        FeatureMatrix::from_rows(vocabulary.len(), rows)
    }
}

impl std::fmt::Debug for CountVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountVectorizer")
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::StandardAnalyzer;

    fn vectorizer() -> CountVectorizer {
        CountVectorizer::new(Arc::new(StandardAnalyzer::new().unwrap()))
    }

    #[test]
    fn test_fit_transform_counts() {
        let corpus = ["Great acting, great plot", "terrible plot"];
        let (vocab, matrix) = vectorizer().fit_transform(&corpus).unwrap();

        assert_eq!(vocab.len(), 4);
        assert_eq!(matrix.n_rows(), 2);
        assert_eq!(matrix.n_features(), 4);

        let great = vocab.index_of("great").unwrap();
        let plot = vocab.index_of("plot").unwrap();
        let terrible = vocab.index_of("terrible").unwrap();
        assert_eq!(matrix.get(0, great), 2.0);
        assert_eq!(matrix.get(0, plot), 1.0);
        assert_eq!(matrix.get(0, terrible), 0.0);
        assert_eq!(matrix.get(1, terrible), 1.0);
    }

    #[test]
    fn test_fit_matches_fit_transform_vocabulary() {
        let corpus = ["one two", "three two"];
        let v = vectorizer();
        assert_eq!(v.fit(&corpus).unwrap(), v.fit_transform(&corpus).unwrap().0);
    }

    #[test]
    fn test_transform_drops_unknown_terms() {
        let v = vectorizer();
        let (vocab, _) = v.fit_transform(&["great acting"]).unwrap();
        let before = vocab.clone();

        let matrix = v
            .transform(&vocab, &["great soundtrack and great twist"])
            .unwrap();

        assert_eq!(vocab, before);
        assert_eq!(matrix.n_features(), 2);
        assert_eq!(matrix.row(0).unwrap().nnz(), 1);
        assert_eq!(matrix.get(0, vocab.index_of("great").unwrap()), 2.0);
    }

    #[test]
    fn test_stop_word_document_is_zero() {
        let v = vectorizer();
        let (vocab, _) = v.fit_transform(&["great acting"]).unwrap();
        let matrix = v.transform(&vocab, &["The and it IS a"]).unwrap();
        assert!(matrix.row(0).unwrap().is_zero());
    }

    #[test]
    fn test_empty_corpus() {
        let v = vectorizer();
        let empty: [&str; 0] = [];
        let (vocab, matrix) = v.fit_transform(&empty).unwrap();
        assert!(vocab.is_empty());
        assert!(matrix.is_empty());

        let test = v.transform(&vocab, &["anything at all"]).unwrap();
        assert_eq!(test.n_rows(), 1);
        assert_eq!(test.n_features(), 0);
        assert!(test.row(0).unwrap().is_zero());
    }
}
