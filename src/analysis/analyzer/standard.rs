//! Standard analyzer used by both vectorizers.
//!
//! # Pipeline
//!
//! 1. RegexTokenizer (runs of Unicode letters, combining marks and digits)
//! 2. LowercaseFilter
//! 3. StopFilter (configured [`StopWords`], English by default)
//!
//! # Examples
//!
//! ```
//! use sentibench::analysis::analyzer::{Analyzer, StandardAnalyzer};
//! use sentibench::analysis::token_filter::StopWords;
//!
//! let analyzer = StandardAnalyzer::new().unwrap();
//! assert_eq!(analyzer.terms("Hello the world and test").unwrap(), vec!["hello", "world", "test"]);
//!
//! let analyzer = StandardAnalyzer::with_stop_words(&StopWords::None).unwrap();
//! assert_eq!(analyzer.terms("the world").unwrap(), vec!["the", "world"]);
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::stop::{StopFilter, StopWords};
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::error::Result;

pub struct StandardAnalyzer {
    inner: PipelineAnalyzer,
}

impl StandardAnalyzer {
    /// Build the analyzer with the default English stop words.
    pub fn new() -> Result<Self> {
        Self::with_stop_words(&StopWords::English)
    }

    /// Build the analyzer with an explicit stop word set.
    pub fn with_stop_words(stop_words: &StopWords) -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::new()?);
        let mut analyzer =
            PipelineAnalyzer::new(tokenizer).add_filter(Arc::new(LowercaseFilter::new()));
        if *stop_words != StopWords::None {
            analyzer = analyzer.add_filter(Arc::new(StopFilter::from_config(stop_words)));
        }

        Ok(StandardAnalyzer {
            inner: analyzer.with_name("standard"),
        })
    }

    pub fn inner(&self) -> &PipelineAnalyzer {
        &self.inner
    }
}

impl Analyzer for StandardAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "standard"
    }
}

impl std::fmt::Debug for StandardAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StandardAnalyzer")
            .field("inner", &self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_standard_analyzer() {
        let analyzer = StandardAnalyzer::new().unwrap();

        let tokens: Vec<Token> = analyzer
            .analyze("Hello the world and test")
            .unwrap()
            .collect();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "hello");
        assert_eq!(tokens[1].text, "world");
        assert_eq!(tokens[2].text, "test");
    }

    #[test]
    fn test_capitalized_stop_words_removed() {
        let analyzer = StandardAnalyzer::new().unwrap();
        let terms = analyzer.terms("THE Plot IS Terrible").unwrap();
        assert_eq!(terms, vec!["plot", "terrible"]);
    }

    #[test]
    fn test_combining_marks_kept() {
        let analyzer = StandardAnalyzer::new().unwrap();
        let terms = analyzer.terms("हिन्दी फ़िल्म").unwrap();
        assert_eq!(terms, vec!["हिन्दी", "फ़िल्म"]);

        let terms = analyzer.terms("CAFE\u{301} au lait").unwrap();
        assert_eq!(terms, vec!["cafe\u{301}", "au", "lait"]);
    }

    #[test]
    fn test_only_stop_words() {
        let analyzer = StandardAnalyzer::new().unwrap();
        assert!(analyzer.terms("The and of it, is THIS!").unwrap().is_empty());
        assert!(analyzer.terms("").unwrap().is_empty());
    }

    #[test]
    fn test_custom_stop_words() {
        let stop_words = StopWords::Custom(vec!["movie".to_string()]);
        let analyzer = StandardAnalyzer::with_stop_words(&stop_words).unwrap();
        let terms = analyzer.terms("The Movie was fine").unwrap();
        assert_eq!(terms, vec!["the", "was", "fine"]);
    }

    #[test]
    fn test_analyzer_name() {
        let analyzer = StandardAnalyzer::new().unwrap();
        assert_eq!(analyzer.name(), "standard");
        assert_eq!(analyzer.inner().pipeline_name(), "standard");
    }
}
