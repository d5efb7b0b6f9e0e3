//! Stop filter implementation.
//!
//! Removes high-frequency, low-information words before they reach the
//! vocabulary. The word list is explicit configuration ([`StopWords`]) handed
//! to the filter at construction time.
//!
//! # Examples
//!
//! ```
//! use sentibench::analysis::token_filter::Filter;
//! use sentibench::analysis::token_filter::stop::StopFilter;
//! use sentibench::analysis::token::Token;
//!
//! let filter = StopFilter::new(); // default English stop words
//! let tokens = vec![
//!     Token::new("the", 0),
//!     Token::new("acting", 1),
//!     Token::new("was", 2),
//!     Token::new("great", 3),
//! ];
//!
//! let result: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(result.len(), 2);
//! assert_eq!(result[0].text, "acting");
//! assert_eq!(result[1].text, "great");
//! ```

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::{Result, SentibenchError};

/// Default English stop words list.
const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Default English stop words as a HashSet.
pub static DEFAULT_ENGLISH_STOP_WORDS_SET: LazyLock<HashSet<String>> = LazyLock::new(|| {
    DEFAULT_ENGLISH_STOP_WORDS
        .iter()
        .map(|&s| s.to_string())
        .collect()
});

/// Which stop word set an analyzer should remove.
///
/// Serialized as `"english"`, `"none"` or `{"custom": ["..."]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopWords {
    /// The built-in English list.
    #[default]
    English,
    /// Keep every token.
    None,
    /// A caller-supplied list; entries are case-folded on load.
    Custom(Vec<String>),
}

impl StopWords {
    /// Materialize the configured words as a set of lowercase strings.
    pub fn to_set(&self) -> HashSet<String> {
        match self {
            StopWords::English => DEFAULT_ENGLISH_STOP_WORDS_SET.clone(),
            StopWords::None => HashSet::new(),
            StopWords::Custom(words) => words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }
}

impl FromStr for StopWords {
    type Err = SentibenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(StopWords::English),
            "none" | "off" => Ok(StopWords::None),
            other => Err(SentibenchError::invalid_config(format!(
                "unknown stop word set '{other}' (expected 'english' or 'none')"
            ))),
        }
    }
}

/// A filter that removes stop words from the token stream.
///
/// Tokens are compared verbatim, so this filter belongs after
/// [`LowercaseFilter`](crate::analysis::token_filter::LowercaseFilter) in a
/// pipeline.
#[derive(Clone, Debug)]
pub struct StopFilter {
    /// The set of stop words to remove
    stop_words: Arc<HashSet<String>>,
}

impl StopFilter {
    /// Create a new stop filter with the default English stop words.
    pub fn new() -> Self {
        Self::with_stop_words(DEFAULT_ENGLISH_STOP_WORDS_SET.clone())
    }

    /// Create a stop filter for a configured [`StopWords`] set.
    pub fn from_config(stop_words: &StopWords) -> Self {
        Self::with_stop_words(stop_words.to_set())
    }

    /// Create a new stop filter with custom stop words.
    pub fn with_stop_words(stop_words: HashSet<String>) -> Self {
        StopFilter {
            stop_words: Arc::new(stop_words),
        }
    }

    /// Create a new stop filter from a list of stop words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stop_words = words.into_iter().map(|s| s.into()).collect();
        Self::with_stop_words(stop_words)
    }

    /// Check if a word is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Get the number of stop words.
    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    /// Check if the stop word set is empty.
    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens: Vec<Token> = tokens
            .filter(|token| !self.is_stop_word(&token.text))
            .collect();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_stop_filter() {
        let filter = StopFilter::from_words(vec!["the", "and", "or"]);
        let tokens = vec![
            Token::new("hello", 0),
            Token::new("the", 1),
            Token::new("world", 2),
            Token::new("and", 3),
            Token::new("test", 4),
        ];

        let result: Vec<Token> = filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .collect();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].text, "hello");
        assert_eq!(result[1].text, "world");
        assert_eq!(result[2].text, "test");
    }

    #[test]
    fn test_stop_filter_keeps_positions() {
        let filter = StopFilter::from_words(vec!["the", "and"]);
        let tokens = vec![
            Token::new("hello", 0),
            Token::new("the", 1),
            Token::new("world", 2),
        ];

        let result: Vec<Token> = filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .collect();

        assert_eq!(result.len(), 2);
        assert_eq!(result[1].text, "world");
        assert_eq!(result[1].position, 2);
    }

    #[test]
    fn test_stop_words_config() {
        assert!(StopWords::English.to_set().contains("the"));
        assert!(StopWords::None.to_set().is_empty());

        let custom = StopWords::Custom(vec!["Movie".to_string(), "FILM".to_string()]);
        let set = custom.to_set();
        assert!(set.contains("movie"));
        assert!(set.contains("film"));

        let filter = StopFilter::from_config(&StopWords::None);
        assert!(filter.is_empty());
    }

    #[test]
    fn test_stop_words_from_str() {
        assert_eq!("english".parse::<StopWords>().unwrap(), StopWords::English);
        assert_eq!("NONE".parse::<StopWords>().unwrap(), StopWords::None);
        assert!("klingon".parse::<StopWords>().unwrap_err().is_config_error());
    }

    #[test]
    fn test_stop_words_serde() {
        let json = serde_json::to_string(&StopWords::English).unwrap();
        assert_eq!(json, "\"english\"");

        let custom: StopWords = serde_json::from_str(r#"{"custom": ["meh"]}"#).unwrap();
        assert_eq!(custom, StopWords::Custom(vec!["meh".to_string()]));
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(StopFilter::new().name(), "stop");
    }
}
