//! Lowercase filter implementation.
//!
//! # Examples
//!
//! ```
//! use sentibench::analysis::token_filter::Filter;
//! use sentibench::analysis::token_filter::lowercase::LowercaseFilter;
//! use sentibench::analysis::token::Token;
//!
//! let filter = LowercaseFilter::new();
//! let tokens = vec![Token::new("Great", 0), Token::new("ACTING", 1)];
//! let filtered: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(filtered[0].text, "great");
//! assert_eq!(filtered[1].text, "acting");
//! ```

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that case-folds token text.
///
/// ASCII-only tokens take the cheap `to_ascii_lowercase` path; everything
/// else goes through Unicode-aware `to_lowercase`. Positions and offsets are
/// preserved.
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    /// Create a new lowercase filter.
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens: Vec<_> = tokens
            .map(|mut token| {
                token.text = if token.text.is_ascii() {
                    token.text.to_ascii_lowercase()
                } else {
                    token.text.to_lowercase()
                };
                token
            })
            .collect();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}
