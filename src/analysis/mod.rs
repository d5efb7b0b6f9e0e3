//! Text analysis for review documents.
//!
//! Raw text is split into tokens, case-folded, and stripped of stop words
//! before the vectorizers ever see it.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::*;
pub use token::*;
pub use token_filter::*;
pub use tokenizer::*;
