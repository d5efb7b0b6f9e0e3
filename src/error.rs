//! Error types for the sentibench library.
//!
//! All fallible operations return [`Result`], whose error is the
//! [`SentibenchError`] enum.
//!
//! # Examples
//!
//! ```
//! use sentibench::error::{Result, SentibenchError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SentibenchError::invalid_config("test_fraction must be in (0, 1)"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for sentibench operations.
#[derive(Error, Debug)]
pub enum SentibenchError {
    /// I/O errors (reading datasets or config files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV decoding errors raised while reading a dataset
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Dataset-related errors (missing columns, unusable labels)
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Invalid configuration, reported before any fitting starts
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Classifier misuse (unfitted model, mismatched inputs)
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// Errors raised while scoring an evaluation cell
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SentibenchError.
pub type Result<T> = std::result::Result<T, SentibenchError>;

impl SentibenchError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SentibenchError::Analysis(msg.into())
    }

    /// Create a new dataset error.
    pub fn dataset<S: Into<String>>(msg: S) -> Self {
        SentibenchError::Dataset(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        SentibenchError::InvalidConfig(msg.into())
    }

    /// Create a new classifier error.
    pub fn classifier<S: Into<String>>(msg: S) -> Self {
        SentibenchError::Classifier(msg.into())
    }

    /// Create a new evaluation error.
    pub fn evaluation<S: Into<String>>(msg: S) -> Self {
        SentibenchError::Evaluation(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SentibenchError::Other(msg.into())
    }

    /// Whether this error stems from configuration rather than data or I/O.
    pub fn is_config_error(&self) -> bool {
        matches!(self, SentibenchError::InvalidConfig(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = SentibenchError::analysis("bad pattern");
        assert_eq!(error.to_string(), "Analysis error: bad pattern");

        let error = SentibenchError::invalid_config("unknown method 'bow'");
        assert_eq!(
            error.to_string(),
            "Invalid configuration: unknown method 'bow'"
        );
        assert!(error.is_config_error());

        let error = SentibenchError::classifier("model not fitted");
        assert_eq!(error.to_string(), "Classifier error: model not fitted");
        assert!(!error.is_config_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = SentibenchError::from(io_error);

        match error {
            SentibenchError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
