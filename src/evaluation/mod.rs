//! Comparing feature methods and classifiers on held-out data.

pub mod config;
pub mod harness;
pub mod metrics;
pub mod report;

pub use config::EvaluationConfig;
pub use harness::EvaluationHarness;
pub use metrics::{accuracy, majority_baseline};
pub use report::{ResultEntry, ResultTable, result_key};
