//! Deterministic train/test partitioning.

pub mod split;

pub use split::{Partitioner, Split, split};
