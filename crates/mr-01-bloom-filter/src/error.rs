//! Error types for the Bloom filter

use thiserror::Error;

/// Errors that can occur when building or reconstructing a filter
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("Invalid filter parameters: m={m}, k={k} (both must be > 0)")]
    InvalidParameters { m: usize, k: usize },

    #[error("Invalid false positive rate: {0} (must be between 0 and 1)")]
    InvalidFalsePositiveRate(f64),

    #[error("Malformed filter: {0}")]
    MalformedFilter(String),

    #[error("Incompatible filters: ({left_m}, {left_k}) vs ({right_m}, {right_k})")]
    IncompatibleFilters {
        left_m: usize,
        left_k: usize,
        right_m: usize,
        right_k: usize,
    },
}
