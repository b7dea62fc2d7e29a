//! Domain Layer - Pure data structure logic
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Pure functions where possible

pub mod bloom_filter;
pub mod hash_functions;
pub mod parameters;

pub use bloom_filter::BloomFilter;
pub use parameters::{
    calculate_optimal_parameters, theoretical_fpr, BloomFilterParams, MAX_HASH_COUNT,
};
