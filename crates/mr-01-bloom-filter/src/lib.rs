//! # MR-01 Bloom Filter
//!
//! Fixed-size probabilistic set used by peers to describe the message
//! identifiers they already hold.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure data structure, no I/O
//!   - `BloomFilter`: bit array addressed by `k` hash functions
//!   - `hash_functions`: MurmurHash3 double hashing
//!   - `parameters`: optimal `m`/`k` and false-positive math
//!
//! ## Invariants
//!
//! - **No false negatives**: if inserted, `may_contain()` MUST return true
//! - **Bounded false positives**: FPR ~ (1 - e^(-kn/m))^k
//! - **Lossless wire format**: `from_bytes(to_bytes(f)) == f`, with
//!   `m = bytes.len() * 8`
//!
//! ## Usage Example
//!
//! ```
//! use mr_01_bloom_filter::BloomFilter;
//!
//! let mut filter = BloomFilter::new(1024, 7)?;
//! filter.insert("msg-a");
//! assert!(filter.may_contain("msg-a"));
//!
//! let (bytes, k) = filter.to_bytes();
//! let restored = BloomFilter::from_bytes(&bytes, k)?;
//! assert_eq!(restored, filter);
//! # Ok::<(), mr_01_bloom_filter::FilterError>(())
//! ```

pub mod domain;
pub mod error;

pub use domain::{
    calculate_optimal_parameters, theoretical_fpr, BloomFilter, BloomFilterParams,
    MAX_HASH_COUNT,
};
pub use error::FilterError;
