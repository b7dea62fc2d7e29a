//! Core Bloom filter implementation
//!
//! INVARIANTS:
//! - m > 0 and k >= 1; m is a whole number of bytes and never changes
//! - Bits are only ever set, never cleared by a lookup
//! - No false negatives: if inserted, may_contain() MUST return true
//!
//! Wire format: `ceil(m/8)` bytes, bit `i` stored in byte `i / 8` at
//! sub-bit `i % 8` (least significant first), plus the hash count `k`.

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use super::hash_functions::hash_positions;
use super::parameters::calculate_optimal_parameters;
use crate::error::FilterError;

/// Bloom filter for probabilistic membership testing
///
/// A Bloom filter is a space-efficient probabilistic data structure that
/// can test whether an element is a member of a set. False positives are
/// possible, but false negatives are not.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFilter", into = "RawFilter")]
pub struct BloomFilter {
    /// Bit array storing the filter state
    bits: BitVec<u8, Lsb0>,
    /// Number of hash functions (k)
    k: usize,
}

/// Serde shape of a filter, validated on the way in
#[derive(Serialize, Deserialize)]
struct RawFilter {
    bits: Vec<u8>,
    k: usize,
}

impl TryFrom<RawFilter> for BloomFilter {
    type Error = FilterError;

    fn try_from(raw: RawFilter) -> Result<Self, Self::Error> {
        BloomFilter::from_bytes(&raw.bits, raw.k)
    }
}

impl From<BloomFilter> for RawFilter {
    fn from(filter: BloomFilter) -> Self {
        let (bits, k) = filter.to_bytes();
        RawFilter { bits, k }
    }
}

impl BloomFilter {
    /// Create an empty filter with `m` bits and `k` hash functions
    ///
    /// `m` is rounded up to the next multiple of 8 so that the serialized
    /// form reconstructs the same index mapping.
    pub fn new(m: usize, k: usize) -> Result<Self, FilterError> {
        if m == 0 || k == 0 {
            return Err(FilterError::InvalidParameters { m, k });
        }
        let m = m.div_ceil(8) * 8;
        Ok(Self {
            bits: bitvec![u8, Lsb0; 0; m],
            k,
        })
    }

    /// Create an empty filter sized for `expected_elements` at `target_fpr`
    pub fn with_capacity(expected_elements: usize, target_fpr: f64) -> Result<Self, FilterError> {
        if !(target_fpr > 0.0 && target_fpr < 1.0) {
            return Err(FilterError::InvalidFalsePositiveRate(target_fpr));
        }
        let params = calculate_optimal_parameters(expected_elements, target_fpr);
        Self::new(params.size_bits, params.hash_count)
    }

    /// Reconstruct a filter from its serialized bit array and hash count
    ///
    /// The bit count is recovered as `bits.len() * 8`.
    pub fn from_bytes(bits: &[u8], k: usize) -> Result<Self, FilterError> {
        if bits.is_empty() {
            return Err(FilterError::MalformedFilter(
                "bit array must not be empty".to_string(),
            ));
        }
        if k == 0 {
            return Err(FilterError::MalformedFilter(
                "hash count must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            bits: BitVec::from_slice(bits),
            k,
        })
    }

    /// Insert an element into the filter
    ///
    /// Idempotent: inserting the same element twice leaves the bits unchanged.
    pub fn insert(&mut self, element: impl AsRef<[u8]>) {
        let m = self.bits.len();
        for pos in hash_positions(element.as_ref(), self.k, m) {
            self.bits.set(pos, true);
        }
    }

    /// Test if an element might be in the filter
    ///
    /// Returns:
    /// - `true` if the element might be in the set (could be false positive)
    /// - `false` if the element is definitely NOT in the set
    pub fn may_contain(&self, element: impl AsRef<[u8]>) -> bool {
        let m = self.bits.len();
        hash_positions(element.as_ref(), self.k, m).all(|pos| self.bits[pos])
    }

    /// Serialize the filter into its bit array and hash count
    pub fn to_bytes(&self) -> (Vec<u8>, usize) {
        (self.bits.as_raw_slice().to_vec(), self.k)
    }

    /// Borrow the serialized bit array without copying
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    /// Merge another filter into this one (OR operation)
    ///
    /// After merge, this filter will match all elements from both filters.
    pub fn merge(&mut self, other: &BloomFilter) -> Result<(), FilterError> {
        if self.bits.len() != other.bits.len() || self.k != other.k {
            return Err(FilterError::IncompatibleFilters {
                left_m: self.bits.len(),
                left_k: self.k,
                right_m: other.bits.len(),
                right_k: other.k,
            });
        }

        let self_raw = self.bits.as_raw_mut_slice();
        for (s, o) in self_raw.iter_mut().zip(other.bits.as_raw_slice()) {
            *s |= *o;
        }
        Ok(())
    }

    /// Get the filter size in bits (m)
    pub fn size_bits(&self) -> usize {
        self.bits.len()
    }

    /// Get the number of hash functions (k)
    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// Get the number of bits set in the filter
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Fraction of bits set, in [0, 1]
    pub fn fill_ratio(&self) -> f64 {
        self.bits_set() as f64 / self.size_bits() as f64
    }

    /// False positive rate implied by the current fill ratio: (X/m)^k
    ///
    /// Unlike the insertion-count formula this stays valid for filters
    /// reconstructed from bytes, where the number of insertions is unknown.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        self.fill_ratio().powi(self.k as i32)
    }

    /// Estimate how many distinct elements were inserted
    ///
    /// Swamidass-Baldi: n ≈ -(m/k) * ln(1 - X/m). Saturated filters
    /// report infinity.
    pub fn estimated_len(&self) -> f64 {
        let m = self.size_bits() as f64;
        let x = self.bits_set() as f64;
        if x >= m {
            return f64::INFINITY;
        }
        -(m / self.k as f64) * (1.0 - x / m).ln()
    }

    /// True when no bit is set
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }
}
