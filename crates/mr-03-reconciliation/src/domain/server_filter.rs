//! Server-held de-duplication filter
//!
//! Tracks every identifier the store has accepted so `filter_complement`
//! can tell callers which of their candidates are novel.
//!
//! INVARIANTS:
//! - Every stored identifier is a member (no false negatives against the store)
//! - The filter is rebuilt from the full member set when it outgrows its
//!   capacity; bits are never cleared otherwise
//! - The bit array never exceeds `max_filter_bytes`; once it reaches that
//!   size the filter stops growing

use std::f64::consts::LN_2;

use mr_01_bloom_filter::{calculate_optimal_parameters, BloomFilter, MAX_HASH_COUNT};
use parking_lot::{RwLock, RwLockWriteGuard};
use tracing::{info, warn};

use super::config::ServerFilterConfig;
use super::engine;
use crate::error::ReconcileError;

/// Filter plus the bookkeeping needed to decide when to grow it
pub(crate) struct FilterState {
    pub(crate) filter: BloomFilter,
    /// Element count the current filter was sized for
    capacity: usize,
    /// Distinct identifiers inserted so far
    members: usize,
    /// Filter is at its size cap and will not be rebuilt again
    at_limit: bool,
}

impl FilterState {
    /// Insert freshly stored identifiers.
    pub(crate) fn record<'a>(&mut self, ids: impl IntoIterator<Item = &'a String>) {
        for id in ids {
            self.filter.insert(id);
            self.members += 1;
        }
    }

    pub(crate) fn needs_rebuild(&self) -> bool {
        self.members > self.capacity && !self.at_limit
    }

    pub(crate) fn members(&self) -> usize {
        self.members
    }
}

/// Thread-safe server-held filter
pub struct ServerFilter {
    state: RwLock<FilterState>,
    target_fpr: f64,
    max_filter_bytes: usize,
}

impl ServerFilter {
    /// Create an empty filter sized by `config`
    pub fn new(config: &ServerFilterConfig) -> Result<Self, ReconcileError> {
        config.validate()?;
        let (filter, at_limit) = sized_filter(
            config.expected_messages,
            config.target_fpr,
            config.max_filter_bytes,
        )?;

        Ok(Self {
            state: RwLock::new(FilterState {
                filter,
                capacity: config.expected_messages,
                members: 0,
                at_limit,
            }),
            target_fpr: config.target_fpr,
            max_filter_bytes: config.max_filter_bytes,
        })
    }

    /// Candidates the server filter does not recognize, in input order
    pub fn complement(&self, candidates: &[String]) -> Vec<String> {
        engine::filter_complement(candidates, &self.state.read().filter)
    }

    /// Copy of the current filter
    pub fn current(&self) -> BloomFilter {
        self.state.read().filter.clone()
    }

    /// Distinct identifiers recorded so far
    pub fn members(&self) -> usize {
        self.state.read().members
    }

    /// Capacity the current filter is sized for
    pub fn capacity(&self) -> usize {
        self.state.read().capacity
    }

    /// Exclusive access for a publish, held across the store mutation so
    /// store and filter change together
    pub(crate) fn lock(&self) -> RwLockWriteGuard<'_, FilterState> {
        self.state.write()
    }

    /// Whether the filter has reached its size cap
    pub fn at_limit(&self) -> bool {
        self.state.read().at_limit
    }

    /// Replace the filter with one sized for at least `members`, built from
    /// the complete member set, no larger than the size cap.
    pub(crate) fn rebuild(
        &self,
        state: &mut FilterState,
        members: &[String],
    ) -> Result<(), ReconcileError> {
        let mut capacity = state.capacity.max(1);
        while capacity < members.len() {
            capacity = capacity.saturating_mul(2);
        }

        let (mut filter, at_limit) =
            sized_filter(capacity, self.target_fpr, self.max_filter_bytes)?;
        for id in members {
            filter.insert(id);
        }

        if at_limit {
            warn!(
                members = members.len(),
                size_bits = filter.size_bits(),
                estimated_fpr = filter.estimated_false_positive_rate(),
                "[mr-03] Server filter reached its size cap"
            );
        } else {
            info!(
                old_capacity = state.capacity,
                new_capacity = capacity,
                size_bits = filter.size_bits(),
                "[mr-03] Rebuilt server filter"
            );
        }

        state.filter = filter;
        state.capacity = capacity;
        state.members = members.len();
        state.at_limit = at_limit;
        Ok(())
    }
}

/// Filter sized for `capacity` at `target_fpr`, shrunk to `max_bytes` when
/// the optimal size is larger. The flag reports whether it was shrunk.
fn sized_filter(
    capacity: usize,
    target_fpr: f64,
    max_bytes: usize,
) -> Result<(BloomFilter, bool), ReconcileError> {
    let params = calculate_optimal_parameters(capacity, target_fpr);
    let max_bits = max_bytes.saturating_mul(8);
    if params.size_bits <= max_bits {
        return Ok((BloomFilter::new(params.size_bits, params.hash_count)?, false));
    }

    let k = ((max_bits as f64 / capacity as f64) * LN_2).round() as usize;
    let filter = BloomFilter::new(max_bits, k.clamp(1, MAX_HASH_COUNT))?;
    Ok((filter, true))
}
