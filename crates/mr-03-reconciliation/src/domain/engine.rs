//! Reconciliation engine
//!
//! Both operations are pure functions of (view, input) -> output.

use mr_01_bloom_filter::BloomFilter;

/// Stored identifiers the requester's filter claims to already know.
///
/// Keeps every id in `snapshot` for which `filter.may_contain(id)` holds,
/// in snapshot order.
pub fn filter_out(snapshot: &[String], filter: &BloomFilter) -> Vec<String> {
    snapshot
        .iter()
        .filter(|id| filter.may_contain(id.as_str()))
        .cloned()
        .collect()
}

/// Candidates the filter does not recognize.
///
/// Keeps every id in `candidates` for which `filter.may_contain(id)` is
/// false, in input order. Repeated candidates are kept as given.
pub fn filter_complement(candidates: &[String], filter: &BloomFilter) -> Vec<String> {
    candidates
        .iter()
        .filter(|id| !filter.may_contain(id.as_str()))
        .cloned()
        .collect()
}
