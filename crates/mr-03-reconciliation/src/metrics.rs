//! Metrics for publish and reconciliation operations
//!
//! Provides instrumentation points for monitoring query volume, match
//! rates and scan latencies.
//!
//! ## Usage
//!
//! ```
//! use mr_03_reconciliation::Metrics;
//! use std::time::Duration;
//!
//! let metrics = Metrics::new();
//! metrics.record_publish(3, 1);
//! metrics.record_filter_out(Duration::from_micros(40), 2);
//! assert_eq!(metrics.snapshot().messages_added, 3);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

/// Metrics collector for reconciliation operations
///
/// Thread-safe counters shared by all request handlers.
#[derive(Default)]
pub struct Metrics {
    /// Publish calls applied
    pub publishes: AtomicU64,
    /// Identifiers newly added to the store
    pub messages_added: AtomicU64,
    /// Identifiers skipped as already present
    pub duplicates_skipped: AtomicU64,
    /// FilterOut queries answered
    pub filter_out_queries: AtomicU64,
    /// FilterComplement queries answered
    pub filter_complement_queries: AtomicU64,
    /// Identifiers returned by FilterOut
    pub messages_matched: AtomicU64,
    /// Identifiers returned by FilterComplement
    pub candidates_novel: AtomicU64,
    /// Server filter rebuilds
    pub filter_rebuilds: AtomicU64,
    /// Cumulative scan time in nanoseconds
    pub scan_time_ns: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_publish(&self, added: usize, duplicates: usize) {
        self.publishes.fetch_add(1, Ordering::Relaxed);
        self.messages_added.fetch_add(added as u64, Ordering::Relaxed);
        self.duplicates_skipped
            .fetch_add(duplicates as u64, Ordering::Relaxed);
    }

    pub fn record_filter_out(&self, duration: Duration, matched: usize) {
        self.filter_out_queries.fetch_add(1, Ordering::Relaxed);
        self.messages_matched.fetch_add(matched as u64, Ordering::Relaxed);
        self.record_scan(duration);
    }

    pub fn record_filter_complement(&self, duration: Duration, novel: usize) {
        self.filter_complement_queries.fetch_add(1, Ordering::Relaxed);
        self.candidates_novel.fetch_add(novel as u64, Ordering::Relaxed);
        self.record_scan(duration);
    }

    pub fn record_rebuild(&self) {
        self.filter_rebuilds.fetch_add(1, Ordering::Relaxed);
    }

    fn record_scan(&self, duration: Duration) {
        self.scan_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Average scan time over both query kinds, in nanoseconds
    pub fn avg_scan_time_ns(&self) -> u64 {
        let total = self.scan_time_ns.load(Ordering::Relaxed);
        let count = self.filter_out_queries.load(Ordering::Relaxed)
            + self.filter_complement_queries.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            publishes: self.publishes.load(Ordering::Relaxed),
            messages_added: self.messages_added.load(Ordering::Relaxed),
            duplicates_skipped: self.duplicates_skipped.load(Ordering::Relaxed),
            filter_out_queries: self.filter_out_queries.load(Ordering::Relaxed),
            filter_complement_queries: self.filter_complement_queries.load(Ordering::Relaxed),
            messages_matched: self.messages_matched.load(Ordering::Relaxed),
            candidates_novel: self.candidates_novel.load(Ordering::Relaxed),
            filter_rebuilds: self.filter_rebuilds.load(Ordering::Relaxed),
            avg_scan_ns: self.avg_scan_time_ns(),
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub publishes: u64,
    pub messages_added: u64,
    pub duplicates_skipped: u64,
    pub filter_out_queries: u64,
    pub filter_complement_queries: u64,
    pub messages_matched: u64,
    pub candidates_novel: u64,
    pub filter_rebuilds: u64,
    pub avg_scan_ns: u64,
}
