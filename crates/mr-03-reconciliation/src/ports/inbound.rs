//! Inbound Ports (Driving Ports)
//!
//! The API external components use to publish and reconcile.

use mr_01_bloom_filter::BloomFilter;
use mr_02_message_store::BatchOutcome;

use crate::error::ReconcileError;
use crate::metrics::MetricsSnapshot;

/// Primary reconciliation API (Driving Port)
///
/// All operations are synchronous and may scan the whole store; async
/// callers are expected to run them on a blocking-capable thread.
pub trait ReconciliationApi: Send + Sync {
    /// Add identifiers to the store, skipping ones already present
    ///
    /// The batch is applied atomically: concurrent readers see all of it
    /// or none of it.
    fn publish(&self, ids: &[String]) -> Result<BatchOutcome, ReconcileError>;

    /// Stored identifiers the requester's filter claims to already know
    fn filter_out(&self, filter: &BloomFilter) -> Result<Vec<String>, ReconcileError>;

    /// Candidates the server-held filter does not recognize
    fn filter_complement(&self, candidates: &[String]) -> Result<Vec<String>, ReconcileError>;

    /// Copy of the server-held filter
    fn server_filter(&self) -> BloomFilter;

    /// Number of stored identifiers
    fn message_count(&self) -> Result<usize, ReconcileError>;

    /// Current operation counters
    fn metrics(&self) -> MetricsSnapshot;
}
