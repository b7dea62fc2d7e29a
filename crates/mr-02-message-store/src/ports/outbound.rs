//! Outbound Ports (Driven Ports)
//!
//! Storage contract the reconciliation engine depends on.

use crate::domain::{BatchOutcome, Snapshot};
use crate::error::StoreError;

/// Ordered, deduplicated set of message identifiers (Driven Port)
///
/// Implementations must be safe to share across threads. Every mutation and
/// the snapshot step are mutually exclusive: no lost updates, no torn reads.
pub trait MessageStore: Send + Sync {
    /// Insert `id` if absent.
    ///
    /// Returns `true` only for the call that actually added it; two racing
    /// calls for the same identifier never both observe `true`.
    fn add(&self, id: &str) -> Result<bool, StoreError>;

    /// Insert a whole publish atomically.
    ///
    /// Readers observe either none or all of the newly added identifiers.
    fn add_batch(&self, ids: &[String]) -> Result<BatchOutcome, StoreError>;

    /// Existence check.
    fn contains(&self, id: &str) -> Result<bool, StoreError>;

    /// Consistent point-in-time copy of all identifiers in insertion order.
    fn snapshot(&self) -> Result<Snapshot, StoreError>;

    /// Number of stored identifiers.
    fn len(&self) -> Result<usize, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}
