//! Domain value types for the message store.

pub mod snapshot;

pub use snapshot::Snapshot;

/// Result of applying one publish batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Identifiers that were newly added, in batch order.
    pub added: Vec<String>,
    /// Identifiers skipped because they were already present
    /// (including repeats within the same batch).
    pub duplicates: usize,
}

impl BatchOutcome {
    /// Number of identifiers newly added.
    pub fn added_count(&self) -> usize {
        self.added.len()
    }
}
