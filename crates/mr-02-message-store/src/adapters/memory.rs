//! In-memory message store.
//!
//! Lives for the process lifetime; nothing is persisted.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use tracing::debug;

use crate::domain::{BatchOutcome, Snapshot};
use crate::error::StoreError;
use crate::ports::MessageStore;

/// Store state guarded by a single lock so the ordered sequence and the
/// existence index can never disagree.
#[derive(Default)]
struct Inner {
    /// Identifiers in insertion order
    order: Vec<String>,
    /// Existence index over `order`
    index: HashSet<String>,
    /// Snapshot of `order`, rebuilt lazily after a mutation
    cached: Option<Snapshot>,
}

impl Inner {
    fn insert(&mut self, id: &str) -> bool {
        if self.index.contains(id) {
            return false;
        }
        self.index.insert(id.to_owned());
        self.order.push(id.to_owned());
        self.cached = None;
        true
    }
}

/// Thread-safe in-memory `MessageStore`.
///
/// Coarse-grained locking: one `RwLock` covers the whole state. Readers
/// share snapshots, so a long scan never holds the lock.
#[derive(Default)]
pub struct InMemoryMessageStore {
    inner: RwLock<Inner>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `ids` (duplicates dropped).
    pub fn with_messages<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut inner = Inner::default();
        for id in ids {
            inner.insert(id.as_ref());
        }
        Self {
            inner: RwLock::new(inner),
        }
    }
}

impl MessageStore for InMemoryMessageStore {
    fn add(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.inner.write().insert(id))
    }

    fn add_batch(&self, ids: &[String]) -> Result<BatchOutcome, StoreError> {
        let mut outcome = BatchOutcome::default();
        let mut inner = self.inner.write();

        for id in ids {
            if inner.insert(id) {
                outcome.added.push(id.clone());
            } else {
                outcome.duplicates += 1;
            }
        }
        drop(inner);

        debug!(
            added = outcome.added.len(),
            duplicates = outcome.duplicates,
            "[mr-02] Applied publish batch"
        );
        Ok(outcome)
    }

    fn contains(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.inner.read().index.contains(id))
    }

    fn snapshot(&self) -> Result<Snapshot, StoreError> {
        let inner = self.inner.upgradable_read();
        if let Some(snapshot) = &inner.cached {
            return Ok(snapshot.clone());
        }

        let snapshot = Snapshot::new(Arc::from(inner.order.as_slice()));
        let mut inner = RwLockUpgradableReadGuard::upgrade(inner);
        inner.cached = Some(snapshot.clone());
        Ok(snapshot)
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.inner.read().order.len())
    }
}
