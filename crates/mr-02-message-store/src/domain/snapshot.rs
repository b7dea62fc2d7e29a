//! Point-in-time view of the store.

use std::ops::Deref;
use std::sync::Arc;

/// Immutable, cheaply clonable copy of the stored identifiers in
/// insertion order.
///
/// Later publishes never affect an existing snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    ids: Arc<[String]>,
}

impl Snapshot {
    pub fn new(ids: Arc<[String]>) -> Self {
        Self { ids }
    }

    /// An empty snapshot.
    pub fn empty() -> Self {
        Self {
            ids: Arc::from(Vec::new()),
        }
    }

    /// True if both snapshots share the same backing allocation.
    pub fn ptr_eq(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.ids, &other.ids)
    }
}

impl Deref for Snapshot {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.ids
    }
}

impl From<Vec<String>> for Snapshot {
    fn from(ids: Vec<String>) -> Self {
        Self { ids: ids.into() }
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}
