//! Message store error types.

use thiserror::Error;

/// Errors surfaced by a `MessageStore` backend.
///
/// The in-memory adapter never fails; the variants exist for backends
/// that do I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing storage rejected or failed the operation.
    #[error("storage backend error: {0}")]
    Backend(String),
}
