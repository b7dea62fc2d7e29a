//! # MR-02 Message Store
//!
//! Ordered, deduplicated collection of published message identifiers,
//! shared by every request handler in the process.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | No duplicate identifiers | `adapters/memory.rs` - index check under write lock |
//! | Insertion order preserved | `adapters/memory.rs` - append-only `order` vector |
//! | Publish is never torn | `adapters/memory.rs` - `add_batch()` holds one write guard |
//! | Readers see a point-in-time view | `domain/snapshot.rs` - immutable `Arc<[String]>` |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! adapters/memory.rs  - InMemoryMessageStore (parking_lot RwLock)
//!        ↑ implements
//! ports/outbound.rs   - MessageStore trait
//!        ↑ uses
//! domain/             - Snapshot, BatchOutcome
//! ```
//!
//! The reconciliation engine only depends on the `MessageStore` trait, so a
//! persistent backend can replace the in-memory adapter without changes
//! upstream.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;

pub use adapters::InMemoryMessageStore;
pub use domain::{BatchOutcome, Snapshot};
pub use error::StoreError;
pub use ports::MessageStore;
