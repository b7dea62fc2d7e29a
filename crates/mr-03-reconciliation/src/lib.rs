//! # MR-03 Reconciliation
//!
//! Decides which stored messages a requester is missing, given a compact
//! Bloom filter of what it already holds.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `engine`: `filter_out` and `filter_complement`
//!   - `ServerFilter`: server-held de-duplication filter
//!   - `ServerFilterConfig`: sizing with validation
//!
//! - **Ports Layer** (`ports/`)
//!   - `ReconciliationApi`: Driving port used by the API gateway
//!   - `MessageStore` (from mr-02): Driven port
//!
//! - **Service Layer** (`service/`)
//!   - `ReconciliationService`: Implements `ReconciliationApi`
//!
//! ## Predicate Polarities
//!
//! | Operation | Input | Keeps | Output order |
//! |-----------|-------|-------|--------------|
//! | `filter_out` | requester filter | stored ids with `may_contain == true` | store snapshot |
//! | `filter_complement` | candidate list | candidates with `may_contain == false` against the server filter | input list |
//!
//! Both run against a point-in-time view and never wait for publishes that
//! arrive after the view is taken.

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use domain::{filter_complement, filter_out, ServerFilter, ServerFilterConfig};
pub use error::ReconcileError;
pub use metrics::{Metrics, MetricsSnapshot};
pub use ports::ReconciliationApi;
pub use service::ReconciliationService;
