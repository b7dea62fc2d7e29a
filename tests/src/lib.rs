//! # Message-Reconciliation Test Suite
//!
//! Unified test crate exercising the subsystems together.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── http_scenarios.rs   # End-to-end request flows over the router
//! │   ├── concurrency.rs      # Concurrent publishers and readers
//! │   └── filter_interop.rs   # Wire encoding across filter instances
//! │
//! └── benches/
//!     └── reconciliation_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p mr-tests
//! cargo test -p mr-tests integration::concurrency
//!
//! # Benchmarks
//! cargo bench -p mr-tests
//! ```
