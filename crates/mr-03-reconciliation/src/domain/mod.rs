//! Domain Layer - Pure reconciliation logic
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod config;
pub mod engine;
pub mod server_filter;

pub use config::ServerFilterConfig;
pub use engine::{filter_complement, filter_out};
pub use server_filter::ServerFilter;
