//! Service Layer
//!
//! Orchestrates the engine, the server-held filter and the injected store.

pub mod reconciliation_service;

pub use reconciliation_service::ReconciliationService;
