//! Ports Layer
//!
//! The store is a driven port of the reconciliation subsystem.

pub mod outbound;

pub use outbound::MessageStore;
