//! Ports Layer
//!
//! - Driving Port (inbound): `ReconciliationApi`
//! - Driven Port (outbound): `mr_02_message_store::MessageStore`

pub mod inbound;

pub use inbound::ReconciliationApi;
