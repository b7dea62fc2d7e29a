//! Adapters Layer
//!
//! Concrete `MessageStore` backends.

pub mod memory;

pub use memory::InMemoryMessageStore;
