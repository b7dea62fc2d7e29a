//! Error types for the reconciliation subsystem

use mr_01_bloom_filter::FilterError;
use mr_02_message_store::StoreError;
use thiserror::Error;

/// Errors that can occur while reconciling or publishing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconcileError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
