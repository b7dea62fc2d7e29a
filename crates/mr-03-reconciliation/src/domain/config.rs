//! Server-held filter configuration and validation
//!
//! # Example
//!
//! ```
//! use mr_03_reconciliation::ServerFilterConfig;
//!
//! let config = ServerFilterConfig::default()
//!     .with_expected_messages(10_000)
//!     .with_target_fpr(0.001);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;

/// Sizing of the server-held de-duplication filter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerFilterConfig {
    /// Messages the filter is sized for before it is rebuilt larger
    pub expected_messages: usize,
    /// Target false positive rate, in (0, 1)
    pub target_fpr: f64,
    /// Largest bit array the filter may grow to; past this it stops
    /// growing and its false positive rate rises instead
    pub max_filter_bytes: usize,
}

impl Default for ServerFilterConfig {
    fn default() -> Self {
        Self {
            expected_messages: 100_000,
            target_fpr: 0.01,
            max_filter_bytes: 1024 * 1024,
        }
    }
}

impl ServerFilterConfig {
    pub fn validate(&self) -> Result<(), ReconcileError> {
        if self.expected_messages == 0 {
            return Err(ReconcileError::InvalidConfig(
                "expected_messages cannot be 0".to_string(),
            ));
        }

        if !(self.target_fpr > 0.0 && self.target_fpr < 1.0) {
            return Err(ReconcileError::InvalidConfig(format!(
                "target_fpr must be between 0 and 1, got {}",
                self.target_fpr
            )));
        }

        if self.max_filter_bytes == 0 {
            return Err(ReconcileError::InvalidConfig(
                "max_filter_bytes cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder-style method to set the expected message count
    pub fn with_expected_messages(mut self, expected: usize) -> Self {
        self.expected_messages = expected;
        self
    }

    /// Builder-style method to set the target FPR
    pub fn with_target_fpr(mut self, fpr: f64) -> Self {
        self.target_fpr = fpr;
        self
    }

    /// Builder-style method to cap the filter size
    pub fn with_max_filter_bytes(mut self, max_bytes: usize) -> Self {
        self.max_filter_bytes = max_bytes;
        self
    }
}
