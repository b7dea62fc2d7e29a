//! Gateway configuration with validation.

use mr_03_reconciliation::ServerFilterConfig;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Main gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Request size and filter limits
    pub limits: LimitsConfig,
    /// Timeout configuration
    pub timeouts: TimeoutConfig,
    /// Sizing of the server-held filter used by `/notify`
    pub server_filter: ServerFilterConfig,
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Invalid("http port cannot be 0".into()));
        }

        if self.limits.max_body_bytes == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_body_bytes cannot be 0".into(),
            ));
        }

        if self.limits.max_filter_bytes == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_filter_bytes cannot be 0".into(),
            ));
        }

        if self.limits.max_hash_count == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_hash_count cannot be 0".into(),
            ));
        }

        // A hex-encoded filter doubles in size on the wire
        if self.limits.max_filter_bytes.saturating_mul(2) > self.limits.max_body_bytes {
            return Err(ConfigError::InvalidLimit(
                "max_body_bytes must fit a hex-encoded filter of max_filter_bytes".into(),
            ));
        }

        if self.timeouts.default_request == Some(Duration::ZERO) {
            return Err(ConfigError::InvalidTimeout(
                "default_request timeout cannot be 0".into(),
            ));
        }

        self.server_filter
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        // `/server-filter` must stay decodable by a peer with the same limits
        if self.server_filter.max_filter_bytes > self.limits.max_filter_bytes {
            return Err(ConfigError::InvalidLimit(
                "server_filter.max_filter_bytes cannot exceed limits.max_filter_bytes".into(),
            ));
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 8080)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8080,
        }
    }
}

/// Request validation limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes
    pub max_body_bytes: usize,
    /// Maximum decoded filter size in bytes
    pub max_filter_bytes: usize,
    /// Maximum hash count accepted in a filter
    pub max_hash_count: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 4 * 1024 * 1024,
            max_filter_bytes: 1024 * 1024,
            max_hash_count: mr_01_bloom_filter::MAX_HASH_COUNT,
        }
    }
}

/// Timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline applied when a request carries no valid `timeout` parameter.
    /// `None` means requests only end on completion or cancellation.
    #[serde(with = "humantime_serde")]
    pub default_request: Option<Duration>,
    /// How long in-flight requests get to finish on shutdown
    #[serde(with = "humantime_serde")]
    pub shutdown_grace: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            default_request: None,
            shutdown_grace: Duration::from_secs(2),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
