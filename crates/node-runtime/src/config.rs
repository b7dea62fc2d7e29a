//! # Node Configuration
//!
//! Gateway defaults with overrides from the environment.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `MR_HTTP_HOST` | `http.host` |
//! | `MR_HTTP_PORT` | `http.port` |
//! | `MR_SERVER_FILTER_CAPACITY` | `server_filter.expected_messages` |
//! | `MR_SERVER_FILTER_FPR` | `server_filter.target_fpr` |
//! | `MR_MAX_BODY_BYTES` | `limits.max_body_bytes` |
//! | `MR_REQUEST_TIMEOUT` | `timeouts.default_request` (e.g. `30s`) |
//!
//! The log filter is read separately from `RUST_LOG`.

use std::str::FromStr;

use anyhow::{Context, Result};
use mr_04_api_gateway::GatewayConfig;
use tracing::info;

/// Load configuration from the process environment.
pub fn load_config() -> Result<GatewayConfig> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Load configuration using `lookup` to resolve variables.
pub fn load_config_from(lookup: impl Fn(&str) -> Option<String>) -> Result<GatewayConfig> {
    let mut config = GatewayConfig::default();

    if let Some(host) = parsed(&lookup, "MR_HTTP_HOST")? {
        config.http.host = host;
    }
    if let Some(port) = parsed(&lookup, "MR_HTTP_PORT")? {
        config.http.port = port;
    }
    if let Some(capacity) = parsed(&lookup, "MR_SERVER_FILTER_CAPACITY")? {
        config.server_filter.expected_messages = capacity;
    }
    if let Some(fpr) = parsed(&lookup, "MR_SERVER_FILTER_FPR")? {
        config.server_filter.target_fpr = fpr;
    }
    if let Some(max_body) = parsed(&lookup, "MR_MAX_BODY_BYTES")? {
        config.limits.max_body_bytes = max_body;
    }
    if let Some(raw) = lookup("MR_REQUEST_TIMEOUT") {
        let timeout = humantime::parse_duration(raw.trim())
            .with_context(|| format!("MR_REQUEST_TIMEOUT has invalid duration {:?}", raw))?;
        config.timeouts.default_request = Some(timeout);
    }

    config.validate().context("invalid gateway configuration")?;
    info!(addr = %config.http_addr(), "Loaded configuration");
    Ok(config)
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{} has invalid value {:?}", key, raw))
        })
        .transpose()
}
