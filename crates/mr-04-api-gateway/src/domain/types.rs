//! Wire types for the HTTP endpoints.

use mr_01_bloom_filter::BloomFilter;
use mr_03_reconciliation::MetricsSnapshot;
use serde::{Deserialize, Serialize};

use super::config::LimitsConfig;
use super::error::ApiError;
use crate::metrics::GatewayMetricsSnapshot;

/// `POST /publish` body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishRequest {
    #[serde(default)]
    pub messages: Vec<String>,
}

/// `POST /bloom-request` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloomRequest {
    pub bloom: BloomEncoding,
}

/// A Bloom filter as it travels over the wire: hex bit array plus hash count.
///
/// `k` is kept signed so that zero and negative values reach validation and
/// come back as an invalid-filter error rather than a JSON decode error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloomEncoding {
    pub filter: String,
    pub k: i64,
}

impl BloomEncoding {
    /// Encode a filter for transmission
    pub fn from_filter(filter: &BloomFilter) -> Self {
        let (bytes, k) = filter.to_bytes();
        Self {
            filter: hex::encode(bytes),
            k: k as i64,
        }
    }

    /// Rebuild the filter, enforcing the configured limits
    pub fn decode(&self, limits: &LimitsConfig) -> Result<BloomFilter, ApiError> {
        if self.k <= 0 {
            return Err(ApiError::InvalidFilter(format!(
                "hash count must be positive, got {}",
                self.k
            )));
        }
        let k = usize::try_from(self.k).map_err(|_| {
            ApiError::InvalidFilter(format!("hash count {} is out of range", self.k))
        })?;
        if k > limits.max_hash_count {
            return Err(ApiError::InvalidFilter(format!(
                "hash count {} exceeds limit {}",
                k, limits.max_hash_count
            )));
        }

        // Checked before decoding so an oversized payload is never allocated twice
        if self.filter.len() / 2 > limits.max_filter_bytes {
            return Err(ApiError::InvalidFilter(format!(
                "filter of {} bytes exceeds limit {}",
                self.filter.len() / 2,
                limits.max_filter_bytes
            )));
        }

        let bytes = hex::decode(&self.filter)?;
        Ok(BloomFilter::from_bytes(&bytes, k)?)
    }
}

/// `POST /bloom-request` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub messages: Vec<String>,
}

/// `POST /notify` body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotifyRequest {
    #[serde(rename = "msgHashes", default)]
    pub msg_hashes: Vec<String>,
}

/// `POST /notify` response: candidates the server has not seen
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotifyResponse {
    #[serde(rename = "msgHashes")]
    pub msg_hashes: Vec<String>,
}

/// `GET /server-filter` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerFilterResponse {
    pub bloom: BloomEncoding,
}

/// `GET /health` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub messages: usize,
}

/// `GET /metrics` response
#[derive(Debug, Clone, Serialize)]
pub struct MetricsResponse {
    pub reconciliation: MetricsSnapshot,
    pub gateway: GatewayMetricsSnapshot,
}

/// Query parameters accepted by every endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeoutParams {
    pub timeout: Option<String>,
}

impl TimeoutParams {
    /// Pick the first `timeout` value out of raw query pairs; repeats and
    /// unknown keys are ignored
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            timeout: pairs
                .into_iter()
                .find(|(key, _)| key == "timeout")
                .map(|(_, value)| value),
        }
    }
}
