//! Gateway request counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

/// API Gateway metrics, one counter per terminal request phase
#[derive(Default)]
pub struct GatewayMetrics {
    pub requests_completed: AtomicU64,
    pub requests_timed_out: AtomicU64,
    pub requests_failed: AtomicU64,

    // Latency of completed requests
    pub total_latency_us: AtomicU64,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request that produced a success response
    pub fn record_completed(&self, latency: Duration) {
        self.requests_completed.fetch_add(1, Ordering::Relaxed);
        self.total_latency_us
            .fetch_add(latency.as_micros() as u64, Ordering::Relaxed);
    }

    /// Record a deadline expiry or cancellation
    pub fn record_timed_out(&self) {
        self.requests_timed_out.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a decode, encode or internal failure
    pub fn record_failed(&self) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Average latency of completed requests in microseconds
    pub fn average_latency_us(&self) -> u64 {
        let total = self.total_latency_us.load(Ordering::Relaxed);
        let count = self.requests_completed.load(Ordering::Relaxed);
        if count == 0 {
            0
        } else {
            total / count
        }
    }

    pub fn snapshot(&self) -> GatewayMetricsSnapshot {
        GatewayMetricsSnapshot {
            requests_completed: self.requests_completed.load(Ordering::Relaxed),
            requests_timed_out: self.requests_timed_out.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            avg_latency_us: self.average_latency_us(),
        }
    }
}

/// Point-in-time gateway counters
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GatewayMetricsSnapshot {
    pub requests_completed: u64,
    pub requests_timed_out: u64,
    pub requests_failed: u64,
    pub avg_latency_us: u64,
}
