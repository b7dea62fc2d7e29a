//! Request coordinator: per-request state machine and deadline race.
//!
//! ```text
//! Received → Decoding → Computing → Completed
//!                │           ├────→ TimedOut   (deadline, shutdown)
//!                └───────────┴────→ Failed     (decode, internal)
//! ```
//!
//! The deadline is fixed when the request is received. Computation runs on
//! the blocking pool and is raced against the deadline and the shutdown
//! signal; the loser is abandoned, not interrupted. A publish that has been
//! dispatched therefore always finishes applying even when the caller has
//! already been told it timed out.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use mr_03_reconciliation::{ReconcileError, ReconciliationApi};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::domain::config::LimitsConfig;
use crate::domain::error::{ApiError, ApiResult};
use crate::domain::types::{
    BloomEncoding, BloomRequest, HealthResponse, MessagesResponse, MetricsResponse,
    NotifyRequest, NotifyResponse, PublishRequest, ServerFilterResponse,
};
use crate::metrics::GatewayMetrics;

/// Parse a caller-supplied timeout such as `5s`, `250ms` or `1m 30s`.
///
/// A negative duration such as `-1s` is already over and comes back as
/// zero. Anything unparseable is treated as absent.
pub fn parse_timeout(raw: Option<&str>) -> Option<Duration> {
    let raw = raw?.trim();
    let (negative, magnitude) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    match humantime::parse_duration(magnitude) {
        Ok(_) if negative => Some(Duration::ZERO),
        Ok(duration) => Some(duration),
        Err(e) => {
            debug!(timeout = raw, error = %e, "[mr-04] Ignoring unparseable timeout");
            None
        }
    }
}

/// Point in time after which a request is answered with a timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
    At(Instant),
    /// Ends only on completion or cancellation
    None,
}

impl Deadline {
    /// Deadline `timeout` from now
    pub fn after(timeout: Option<Duration>) -> Self {
        timeout
            .and_then(|d| Instant::now().checked_add(d))
            .map_or(Deadline::None, Deadline::At)
    }

    pub fn expired(&self) -> bool {
        match self {
            Deadline::At(at) => Instant::now() >= *at,
            Deadline::None => false,
        }
    }

    async fn elapsed(self) {
        match self {
            Deadline::At(at) => tokio::time::sleep_until(at).await,
            Deadline::None => std::future::pending().await,
        }
    }
}

/// Lifecycle of a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Received,
    Decoding,
    Computing,
    Completed,
    TimedOut,
    Failed,
}

impl RequestPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestPhase::Received => "received",
            RequestPhase::Decoding => "decoding",
            RequestPhase::Computing => "computing",
            RequestPhase::Completed => "completed",
            RequestPhase::TimedOut => "timed_out",
            RequestPhase::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestPhase::Completed | RequestPhase::TimedOut | RequestPhase::Failed
        )
    }
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Publish,
    FilterOut,
    FilterComplement,
    Health,
    ServerFilter,
    Metrics,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Publish => "publish",
            Operation::FilterOut => "filter_out",
            Operation::FilterComplement => "filter_complement",
            Operation::Health => "health",
            Operation::ServerFilter => "server_filter",
            Operation::Metrics => "metrics",
        })
    }
}

/// Drives every request from decode to a terminal phase
pub struct RequestCoordinator {
    api: Arc<dyn ReconciliationApi>,
    limits: LimitsConfig,
    default_timeout: Option<Duration>,
    shutdown: watch::Receiver<bool>,
    metrics: Arc<GatewayMetrics>,
}

impl RequestCoordinator {
    pub fn new(
        api: Arc<dyn ReconciliationApi>,
        limits: LimitsConfig,
        default_timeout: Option<Duration>,
        shutdown: watch::Receiver<bool>,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        Self {
            api,
            limits,
            default_timeout,
            shutdown,
            metrics,
        }
    }

    /// Fix the deadline for a request that has just been received
    pub fn deadline(&self, raw_timeout: Option<&str>) -> Deadline {
        Deadline::after(parse_timeout(raw_timeout).or(self.default_timeout))
    }

    pub fn metrics(&self) -> &Arc<GatewayMetrics> {
        &self.metrics
    }

    /// `POST /publish`
    pub async fn publish(&self, deadline: Deadline, body: &[u8]) -> ApiResult<()> {
        let op = Operation::Publish;
        let started = self.received(op);
        let result = async {
            let request: PublishRequest = decode_body(op, body)?;
            let ids = request.messages;
            self.dispatch(op, deadline, move |api| api.publish(&ids).map(|_| ()))
                .await
        }
        .await;
        self.finish(op, started, result)
    }

    /// `POST /bloom-request`: stored ids the requester's filter claims to know,
    /// encoded as a [`MessagesResponse`]
    pub async fn bloom_request(
        &self,
        deadline: Deadline,
        body: &[u8],
    ) -> ApiResult<Vec<u8>> {
        let op = Operation::FilterOut;
        let started = self.received(op);
        let result = async {
            let request: BloomRequest = decode_body(op, body)?;
            let filter = request.bloom.decode(&self.limits)?;
            let messages = self
                .dispatch(op, deadline, move |api| api.filter_out(&filter))
                .await?;
            Ok::<_, ApiError>(MessagesResponse { messages })
        }
        .await;
        self.finish_json(op, started, result)
    }

    /// `POST /notify`: candidates the server filter does not recognize, encoded
    /// as a [`NotifyResponse`]
    pub async fn notify(&self, deadline: Deadline, body: &[u8]) -> ApiResult<Vec<u8>> {
        let op = Operation::FilterComplement;
        let started = self.received(op);
        let result = async {
            let request: NotifyRequest = decode_body(op, body)?;
            let candidates = request.msg_hashes;
            let msg_hashes = self
                .dispatch(op, deadline, move |api| api.filter_complement(&candidates))
                .await?;
            Ok::<_, ApiError>(NotifyResponse { msg_hashes })
        }
        .await;
        self.finish_json(op, started, result)
    }

    /// `GET /health`
    pub async fn health(&self, deadline: Deadline) -> ApiResult<Vec<u8>> {
        let op = Operation::Health;
        let started = self.received(op);
        let result = self
            .dispatch(op, deadline, |api| api.message_count())
            .await
            .map(|messages| HealthResponse {
                status: "ok".to_string(),
                messages,
            });
        self.finish_json(op, started, result)
    }

    /// `GET /server-filter`
    pub async fn server_filter(&self, deadline: Deadline) -> ApiResult<Vec<u8>> {
        let op = Operation::ServerFilter;
        let started = self.received(op);
        let result = self
            .dispatch(op, deadline, |api| Ok(api.server_filter()))
            .await
            .map(|filter| ServerFilterResponse {
                bloom: BloomEncoding::from_filter(&filter),
            });
        self.finish_json(op, started, result)
    }

    /// `GET /metrics`
    pub async fn metrics_report(&self, deadline: Deadline) -> ApiResult<Vec<u8>> {
        let op = Operation::Metrics;
        let started = self.received(op);
        let result = self
            .dispatch(op, deadline, |api| Ok(api.metrics()))
            .await
            .map(|reconciliation| MetricsResponse {
                reconciliation,
                gateway: self.metrics.snapshot(),
            });
        self.finish_json(op, started, result)
    }

    fn received(&self, op: Operation) -> Instant {
        log_phase(op, RequestPhase::Received);
        Instant::now()
    }

    /// Run `job` on the blocking pool, racing it against the deadline and shutdown
    async fn dispatch<T, F>(&self, op: Operation, deadline: Deadline, job: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn ReconciliationApi) -> Result<T, ReconcileError> + Send + 'static,
    {
        // Decoding may already have used up the budget
        if deadline.expired() {
            return Err(ApiError::Timeout);
        }

        log_phase(op, RequestPhase::Computing);
        let api = Arc::clone(&self.api);
        let task = tokio::task::spawn_blocking(move || job(api.as_ref()));

        let joined = tokio::select! {
            biased;
            _ = deadline.elapsed() => return Err(ApiError::Timeout),
            _ = cancelled(self.shutdown.clone()) => {
                debug!(request = %op, "[mr-04] Request cancelled by shutdown");
                return Err(ApiError::Timeout);
            }
            joined = task => joined,
        };

        // A result that lands after the deadline is still a timeout
        if deadline.expired() {
            return Err(ApiError::Timeout);
        }

        match joined {
            Ok(result) => result.map_err(ApiError::from),
            Err(e) => Err(ApiError::Internal(format!("{} task failed: {}", op, e))),
        }
    }

    /// Encode a successful result as JSON, then record the outcome
    fn finish_json<T: Serialize>(
        &self,
        op: Operation,
        started: Instant,
        result: ApiResult<T>,
    ) -> ApiResult<Vec<u8>> {
        let encoded = result.and_then(|value| {
            serde_json::to_vec(&value).map_err(|e| ApiError::Encode(e.to_string()))
        });
        self.finish(op, started, encoded)
    }

    fn finish<T>(&self, op: Operation, started: Instant, result: ApiResult<T>) -> ApiResult<T> {
        match &result {
            Ok(_) => {
                self.metrics.record_completed(started.elapsed());
                log_phase(op, RequestPhase::Completed);
            }
            Err(ApiError::Timeout) => {
                self.metrics.record_timed_out();
                log_phase(op, RequestPhase::TimedOut);
            }
            Err(e) => {
                self.metrics.record_failed();
                log_phase(op, RequestPhase::Failed);
                if e.is_client_error() {
                    debug!(request = %op, error = %e, "[mr-04] Rejected request");
                } else {
                    warn!(request = %op, error = %e, "[mr-04] Request failed");
                }
            }
        }
        result
    }
}

fn decode_body<T: DeserializeOwned>(op: Operation, body: &[u8]) -> ApiResult<T> {
    log_phase(op, RequestPhase::Decoding);
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn log_phase(op: Operation, phase: RequestPhase) {
    debug!(request = %op, phase = %phase, "[mr-04] Request phase");
}

/// Resolves once shutdown is signalled; never resolves if the sender is gone
async fn cancelled(mut shutdown: watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}
