//! MR-04 API Gateway - HTTP interface for publishing and reconciling.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     API GATEWAY (mr-04)                        │
//! ├───────────────────────────────────────────────────────────────┤
//! │  POST /publish   POST /bloom-request   POST /notify            │
//! │  GET  /health    GET  /metrics         GET  /server-filter     │
//! │         │                                                     │
//! │  ┌──────┴────────────────────────────────────┐                │
//! │  │  Middleware: BodyLimit → Trace → RequestSpan│                │
//! │  └──────┬────────────────────────────────────┘                │
//! │         │                                                     │
//! │  ┌──────┴────────────────────────────────────┐                │
//! │  │  RequestCoordinator                        │                │
//! │  │  Received → Decoding → Computing →         │                │
//! │  │      Completed | TimedOut | Failed         │                │
//! │  └──────┬────────────────────────────────────┘                │
//! └─────────┼─────────────────────────────────────────────────────┘
//!           │ spawn_blocking, raced against deadline / shutdown
//!           ▼
//!   ReconciliationApi (mr-03)
//! ```
//!
//! # Status Mapping
//!
//! | Outcome | Status |
//! |---------|--------|
//! | Publish completed | 204 |
//! | Query completed | 200 + JSON |
//! | Malformed body / filter | 400 |
//! | Deadline or cancellation | 408, empty body |
//! | Encode or internal failure | 500 |
//!
//! # Usage
//!
//! ```ignore
//! use mr_04_api_gateway::{ApiGatewayService, GatewayConfig};
//!
//! let config = GatewayConfig::default();
//! let service = ApiGatewayService::new(config, api)?;
//! service.start().await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod coordinator;
pub mod domain;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod service;

pub use coordinator::{parse_timeout, Deadline, RequestCoordinator, RequestPhase};
pub use domain::config::{GatewayConfig, HttpConfig, LimitsConfig, TimeoutConfig};
pub use domain::error::{ApiError, ApiResult, GatewayError};
pub use domain::types::*;
pub use metrics::{GatewayMetrics, GatewayMetricsSnapshot};
pub use router::{build_router, AppState};
pub use service::ApiGatewayService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
