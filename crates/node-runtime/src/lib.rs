//! # Message-Reconciliation Node Runtime
//!
//! Wires the subsystems together:
//!
//! ```text
//! HTTP ──→ ApiGatewayService (mr-04)
//!              │
//!              ↓
//!          ReconciliationService (mr-03) ──→ InMemoryMessageStore (mr-02)
//!              │
//!              └── server filter (mr-01)
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`RUST_LOG`, default `info`)
//! 2. Load configuration from the environment
//! 3. Create the store and reconciliation service
//! 4. Start the API gateway
//! 5. Serve until Ctrl+C, then shut down gracefully

pub mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use mr_02_message_store::InMemoryMessageStore;
use mr_03_reconciliation::{ReconciliationApi, ReconciliationService};
use mr_04_api_gateway::{ApiGatewayService, GatewayConfig};
use tracing::info;

/// The node runtime owning every subsystem.
pub struct NodeRuntime {
    service: Arc<ReconciliationService<InMemoryMessageStore>>,
    gateway: ApiGatewayService,
}

impl NodeRuntime {
    /// Create the subsystems from configuration.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        info!("Creating message-reconciliation node runtime");

        let store = Arc::new(InMemoryMessageStore::new());
        let service = Arc::new(
            ReconciliationService::new(store, &config.server_filter)
                .context("failed to create reconciliation service")?,
        );

        let api: Arc<dyn ReconciliationApi> = service.clone();
        let gateway = ApiGatewayService::new(config, api).context("failed to create API gateway")?;

        Ok(Self { service, gateway })
    }

    /// Serve until [`shutdown`](Self::shutdown) is called.
    pub async fn run(&self) -> Result<()> {
        self.gateway.start().await.context("API gateway failed")?;
        Ok(())
    }

    /// Stop accepting requests and cancel in-flight ones.
    pub fn shutdown(&self) {
        let messages = self.service.message_count().unwrap_or_default();
        info!(messages, "Shutting down node runtime");
        self.gateway.shutdown();
    }

    pub fn gateway(&self) -> &ApiGatewayService {
        &self.gateway
    }

    pub fn service(&self) -> &Arc<ReconciliationService<InMemoryMessageStore>> {
        &self.service
    }
}
