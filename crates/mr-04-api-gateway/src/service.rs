//! API Gateway service - main entry point.
//!
//! Owns the shutdown signal shared by the HTTP server and every in-flight
//! request coordinator.

use std::sync::Arc;

use axum::Router;
use mr_03_reconciliation::ReconciliationApi;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use crate::coordinator::RequestCoordinator;
use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::metrics::GatewayMetrics;
use crate::router::build_router;

/// API Gateway service state
pub struct ApiGatewayService {
    config: GatewayConfig,
    coordinator: Arc<RequestCoordinator>,
    metrics: Arc<GatewayMetrics>,
    shutdown_tx: watch::Sender<bool>,
}

impl ApiGatewayService {
    /// Create a new API Gateway service
    pub fn new(
        config: GatewayConfig,
        api: Arc<dyn ReconciliationApi>,
    ) -> Result<Self, GatewayError> {
        config
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let metrics = Arc::new(GatewayMetrics::new());
        let coordinator = Arc::new(RequestCoordinator::new(
            api,
            config.limits.clone(),
            config.timeouts.default_request,
            shutdown_rx,
            Arc::clone(&metrics),
        ));

        Ok(Self {
            config,
            coordinator,
            metrics,
            shutdown_tx,
        })
    }

    /// Router serving every endpoint, usable without binding a socket
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.coordinator), &self.config.limits)
    }

    /// Bind and serve until [`shutdown`](Self::shutdown) is called
    pub async fn start(&self) -> Result<(), GatewayError> {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{}: {}", addr, e)))?;

        info!(addr = %addr, "[mr-04] Starting HTTP server");
        self.serve(listener).await
    }

    /// Serve on an already-bound listener
    pub async fn serve(&self, listener: TcpListener) -> Result<(), GatewayError> {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let grace = self.config.timeouts.shutdown_grace;

        let server = async {
            axum::serve(listener, self.router())
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.wait_for(|stop| *stop).await;
                    info!("[mr-04] Received shutdown signal");
                })
                .await
        };

        let mut grace_rx = self.shutdown_tx.subscribe();
        tokio::select! {
            result = server => {
                result.map_err(|e| GatewayError::Serve(e.to_string()))?;
            }
            _ = async {
                let _ = grace_rx.wait_for(|stop| *stop).await;
                tokio::time::sleep(grace).await;
            } => {
                info!(grace = ?grace, "[mr-04] Shutdown grace period elapsed");
            }
        }

        info!("[mr-04] API Gateway stopped");
        Ok(())
    }

    /// Trigger graceful shutdown; in-flight requests are answered with a timeout
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }

    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
