//! # Message-Reconciliation Node
//!
//! Serves `/publish`, `/bloom-request` and `/notify` until Ctrl+C.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use node_runtime::config::load_config;
use node_runtime::NodeRuntime;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config()?;
    let runtime = Arc::new(NodeRuntime::new(config)?);

    let mut server = {
        let runtime = Arc::clone(&runtime);
        tokio::spawn(async move { runtime.run().await })
    };

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::select! {
        joined = &mut server => return joined?,
        signal = tokio::signal::ctrl_c() => signal?,
    }

    // Graceful shutdown
    runtime.shutdown();
    server.await?
}
