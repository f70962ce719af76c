//! edgeRegistrar - Load-Balancer Registration Daemon
//!
//! This is the composition root that wires together all the components.

mod adapters;
mod application;
mod config;
mod domain;
mod infrastructure;

use crate::adapters::inbound::ApiServer;
use crate::adapters::outbound::HttpControlPlane;
use crate::application::{QueryService, ServiceRegistry, SyncService};
use crate::config::load_config;
use crate::domain::ports::ControlPlane;
use crate::infrastructure::{fetch_public_ip, SyncScheduler};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    // Resolve this host's public address; the server record registered
    // with the load balancer is keyed by it.
    let address = match cfg.address.clone() {
        Some(address) => address,
        None => fetch_public_ip()
            .await
            .context("failed to resolve own public address")?
            .to_string(),
    };

    tracing::info!(
        "starting edgeRegistrar service={} address={} api={}",
        cfg.service_name,
        address,
        cfg.api_listen_addr
    );

    // ===== COMPOSITION ROOT =====

    // 1. Outbound adapter: the remote control plane
    let control_plane: Arc<dyn ControlPlane> = Arc::new(HttpControlPlane::new(&cfg)?);

    // 2. Application services
    let registry = Arc::new(ServiceRegistry::new());
    let sync = Arc::new(SyncService::new(control_plane.clone(), address));
    let query = Arc::new(QueryService::new(control_plane));

    // 3. Background sync: initial tick at startup, then periodic, plus
    // an early wake on every registry mutation
    SyncScheduler::new(
        registry.clone(),
        sync,
        Duration::from_secs(cfg.sync_interval_secs),
    )
    .spawn();

    // 4. Inbound adapter and run
    let server = ApiServer::new(cfg.api_listen_addr.clone(), query, registry);
    server.run().await
}
