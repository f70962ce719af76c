//! Reconciliation Engine
//!
//! Drives the remote load balancer toward the desired-service set: for
//! each desired service, ensure the Server, Backend, Frontend, and Link
//! records exist, creating only what is missing. Every ensure-step is a
//! lookup-or-create and therefore idempotent; a step failure is terminal
//! for that service on this tick only and self-heals on the next one.

use crate::domain::entities::{
    Backend, BackendSpec, DesiredService, Frontend, FrontendSpec, Link, LinkSpec, Server,
    ServerSpec,
};
use crate::domain::ports::{ControlPlane, RemoteError};
use crate::domain::value_objects::ServerStatus;
use std::sync::Arc;

const BACKEND_KIND: &str = "http";
const BACKEND_PROBE: &str = "http";
const LINK_WEIGHT: u32 = 100;

pub struct SyncService {
    control_plane: Arc<dyn ControlPlane>,
    /// This host's public address; one server record represents the host
    /// across all services it registers.
    address: String,
}

impl SyncService {
    pub fn new(control_plane: Arc<dyn ControlPlane>, address: String) -> Self {
        Self {
            control_plane,
            address,
        }
    }

    /// Reconcile the remote state against the desired set.
    ///
    /// Services are processed strictly in caller order, and the four
    /// ensure-steps of one service run in sequence: no two creates for
    /// the same Backend/Frontend/Link can race within one invocation.
    /// Never returns an error; a failed service is logged and skipped
    /// until the next tick.
    pub async fn sync(&self, desired: &[DesiredService]) {
        tracing::info!("syncing {} desired services", desired.len());

        for service in desired {
            match self.sync_service(service).await {
                Ok(()) => tracing::info!(
                    "service {}/{} port {} registered",
                    service.frontend,
                    service.backend,
                    service.port
                ),
                Err(err) => tracing::error!(
                    "sync of {}/{} port {} failed: {}",
                    service.frontend,
                    service.backend,
                    service.port,
                    err
                ),
            }
        }
    }

    async fn sync_service(&self, service: &DesiredService) -> Result<(), RemoteError> {
        let server = self.ensure_server().await?;

        // The remote assigns the zone on server creation; it scopes
        // backend uniqueness for everything this host manages.
        let backend = self.ensure_backend(service.port, &server.zone).await?;
        self.ensure_frontend(&backend, service.port).await?;

        if self.control_plane.supports_links() {
            self.ensure_link(&backend, &server, service.port).await?;
        }

        Ok(())
    }

    async fn ensure_server(&self) -> Result<Server, RemoteError> {
        if let Some(server) = self.control_plane.server_by_address(&self.address).await? {
            return Ok(server);
        }

        tracing::info!("registering server address={}", self.address);
        self.control_plane
            .create_server(&ServerSpec {
                address: self.address.clone(),
                status: ServerStatus::Active,
                port: 0,
            })
            .await
    }

    async fn ensure_backend(&self, port: u16, zone: &str) -> Result<Backend, RemoteError> {
        if let Some(backend) = self
            .control_plane
            .backend_by_port_and_zone(port, zone)
            .await?
        {
            return Ok(backend);
        }

        tracing::info!("creating backend port={} zone={}", port, zone);
        self.control_plane
            .create_backend(&BackendSpec {
                port,
                zone: zone.to_string(),
                kind: BACKEND_KIND.to_string(),
                probe: BACKEND_PROBE.to_string(),
            })
            .await
    }

    async fn ensure_frontend(
        &self,
        backend: &Backend,
        port: u16,
    ) -> Result<Frontend, RemoteError> {
        if let Some(frontend) = self
            .control_plane
            .frontend_by_default_backend(backend.id)
            .await?
        {
            return Ok(frontend);
        }

        tracing::info!("creating frontend port={} backend={}", port, backend.id);
        self.control_plane
            .create_frontend(&FrontendSpec {
                default_backend_id: backend.id,
                hsts: false,
                port,
                ssl: false,
                zone: backend.zone.clone(),
            })
            .await
    }

    async fn ensure_link(
        &self,
        backend: &Backend,
        server: &Server,
        port: u16,
    ) -> Result<Link, RemoteError> {
        if let Some(link) = self
            .control_plane
            .link_by_key(backend.id, server.id, port)
            .await?
        {
            return Ok(link);
        }

        tracing::info!(
            "creating link backend={} server={} port={}",
            backend.id,
            server.id,
            port
        );
        self.control_plane
            .create_link(
                backend.id,
                &LinkSpec {
                    backup: false,
                    port,
                    probe: true,
                    server_id: server.id,
                    ssl: false,
                    weight: LINK_WEIGHT,
                },
            )
            .await
    }
}
