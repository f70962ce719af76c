//! Control Plane Port
//!
//! Defines the interface to the remote load-balancer control plane.
//! The reconciliation engine and the query façade depend only on this
//! trait; the HTTP adapter implements it against the real REST API.

use crate::domain::entities::{
    Backend, BackendSpec, Frontend, FrontendSpec, Link, LinkSpec, Route, Server, ServerSpec,
    SslCertificate,
};
use async_trait::async_trait;

/// Error returned by any remote control-plane operation.
///
/// No operation retries internally; callers decide what a failure means.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoteError {
    /// The request never completed (connect failure, timeout, aborted body).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    /// The remote answered with a non-2xx status.
    #[error("remote returned {status} for {url}: {body}")]
    Status { url: String, status: u16, body: String },
    /// The response body could not be decoded into the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Access to the remote load-balancer control plane.
///
/// Lookups keyed on a remote-side filter (`server_by_address`,
/// `frontend_by_default_backend`) fold ambiguity into absence: a filter
/// matching any number of records other than exactly one yields
/// `Ok(None)`. The `(port, zone)` and link composite-key lookups have no
/// remote filter and scan the collection client-side; they are provided
/// as default methods.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Whether this control-plane variant exposes explicit server-to-backend
    /// link resources. When false the engine attaches nothing after the
    /// frontend step.
    fn supports_links(&self) -> bool {
        true
    }

    async fn servers(&self) -> Result<Vec<Server>, RemoteError>;
    async fn create_server(&self, spec: &ServerSpec) -> Result<Server, RemoteError>;
    async fn server_by_address(&self, address: &str) -> Result<Option<Server>, RemoteError>;

    async fn backends(&self) -> Result<Vec<Backend>, RemoteError>;
    async fn create_backend(&self, spec: &BackendSpec) -> Result<Backend, RemoteError>;

    /// Client-side scan; the remote offers no filter for this pair.
    async fn backend_by_port_and_zone(
        &self,
        port: u16,
        zone: &str,
    ) -> Result<Option<Backend>, RemoteError> {
        let backends = self.backends().await?;
        Ok(backends
            .into_iter()
            .find(|backend| backend.port == port && backend.zone == zone))
    }

    async fn frontends(&self) -> Result<Vec<Frontend>, RemoteError>;
    async fn create_frontend(&self, spec: &FrontendSpec) -> Result<Frontend, RemoteError>;
    async fn frontend_by_default_backend(
        &self,
        backend_id: i64,
    ) -> Result<Option<Frontend>, RemoteError>;

    async fn links_by_backend(&self, backend_id: i64) -> Result<Vec<Link>, RemoteError>;
    async fn create_link(&self, backend_id: i64, spec: &LinkSpec) -> Result<Link, RemoteError>;

    /// Client-side scan of the backend's links for the composite key.
    async fn link_by_key(
        &self,
        backend_id: i64,
        server_id: i64,
        port: u16,
    ) -> Result<Option<Link>, RemoteError> {
        let links = self.links_by_backend(backend_id).await?;
        Ok(links
            .into_iter()
            .find(|link| link.server_id == server_id && link.port == port))
    }

    async fn routes(&self) -> Result<Vec<Route>, RemoteError>;
    async fn ssl_certificates(&self) -> Result<Vec<SslCertificate>, RemoteError>;
}
