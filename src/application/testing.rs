//! In-memory control plane for unit tests.
//!
//! Backs the engine, façade, and boundary tests without a network. The
//! fake mirrors the remote's lookup semantics, including the ambiguity
//! fold (a filter matching other than exactly one record yields None).

use crate::domain::entities::{
    Backend, BackendSpec, Frontend, FrontendSpec, Link, LinkSpec, Route, Server, ServerSpec,
    SslCertificate,
};
use crate::domain::ports::{ControlPlane, RemoteError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
struct RemoteState {
    next_id: i64,
    servers: Vec<Server>,
    backends: Vec<Backend>,
    frontends: Vec<Frontend>,
    links: HashMap<i64, Vec<Link>>,
    routes: Vec<Route>,
    ssl_certificates: Vec<SslCertificate>,
}

impl RemoteState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub struct FakeControlPlane {
    state: Mutex<RemoteState>,
    /// Zone the fake remote assigns to created servers.
    pub zone: String,
    pub create_calls: AtomicUsize,
    pub link_support: bool,
    pub fail_backend_create: AtomicBool,
    pub fail_backend_listing: AtomicBool,
    pub fail_links_for: Mutex<HashSet<i64>>,
}

impl FakeControlPlane {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RemoteState::default()),
            zone: "gra".to_string(),
            create_calls: AtomicUsize::new(0),
            link_support: true,
            fail_backend_create: AtomicBool::new(false),
            fail_backend_listing: AtomicBool::new(false),
            fail_links_for: Mutex::new(HashSet::new()),
        }
    }

    pub fn without_links() -> Self {
        Self {
            link_support: false,
            ..Self::new()
        }
    }

    pub fn creates(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn push_server(&self, server: Server) {
        self.state.lock().servers.push(server);
    }

    pub fn push_backend(&self, backend: Backend) {
        self.state.lock().backends.push(backend);
    }

    pub fn push_route(&self, route: Route) {
        self.state.lock().routes.push(route);
    }

    pub fn push_ssl(&self, certificate: SslCertificate) {
        self.state.lock().ssl_certificates.push(certificate);
    }

    pub fn push_link(&self, link: Link) {
        self.state
            .lock()
            .links
            .entry(link.backend_id)
            .or_default()
            .push(link);
    }

    fn injected(&self, url: &str) -> RemoteError {
        RemoteError::Status {
            url: url.to_string(),
            status: 500,
            body: "injected failure".to_string(),
        }
    }
}

#[async_trait]
impl ControlPlane for FakeControlPlane {
    fn supports_links(&self) -> bool {
        self.link_support
    }

    async fn servers(&self) -> Result<Vec<Server>, RemoteError> {
        Ok(self.state.lock().servers.clone())
    }

    async fn create_server(&self, spec: &ServerSpec) -> Result<Server, RemoteError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        let server = Server {
            id: state.next_id(),
            address: spec.address.clone(),
            status: spec.status,
            port: spec.port,
            zone: self.zone.clone(),
        };
        state.servers.push(server.clone());
        Ok(server)
    }

    async fn server_by_address(&self, address: &str) -> Result<Option<Server>, RemoteError> {
        let state = self.state.lock();
        let matches: Vec<&Server> = state
            .servers
            .iter()
            .filter(|server| server.address == address)
            .collect();
        match matches.as_slice() {
            [server] => Ok(Some((*server).clone())),
            _ => Ok(None),
        }
    }

    async fn backends(&self) -> Result<Vec<Backend>, RemoteError> {
        if self.fail_backend_listing.load(Ordering::SeqCst) {
            return Err(self.injected("/backend"));
        }
        Ok(self.state.lock().backends.clone())
    }

    async fn create_backend(&self, spec: &BackendSpec) -> Result<Backend, RemoteError> {
        if self.fail_backend_create.load(Ordering::SeqCst) {
            return Err(self.injected("/backend"));
        }
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        let backend = Backend {
            id: state.next_id(),
            port: spec.port,
            zone: spec.zone.clone(),
            kind: spec.kind.clone(),
            probe: spec.probe.clone(),
            ..Default::default()
        };
        state.backends.push(backend.clone());
        Ok(backend)
    }

    async fn frontends(&self) -> Result<Vec<Frontend>, RemoteError> {
        Ok(self.state.lock().frontends.clone())
    }

    async fn create_frontend(&self, spec: &FrontendSpec) -> Result<Frontend, RemoteError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        let frontend = Frontend {
            id: state.next_id(),
            default_backend_id: spec.default_backend_id,
            port: spec.port,
            hsts: spec.hsts,
            ssl: spec.ssl,
            zone: spec.zone.clone(),
        };
        state.frontends.push(frontend.clone());
        Ok(frontend)
    }

    async fn frontend_by_default_backend(
        &self,
        backend_id: i64,
    ) -> Result<Option<Frontend>, RemoteError> {
        let state = self.state.lock();
        let matches: Vec<&Frontend> = state
            .frontends
            .iter()
            .filter(|frontend| frontend.default_backend_id == backend_id)
            .collect();
        match matches.as_slice() {
            [frontend] => Ok(Some((*frontend).clone())),
            _ => Ok(None),
        }
    }

    async fn links_by_backend(&self, backend_id: i64) -> Result<Vec<Link>, RemoteError> {
        if self.fail_links_for.lock().contains(&backend_id) {
            return Err(self.injected(&format!("/backend/{}/server", backend_id)));
        }
        Ok(self
            .state
            .lock()
            .links
            .get(&backend_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_link(&self, backend_id: i64, spec: &LinkSpec) -> Result<Link, RemoteError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        let link = Link {
            id: state.next_id(),
            backend_id,
            server_id: spec.server_id,
            port: spec.port,
            backup: spec.backup,
            probe: spec.probe,
            ssl: spec.ssl,
            weight: spec.weight,
        };
        state.links.entry(backend_id).or_default().push(link.clone());
        Ok(link)
    }

    async fn routes(&self) -> Result<Vec<Route>, RemoteError> {
        Ok(self.state.lock().routes.clone())
    }

    async fn ssl_certificates(&self) -> Result<Vec<SslCertificate>, RemoteError> {
        Ok(self.state.lock().ssl_certificates.clone())
    }
}
