//! Query Façade
//!
//! Read-only aggregation over the remote collections, consumed by the
//! HTTP boundary. Collection reads pass through the control-plane port;
//! the grouped-links view fans out across all backends concurrently.

use crate::domain::entities::{Backend, Frontend, Link, Route, Server, SslCertificate};
use crate::domain::ports::{ControlPlane, RemoteError};
use serde::Serialize;
use std::sync::Arc;

/// One backend's link collection, with any listing failure reported
/// inline instead of aborting the whole aggregation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendLinks {
    pub backend_id: i64,
    pub links: Vec<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct QueryService {
    control_plane: Arc<dyn ControlPlane>,
}

impl QueryService {
    pub fn new(control_plane: Arc<dyn ControlPlane>) -> Self {
        Self { control_plane }
    }

    pub async fn servers(&self) -> Result<Vec<Server>, RemoteError> {
        self.control_plane.servers().await
    }

    pub async fn backends(&self) -> Result<Vec<Backend>, RemoteError> {
        self.control_plane.backends().await
    }

    pub async fn frontends(&self) -> Result<Vec<Frontend>, RemoteError> {
        self.control_plane.frontends().await
    }

    pub async fn routes(&self) -> Result<Vec<Route>, RemoteError> {
        self.control_plane.routes().await
    }

    pub async fn ssl_certificates(&self) -> Result<Vec<SslCertificate>, RemoteError> {
        self.control_plane.ssl_certificates().await
    }

    /// All links grouped by backend.
    ///
    /// Fails only when the backend enumeration itself fails; a per-backend
    /// link listing failure lands in that backend's entry.
    pub async fn links_by_backend(&self) -> Result<Vec<BackendLinks>, RemoteError> {
        let backends = self.control_plane.backends().await?;

        let tasks: Vec<_> = backends
            .iter()
            .map(|backend| {
                let control_plane = self.control_plane.clone();
                let backend_id = backend.id;
                tokio::spawn(async move { control_plane.links_by_backend(backend_id).await })
            })
            .collect();

        let mut groups = Vec::with_capacity(tasks.len());
        for (task, backend) in tasks.into_iter().zip(&backends) {
            let group = match task.await {
                Ok(Ok(links)) => BackendLinks {
                    backend_id: backend.id,
                    links,
                    error: None,
                },
                Ok(Err(err)) => {
                    tracing::warn!("failed to list links for backend {}: {}", backend.id, err);
                    BackendLinks {
                        backend_id: backend.id,
                        links: Vec::new(),
                        error: Some(err.to_string()),
                    }
                }
                Err(err) => {
                    tracing::warn!("link listing task for backend {} aborted: {}", backend.id, err);
                    BackendLinks {
                        backend_id: backend.id,
                        links: Vec::new(),
                        error: Some(err.to_string()),
                    }
                }
            };
            groups.push(group);
        }

        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FakeControlPlane;
    use crate::domain::entities::{Backend, Link, Route, Rule};

    fn backend(id: i64, port: u16) -> Backend {
        Backend {
            id,
            port,
            zone: "gra".to_string(),
            kind: "http".to_string(),
            ..Default::default()
        }
    }

    fn link(id: i64, backend_id: i64, server_id: i64, port: u16) -> Link {
        Link {
            id,
            backend_id,
            server_id,
            port,
            weight: 100,
            probe: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_links_grouped_by_backend() {
        let remote = Arc::new(FakeControlPlane::new());
        remote.push_backend(backend(1, 8080));
        remote.push_backend(backend(2, 9090));
        remote.push_link(link(10, 1, 5, 8080));
        remote.push_link(link(11, 1, 6, 8080));
        remote.push_link(link(12, 2, 5, 9090));

        let query = QueryService::new(remote);
        let groups = query.links_by_backend().await.unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].backend_id, 1);
        assert_eq!(groups[0].links.len(), 2);
        assert_eq!(groups[1].backend_id, 2);
        assert_eq!(groups[1].links.len(), 1);
        assert!(groups.iter().all(|group| group.error.is_none()));
    }

    #[tokio::test]
    async fn test_per_backend_failure_is_inline() {
        let remote = Arc::new(FakeControlPlane::new());
        remote.push_backend(backend(1, 8080));
        remote.push_backend(backend(2, 9090));
        remote.push_link(link(10, 1, 5, 8080));
        remote.fail_links_for.lock().insert(2);

        let query = QueryService::new(remote);
        let groups = query.links_by_backend().await.unwrap();

        // The failing backend keeps its slot with the error inline.
        assert_eq!(groups.len(), 2);
        assert!(groups[0].error.is_none());
        assert_eq!(groups[0].links.len(), 1);
        assert!(groups[1].error.is_some());
        assert!(groups[1].links.is_empty());
    }

    #[tokio::test]
    async fn test_no_backends_yields_empty_grouping() {
        let remote = Arc::new(FakeControlPlane::new());
        let query = QueryService::new(remote);

        let groups = query.links_by_backend().await.unwrap();
        assert!(groups.is_empty());
    }

    #[tokio::test]
    async fn test_routes_pass_through() {
        let remote = Arc::new(FakeControlPlane::new());
        remote.push_route(Route {
            id: 3,
            frontend_id: 1,
            rules: vec![Rule {
                id: 7,
                field: "host".to_string(),
                operator: "contains".to_string(),
                pattern: "example".to_string(),
                negate: false,
            }],
            ..Default::default()
        });

        let query = QueryService::new(remote);
        let routes = query.routes().await.unwrap();

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].rules.len(), 1);
    }

    #[tokio::test]
    async fn test_error_serializes_inline() {
        let group = BackendLinks {
            backend_id: 4,
            links: Vec::new(),
            error: Some("remote returned 500".to_string()),
        };

        let value = serde_json::to_value(&group).unwrap();
        assert_eq!(value["backendId"], 4);
        assert_eq!(value["error"], "remote returned 500");

        let ok = BackendLinks {
            backend_id: 4,
            links: Vec::new(),
            error: None,
        };
        let value = serde_json::to_value(&ok).unwrap();
        assert!(value.get("error").is_none());
    }
}
