//! HTTP Control Plane Adapter
//!
//! Implements the ControlPlane port against the remote load balancer's
//! REST API. The remote exposes, per resource kind, a "list of ids"
//! endpoint and a "get by id" endpoint - no bulk detail endpoint - so
//! every collection read is one list call plus N concurrent detail calls
//! through the fetcher.

use crate::config::Config;
use crate::domain::entities::{
    Backend, BackendSpec, Frontend, FrontendSpec, Link, LinkSpec, Route, Rule, Server, ServerSpec,
    SslCertificate,
};
use crate::domain::ports::{ControlPlane, RemoteError};
use crate::infrastructure::fetcher::fetch_ordered;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

#[derive(Clone)]
pub struct HttpControlPlane {
    client: reqwest::Client,
    /// Root of the per-service-instance resource tree.
    base_url: String,
    fan_out_limit: usize,
    link_resources: bool,
}

impl HttpControlPlane {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: format!(
                "{}/loadbalancer/{}",
                config.endpoint.trim_end_matches('/'),
                config.service_name
            ),
            fan_out_limit: config.fan_out_limit,
            link_resources: config.link_resources,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| RemoteError::Transport {
                url: url.clone(),
                message: err.to_string(),
            })?;
        Self::decode(url, response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RemoteError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| RemoteError::Transport {
                url: url.clone(),
                message: err.to_string(),
            })?;
        Self::decode(url, response).await
    }

    async fn decode<T: DeserializeOwned>(
        url: String,
        response: reqwest::Response,
    ) -> Result<T, RemoteError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| RemoteError::Transport {
                url: url.clone(),
                message: err.to_string(),
            })?;

        if !status.is_success() {
            return Err(RemoteError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|err| RemoteError::Decode {
            url,
            message: err.to_string(),
        })
    }

    /// Ordered id listing for a collection path.
    async fn ids(&self, path: &str) -> Result<Vec<i64>, RemoteError> {
        self.get_json(path).await
    }

    async fn server(&self, id: i64) -> Result<Server, RemoteError> {
        self.get_json(&format!("/server/{}", id)).await
    }

    async fn backend(&self, id: i64) -> Result<Backend, RemoteError> {
        self.get_json(&format!("/backend/{}", id)).await
    }

    async fn frontend(&self, id: i64) -> Result<Frontend, RemoteError> {
        self.get_json(&format!("/frontend/{}", id)).await
    }

    async fn link(&self, backend_id: i64, id: i64) -> Result<Link, RemoteError> {
        self.get_json(&format!("/backend/{}/server/{}", backend_id, id))
            .await
    }

    async fn route(&self, id: i64) -> Result<Route, RemoteError> {
        self.get_json(&format!("/route/{}", id)).await
    }

    async fn rule(&self, route_id: i64, id: i64) -> Result<Rule, RemoteError> {
        self.get_json(&format!("/route/{}/rule/{}", route_id, id))
            .await
    }

    async fn ssl_certificate(&self, id: i64) -> Result<SslCertificate, RemoteError> {
        self.get_json(&format!("/ssl/{}", id)).await
    }

    async fn rules_by_route(&self, route_id: i64) -> Result<Vec<Rule>, RemoteError> {
        let ids = self.ids(&format!("/route/{}/rule", route_id)).await?;
        Ok(fetch_ordered(ids, self.fan_out_limit, |id| {
            let adapter = self.clone();
            async move { adapter.rule(route_id, id).await }
        })
        .await)
    }

    /// Resolve a filtered id listing to at most one resource.
    ///
    /// Anything other than exactly one id is folded into "not found":
    /// ambiguity is never resolved here, the caller simply sees absence.
    async fn single_by_filter<T, F, Fut>(
        &self,
        path: &str,
        fetch: F,
    ) -> Result<Option<T>, RemoteError>
    where
        F: FnOnce(i64) -> Fut,
        Fut: std::future::Future<Output = Result<T, RemoteError>>,
    {
        let ids = self.ids(path).await?;
        match ids.as_slice() {
            [id] => Ok(Some(fetch(*id).await?)),
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl ControlPlane for HttpControlPlane {
    fn supports_links(&self) -> bool {
        self.link_resources
    }

    async fn servers(&self) -> Result<Vec<Server>, RemoteError> {
        let ids = self.ids("/server").await?;
        Ok(fetch_ordered(ids, self.fan_out_limit, |id| {
            let adapter = self.clone();
            async move { adapter.server(id).await }
        })
        .await)
    }

    async fn create_server(&self, spec: &ServerSpec) -> Result<Server, RemoteError> {
        self.post_json("/server", spec).await
    }

    async fn server_by_address(&self, address: &str) -> Result<Option<Server>, RemoteError> {
        self.single_by_filter(&format!("/server?address={}", address), |id| {
            self.server(id)
        })
        .await
    }

    async fn backends(&self) -> Result<Vec<Backend>, RemoteError> {
        let ids = self.ids("/backend").await?;
        Ok(fetch_ordered(ids, self.fan_out_limit, |id| {
            let adapter = self.clone();
            async move { adapter.backend(id).await }
        })
        .await)
    }

    async fn create_backend(&self, spec: &BackendSpec) -> Result<Backend, RemoteError> {
        self.post_json("/backend", spec).await
    }

    async fn frontends(&self) -> Result<Vec<Frontend>, RemoteError> {
        let ids = self.ids("/frontend").await?;
        Ok(fetch_ordered(ids, self.fan_out_limit, |id| {
            let adapter = self.clone();
            async move { adapter.frontend(id).await }
        })
        .await)
    }

    async fn create_frontend(&self, spec: &FrontendSpec) -> Result<Frontend, RemoteError> {
        self.post_json("/frontend", spec).await
    }

    async fn frontend_by_default_backend(
        &self,
        backend_id: i64,
    ) -> Result<Option<Frontend>, RemoteError> {
        self.single_by_filter(
            &format!("/frontend?defaultBackendId={}", backend_id),
            |id| self.frontend(id),
        )
        .await
    }

    async fn links_by_backend(&self, backend_id: i64) -> Result<Vec<Link>, RemoteError> {
        let ids = self.ids(&format!("/backend/{}/server", backend_id)).await?;
        let mut links = fetch_ordered(ids, self.fan_out_limit, |id| {
            let adapter = self.clone();
            async move { adapter.link(backend_id, id).await }
        })
        .await;

        // The backend id travels in the path, not the payload. Zero-value
        // holes from failed fetches are left untouched.
        for link in links.iter_mut().filter(|link| link.id != 0) {
            link.backend_id = backend_id;
        }
        Ok(links)
    }

    async fn create_link(&self, backend_id: i64, spec: &LinkSpec) -> Result<Link, RemoteError> {
        let mut link: Link = self
            .post_json(&format!("/backend/{}/server", backend_id), spec)
            .await?;
        link.backend_id = backend_id;
        Ok(link)
    }

    async fn routes(&self) -> Result<Vec<Route>, RemoteError> {
        let ids = self.ids("/route").await?;
        let mut routes = fetch_ordered(ids, self.fan_out_limit, |id| {
            let adapter = self.clone();
            async move { adapter.route(id).await }
        })
        .await;

        // Second fan-out: hydrate each route's ordered rule collection.
        let tasks: Vec<_> = routes
            .iter()
            .enumerate()
            .filter(|(_, route)| route.id != 0)
            .map(|(index, route)| {
                let adapter = self.clone();
                let route_id = route.id;
                (
                    index,
                    tokio::spawn(async move { adapter.rules_by_route(route_id).await }),
                )
            })
            .collect();

        for (index, task) in tasks {
            match task.await {
                Ok(Ok(rules)) => routes[index].rules = rules,
                Ok(Err(err)) => tracing::warn!(
                    "failed to fetch rules for route {}: {}",
                    routes[index].id,
                    err
                ),
                Err(err) => tracing::warn!(
                    "rule fetch task for route {} aborted: {}",
                    routes[index].id,
                    err
                ),
            }
        }

        Ok(routes)
    }

    async fn ssl_certificates(&self) -> Result<Vec<SslCertificate>, RemoteError> {
        let ids = self.ids("/ssl").await?;
        Ok(fetch_ordered(ids, self.fan_out_limit, |id| {
            let adapter = self.clone();
            async move { adapter.ssl_certificate(id).await }
        })
        .await)
    }
}
