//! Query & Registration API Server
//!
//! HTTP boundary over the query façade and the desired-service registry.
//! Remote collection reads map a RemoteError to a 500 with the message as
//! payload; registration endpoints mutate the registry, which wakes the
//! sync scheduler.

use crate::application::{QueryService, ServiceRegistry};
use crate::domain::entities::DesiredService;
use crate::domain::ports::RemoteError;
use crate::domain::services::discovery::desired_service_from_labels;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Registration request: either a service or a container label map.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ServiceRequest {
    Labels { labels: HashMap<String, String> },
    Service(DesiredService),
}

/// Registry listing response.
#[derive(Debug, Serialize)]
pub struct ServicesResponse {
    pub services: Vec<DesiredService>,
    pub total: usize,
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub desired_services: usize,
}

#[derive(Clone)]
pub struct ApiState {
    pub query: Arc<QueryService>,
    pub registry: Arc<ServiceRegistry>,
}

/// API server exposing the query façade and service registration.
pub struct ApiServer {
    listen_addr: String,
    state: ApiState,
}

impl ApiServer {
    pub fn new(
        listen_addr: String,
        query: Arc<QueryService>,
        registry: Arc<ServiceRegistry>,
    ) -> Self {
        Self {
            listen_addr,
            state: ApiState { query, registry },
        }
    }

    /// Run the API server.
    pub async fn run(&self) -> anyhow::Result<()> {
        let app = router(self.state.clone());

        let listener = TcpListener::bind(&self.listen_addr).await?;
        tracing::info!("API listening on {}", self.listen_addr);

        axum::serve(listener, app).await?;
        Ok(())
    }
}

/// Build the router; split out so tests can drive it without a listener.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/server", get(servers_handler))
        .route("/backend", get(backends_handler))
        .route("/frontend", get(frontends_handler))
        .route("/link", get(links_handler))
        .route("/route", get(routes_handler))
        .route("/ssl", get(ssl_handler))
        .route(
            "/service",
            get(list_services_handler)
                .post(add_service_handler)
                .delete(remove_service_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Map a remote read to 200 + collection or 500 + error message.
fn remote_response<T: Serialize>(result: Result<T, RemoteError>) -> Response {
    match result {
        Ok(collection) => (StatusCode::OK, Json(collection)).into_response(),
        Err(err) => {
            tracing::error!("remote read failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": err.to_string()})),
            )
                .into_response()
        }
    }
}

async fn health_handler(State(state): State<ApiState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        desired_services: state.registry.len(),
    })
}

async fn servers_handler(State(state): State<ApiState>) -> Response {
    remote_response(state.query.servers().await)
}

async fn backends_handler(State(state): State<ApiState>) -> Response {
    remote_response(state.query.backends().await)
}

async fn frontends_handler(State(state): State<ApiState>) -> Response {
    remote_response(state.query.frontends().await)
}

async fn links_handler(State(state): State<ApiState>) -> Response {
    remote_response(state.query.links_by_backend().await)
}

async fn routes_handler(State(state): State<ApiState>) -> Response {
    remote_response(state.query.routes().await)
}

async fn ssl_handler(State(state): State<ApiState>) -> Response {
    remote_response(state.query.ssl_certificates().await)
}

async fn list_services_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let services = state.registry.snapshot();
    let total = services.len();
    Json(ServicesResponse { services, total })
}

async fn add_service_handler(
    State(state): State<ApiState>,
    Json(request): Json<ServiceRequest>,
) -> Response {
    let service = match request {
        ServiceRequest::Service(service) => Some(service),
        ServiceRequest::Labels { labels } => desired_service_from_labels(&labels),
    };

    match service {
        Some(service) => {
            state.registry.add(service.clone());
            (StatusCode::CREATED, Json(service)).into_response()
        }
        None => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "error": "labels do not describe a service"
            })),
        )
            .into_response(),
    }
}

async fn remove_service_handler(
    State(state): State<ApiState>,
    Json(service): Json<DesiredService>,
) -> impl IntoResponse {
    let removed = state.registry.remove(&service);
    Json(serde_json::json!({"removed": removed}))
}
