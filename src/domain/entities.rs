//! Domain Entities - Core business objects
//!
//! These entities mirror the resource records owned by the remote
//! load-balancer control plane, plus the locally-owned DesiredService.
//! Field renames pin down the wire names used by the remote API.

use crate::domain::value_objects::ServerStatus;
use serde::{Deserialize, Deserializer, Serialize};

/// A frontend/backend/port binding the operator wants published.
///
/// This is the only entity whose lifetime is controlled by this process:
/// it is added and removed by the inbound boundary and read by the
/// reconciliation engine. Equality is structural across all three fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredService {
    /// Public frontend rule/name for the service
    pub frontend: String,
    /// Backend pool name the service belongs to
    pub backend: String,
    /// Port the service listens on
    pub port: u16,
}

/// Registration of a host with the load balancer.
///
/// One server record represents this process's host, shared across all
/// services it registers. Unique per `address`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Server {
    #[serde(rename = "serverId")]
    pub id: i64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status: ServerStatus,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub zone: String,
}

/// A pool of servers behind one port in one zone (a.k.a. farm).
///
/// Unique per `(port, zone)` among backends this process manages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backend {
    #[serde(rename = "backendId")]
    pub id: i64,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub zone: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub probe: String,
    #[serde(default)]
    pub balance: String,
    /// "cookie" or "sourceIp"
    #[serde(default)]
    pub stickiness: String,
}

/// A public listener bound to exactly one default backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frontend {
    #[serde(rename = "frontendId")]
    pub id: i64,
    #[serde(default)]
    pub default_backend_id: i64,
    /// One historical API shape serialized this as a string.
    #[serde(default, deserialize_with = "port_from_wire")]
    pub port: u16,
    #[serde(default)]
    pub hsts: bool,
    #[serde(default)]
    pub ssl: bool,
    #[serde(default)]
    pub zone: String,
}

/// Attachment of one server to one backend on one port.
///
/// Unique per `(backend_id, server_id, port)`. The backend id travels in
/// the resource path, not the payload; the client fills it in after decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    #[serde(rename = "linkId")]
    pub id: i64,
    #[serde(default)]
    pub backend_id: i64,
    #[serde(default)]
    pub server_id: i64,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub backup: bool,
    #[serde(default)]
    pub probe: bool,
    #[serde(default)]
    pub ssl: bool,
    #[serde(default)]
    pub weight: u32,
}

/// Read-only routing entry; owns an ordered collection of rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(rename = "routeId")]
    pub id: i64,
    #[serde(default)]
    pub frontend_id: i64,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub action: RouteAction,
    /// Hydrated from the route's rule sub-resource after the detail fetch.
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteAction {
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub status: u16,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Read-only matching rule belonging to a route.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(rename = "ruleId")]
    pub id: i64,
    #[serde(default)]
    pub field: String,
    /// Matching operator, e.g. "contains"
    #[serde(rename = "match", default)]
    pub operator: String,
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub negate: bool,
}

/// Read-only SSL certificate record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SslCertificate {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub serial: String,
    #[serde(default)]
    pub subject: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub fingerprint: String,
    #[serde(default)]
    pub display_name: String,
}

// Create-request payloads. Remote ids are assigned on creation, so the
// specs carry no id; the link's backend id travels in the URL path.

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSpec {
    pub address: String,
    pub status: ServerStatus,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendSpec {
    pub port: u16,
    pub zone: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub probe: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendSpec {
    pub default_backend_id: i64,
    pub hsts: bool,
    pub port: u16,
    pub ssl: bool,
    pub zone: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSpec {
    pub backup: bool,
    pub port: u16,
    pub probe: bool,
    pub server_id: i64,
    pub ssl: bool,
    pub weight: u32,
}

/// Accepts the frontend port both as a JSON number and as a string.
fn port_from_wire<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Number(u16),
        Text(String),
    }

    match Wire::deserialize(deserializer)? {
        Wire::Number(port) => Ok(port),
        Wire::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}
