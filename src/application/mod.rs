//! Application Layer
//!
//! Use cases wiring the domain to the ports: the reconciliation engine,
//! the desired-service registry, and the read-only query façade.

pub mod query_service;
pub mod registry;
pub mod sync_service;

#[cfg(test)]
pub mod testing;

pub use query_service::{BackendLinks, QueryService};
pub use registry::ServiceRegistry;
pub use sync_service::SyncService;
