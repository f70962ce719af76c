//! edgeRegistrar Library
//!
//! This module exposes the edgeRegistrar components for use in
//! integration tests and as a library.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use adapters::inbound::ApiServer;
pub use adapters::outbound::HttpControlPlane;
pub use application::{QueryService, ServiceRegistry, SyncService};
pub use config::{load_config, Config};
pub use domain::entities::DesiredService;
pub use domain::ports::{ControlPlane, RemoteError};
pub use infrastructure::SyncScheduler;
