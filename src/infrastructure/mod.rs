//! Infrastructure Layer
//!
//! Cross-cutting concerns: the concurrent fetcher, the sync scheduler,
//! and public address detection.

pub mod fetcher;
pub mod public_ip;
pub mod scheduler;

pub use fetcher::fetch_ordered;
pub use public_ip::fetch_public_ip;
pub use scheduler::SyncScheduler;
