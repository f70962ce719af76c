//! Sync Scheduler
//!
//! Background task that drives the reconciliation engine: once at
//! startup, then on every interval tick, and immediately whenever the
//! registry is mutated. Being the only caller of the engine, the single
//! loop also serializes sync invocations - two ticks can never overlap.

use crate::application::{ServiceRegistry, SyncService};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub struct SyncScheduler {
    registry: Arc<ServiceRegistry>,
    sync: Arc<SyncService>,
    interval: Duration,
}

impl SyncScheduler {
    pub fn new(
        registry: Arc<ServiceRegistry>,
        sync: Arc<SyncService>,
        interval: Duration,
    ) -> Self {
        Self {
            registry,
            sync,
            interval,
        }
    }

    /// Spawn the scheduler loop. The first tick fires immediately.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = self.registry.notified() => {
                        tracing::debug!("registry changed, syncing early");
                    }
                }

                let snapshot = self.registry.snapshot();
                self.sync.sync(&snapshot).await;
            }
        })
    }
}
