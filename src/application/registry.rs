//! Desired-Service Registry
//!
//! Thread-safe mutable set of desired services. The inbound boundary
//! mutates it on service events; the scheduler snapshots it at each sync
//! tick. One mutex guards the set, held only for the mutation or the
//! snapshot copy, never across remote I/O.

use crate::domain::entities::DesiredService;
use parking_lot::Mutex;
use tokio::sync::Notify;

pub struct ServiceRegistry {
    services: Mutex<Vec<DesiredService>>,
    changed: Notify,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self {
            services: Mutex::new(Vec::new()),
            changed: Notify::new(),
        }
    }

    /// Add a desired service and wake the scheduler.
    pub fn add(&self, service: DesiredService) {
        tracing::info!(
            "desired service added: {}/{} port {}",
            service.frontend,
            service.backend,
            service.port
        );
        self.services.lock().push(service);
        self.changed.notify_one();
    }

    /// Remove the first structural match. Removing a service that is not
    /// present is a no-op, not an error.
    pub fn remove(&self, service: &DesiredService) -> bool {
        let removed = {
            let mut services = self.services.lock();
            match services.iter().position(|s| s == service) {
                Some(index) => {
                    services.remove(index);
                    true
                }
                None => false,
            }
        };

        if removed {
            tracing::info!(
                "desired service removed: {}/{} port {}",
                service.frontend,
                service.backend,
                service.port
            );
            self.changed.notify_one();
        }
        removed
    }

    /// Copy of the current set, so callers can iterate outside the lock.
    pub fn snapshot(&self) -> Vec<DesiredService> {
        self.services.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.services.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.lock().is_empty()
    }

    /// Resolves when the set is mutated after this call.
    pub async fn notified(&self) {
        self.changed.notified().await;
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
