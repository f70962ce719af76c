//! Concurrent Collection Fetcher
//!
//! The control plane only exposes "list of ids" plus "get by id" per
//! resource, so every collection listing costs one list call plus N
//! detail calls. This module runs the detail calls as parallel tasks,
//! admission-gated by a semaphore, and joins them into a same-length
//! collection in input order.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::domain::ports::RemoteError;

/// Fetch every id concurrently and assemble an ordered collection.
///
/// At most `limit` fetches are in flight at once. A failed or panicked
/// slot is logged and left as the resource's zero value; the overall call
/// still succeeds. Callers that need strict correctness must check for
/// zero-value entries.
pub async fn fetch_ordered<T, F, Fut>(ids: Vec<i64>, limit: usize, fetch: F) -> Vec<T>
where
    T: Default + Send + 'static,
    F: Fn(i64) -> Fut,
    Fut: Future<Output = Result<T, RemoteError>> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));

    let tasks: Vec<_> = ids
        .iter()
        .map(|&id| {
            let semaphore = semaphore.clone();
            // The future is lazy: the request only starts once the task
            // holds a permit.
            let fut = fetch(id);
            tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                fut.await
            })
        })
        .collect();

    let mut collection = Vec::with_capacity(tasks.len());
    for (task, id) in tasks.into_iter().zip(ids) {
        match task.await {
            Ok(Ok(item)) => collection.push(item),
            Ok(Err(err)) => {
                tracing::warn!("detail fetch for id {} failed: {}", id, err);
                collection.push(T::default());
            }
            Err(err) => {
                tracing::warn!("detail fetch task for id {} aborted: {}", id, err);
                collection.push(T::default());
            }
        }
    }

    collection
}
