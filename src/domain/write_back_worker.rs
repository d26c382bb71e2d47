//! Background worker draining the write-back queue.

use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tracing::{info, warn};

use crate::domain::write_back_job::WriteBackJob;
use crate::infrastructure::cache::EdgeCache;

/// Applies queued write-backs to the edge cache with bounded concurrency.
///
/// Runs until every sender is dropped. Jobs already received are still
/// applied after that, and the function only returns once all in-flight
/// writes have finished, so awaiting it is the shutdown hook that keeps
/// scheduled writes from being torn down half-way.
///
/// Failures are logged by [`WriteBackJob::apply`] and never retried.
pub async fn run_write_back_worker(
    mut rx: mpsc::Receiver<WriteBackJob>,
    cache: Arc<dyn EdgeCache>,
    concurrency: usize,
) {
    let concurrency = concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(concurrency));

    while let Some(job) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            warn!("Write-back semaphore closed, dropping job for {}", job.request.key());
            break;
        };

        let cache = cache.clone();
        tokio::spawn(async move {
            job.apply(cache.as_ref()).await;
            drop(permit);
        });
    }

    // Wait for in-flight writes before reporting the worker as stopped.
    match semaphore.acquire_many(concurrency as u32).await {
        Ok(_all) => info!("Write-back worker stopped"),
        Err(e) => warn!("Write-back worker stopped without draining: {}", e),
    }
}
