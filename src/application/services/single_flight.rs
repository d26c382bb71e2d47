//! Coalescing of concurrent origin lookups for the same cache key.

use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::domain::cache_key::CacheKey;

/// Removes the in-flight entry once its participant is done, even on panic or
/// cancellation. Only removes the cell this participant joined.
struct CleanupGuard<'a, T> {
    map: &'a DashMap<CacheKey, Arc<OnceCell<T>>>,
    key: CacheKey,
    cell: Arc<OnceCell<T>>,
}

impl<T> Drop for CleanupGuard<'_, T> {
    fn drop(&mut self) {
        self.map
            .remove_if(&self.key, |_, current| Arc::ptr_eq(current, &self.cell));
    }
}

/// Runs at most one computation per key at a time and shares its result.
///
/// The first caller for a key runs the closure; callers arriving while it is
/// running wait and receive a clone of the same value, failures included.
/// Once the computation finishes the key is released, so a later call starts
/// a fresh computation.
pub struct SingleFlight<T> {
    in_flight: DashMap<CacheKey, Arc<OnceCell<T>>>,
}

impl<T: Clone> SingleFlight<T> {
    pub fn new() -> Self {
        Self {
            in_flight: DashMap::new(),
        }
    }

    /// Runs `compute` for `key`, or joins a computation already in flight.
    pub async fn run<F, Fut>(&self, key: &CacheKey, compute: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let cell = self
            .in_flight
            .entry(key.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        let _cleanup = CleanupGuard {
            map: &self.in_flight,
            key: key.clone(),
            cell: cell.clone(),
        };

        cell.get_or_init(compute).await.clone()
    }

    /// Number of keys with a computation currently in flight.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}
