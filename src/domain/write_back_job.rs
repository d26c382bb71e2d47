//! Deferred edge-cache population.

use std::time::Duration;

use crate::domain::cache_key::{CacheKey, CacheRequest};
use crate::domain::cached_response::CachedResponse;
use crate::infrastructure::cache::EdgeCache;
use tracing::{debug, error};

/// A single edge-cache write scheduled after a response was returned.
///
/// Built on the origin path of [`crate::application::services::RedirectResolver`]
/// and handed to [`crate::domain::write_back_worker::run_write_back_worker`]
/// through a bounded channel, so the client response never waits for the cache.
///
/// The job carries its own [`CacheRequest`] built fresh from the key, and a
/// copy of the exact response that was sent to the client.
#[derive(Debug, Clone)]
pub struct WriteBackJob {
    pub request: CacheRequest,
    pub response: CachedResponse,
    pub ttl: Duration,
}

impl WriteBackJob {
    pub fn new(key: &CacheKey, response: CachedResponse, ttl: Duration) -> Self {
        Self {
            request: CacheRequest::new(key),
            response,
            ttl,
        }
    }

    /// Writes the response into `cache`.
    ///
    /// Failures are logged and reported through the return value only; they
    /// never propagate.
    pub async fn apply(self, cache: &dyn EdgeCache) -> bool {
        let key = self.request.key().clone();

        match cache.store(&self.request, self.response, self.ttl).await {
            Ok(()) => {
                debug!("Write-back stored {}", key);
                metrics::counter!("edge_cache_write_back_total", "result" => "ok").increment(1);
                true
            }
            Err(e) => {
                error!("Write-back failed for {}: {}", key, e);
                metrics::counter!("edge_cache_write_back_total", "result" => "error")
                    .increment(1);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::redirect_response::RedirectResponseBuilder;
    use crate::infrastructure::cache::{CacheError, MockEdgeCache, MokaEdgeCache};
    use url::Url;

    fn job() -> WriteBackJob {
        let key = CacheKey::from_url(&Url::parse("https://s.example.com/abc").unwrap());
        let response =
            RedirectResponseBuilder::new(60).build(&Url::parse("https://dest.example/").unwrap());
        WriteBackJob::new(&key, response, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_apply_stores_response() {
        let cache = MokaEdgeCache::new(10);
        let job = job();
        let request = job.request.clone();
        let response = job.response.clone();

        assert!(job.apply(&cache).await);
        assert_eq!(cache.lookup(&request).await.unwrap(), Some(response));
    }

    #[tokio::test]
    async fn test_apply_contains_store_failure() {
        let mut cache = MockEdgeCache::new();
        cache
            .expect_store()
            .times(1)
            .returning(|_, _, _| Err(CacheError::OperationError("boom".to_string())));

        assert!(!job().apply(&cache).await);
    }
}
