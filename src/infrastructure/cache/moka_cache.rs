//! In-process edge cache backed by Moka.

use super::service::{CacheResult, EdgeCache};
use crate::domain::cache_key::CacheRequest;
use crate::domain::cached_response::CachedResponse;
use async_trait::async_trait;
use moka::future::Cache;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Stored response with its own expiry deadline.
#[derive(Debug, Clone)]
struct CacheEntry {
    response: CachedResponse,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(response: CachedResponse, ttl: Duration) -> Self {
        Self {
            response,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Bounded in-memory edge cache.
///
/// Capacity eviction is left to Moka. Every entry carries the TTL passed to
/// [`EdgeCache::store`]; expired entries are reported as misses and dropped.
pub struct MokaEdgeCache {
    cache: Cache<String, CacheEntry>,
}

impl MokaEdgeCache {
    /// Creates a cache holding at most `max_capacity` responses.
    pub fn new(max_capacity: u64) -> Self {
        info!("Edge cache: in-memory (capacity {})", max_capacity);

        Self {
            cache: Cache::builder().max_capacity(max_capacity).build(),
        }
    }
}

#[async_trait]
impl EdgeCache for MokaEdgeCache {
    async fn lookup(&self, request: &CacheRequest) -> CacheResult<Option<CachedResponse>> {
        let key = request.key().as_str();

        match self.cache.get(key).await {
            Some(entry) if !entry.is_expired() => {
                debug!("Edge cache HIT: {}", key);
                Ok(Some(entry.response))
            }
            Some(_) => {
                debug!("Edge cache EXPIRED: {}", key);
                self.cache.invalidate(key).await;
                Ok(None)
            }
            None => {
                debug!("Edge cache MISS: {}", key);
                Ok(None)
            }
        }
    }

    async fn store(
        &self,
        request: &CacheRequest,
        response: CachedResponse,
        ttl: Duration,
    ) -> CacheResult<()> {
        let key = request.key().as_str().to_string();
        debug!("Edge cache SET: {} (TTL: {}s)", key, ttl.as_secs());

        self.cache.insert(key, CacheEntry::new(response, ttl)).await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache_key::CacheKey;
    use crate::domain::redirect_response::RedirectResponseBuilder;
    use url::Url;

    fn request(url: &str) -> CacheRequest {
        CacheRequest::new(&CacheKey::from_url(&Url::parse(url).unwrap()))
    }

    fn redirect(target: &str) -> CachedResponse {
        RedirectResponseBuilder::new(60).build(&Url::parse(target).unwrap())
    }

    #[tokio::test]
    async fn test_store_then_lookup() {
        let cache = MokaEdgeCache::new(100);
        let req = request("https://s.example.com/abc");

        cache
            .store(&req, redirect("https://dest.example/"), Duration::from_secs(60))
            .await
            .unwrap();

        let hit = cache.lookup(&req).await.unwrap();
        assert_eq!(hit, Some(redirect("https://dest.example/")));
    }

    #[tokio::test]
    async fn test_lookup_normalized_request_hits_same_entry() {
        let cache = MokaEdgeCache::new(100);

        cache
            .store(
                &request("http://s.example.com/abc"),
                redirect("https://dest.example/"),
                Duration::from_secs(60),
            )
            .await
            .unwrap();

        let hit = cache
            .lookup(&request("HTTP://S.Example.com/abc//"))
            .await
            .unwrap();
        assert!(hit.is_some());
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let cache = MokaEdgeCache::new(100);
        let req = request("https://s.example.com/abc");

        cache
            .store(&req, redirect("https://dest.example/"), Duration::ZERO)
            .await
            .unwrap();

        assert!(cache.lookup(&req).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_replaces_entry() {
        let cache = MokaEdgeCache::new(100);
        let req = request("https://s.example.com/abc");

        cache
            .store(&req, redirect("https://one.example/"), Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .store(&req, redirect("https://two.example/"), Duration::from_secs(60))
            .await
            .unwrap();

        let hit = cache.lookup(&req).await.unwrap();
        assert_eq!(hit, Some(redirect("https://two.example/")));
    }
}
