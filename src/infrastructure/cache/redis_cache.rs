//! Redis-backed edge cache shared by every instance.

use super::service::{CacheError, CacheResult, EdgeCache};
use crate::domain::cache_key::CacheRequest;
use crate::domain::cached_response::{CachedResponse, ResponseSnapshot};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

/// Redis edge cache storing JSON response snapshots.
///
/// Uses connection pooling via `ConnectionManager` for efficient connection reuse.
/// Entries expire through Redis `SET ... EX`; eviction under memory pressure is
/// whatever the Redis server is configured to do.
pub struct RedisEdgeCache {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisEdgeCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        info!("Connecting to edge cache Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to edge cache Redis");

        Ok(Self {
            client: manager,
            key_prefix: "edge:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, request: &CacheRequest) -> String {
        format!("{}{}", self.key_prefix, request.key())
    }
}

#[async_trait]
impl EdgeCache for RedisEdgeCache {
    async fn lookup(&self, request: &CacheRequest) -> CacheResult<Option<CachedResponse>> {
        let key = self.build_key(request);
        let mut conn = self.client.clone();

        let raw = conn
            .get::<_, Option<String>>(&key)
            .await
            .map_err(|e| CacheError::OperationError(format!("GET {}: {}", key, e)))?;

        let Some(raw) = raw else {
            debug!("Edge cache MISS: {}", key);
            return Ok(None);
        };

        let snapshot: ResponseSnapshot = serde_json::from_str(&raw)
            .map_err(|e| CacheError::OperationError(format!("Corrupt entry {}: {}", key, e)))?;
        let response = CachedResponse::try_from(snapshot)
            .map_err(|e| CacheError::OperationError(format!("Corrupt entry {}: {}", key, e)))?;

        debug!("Edge cache HIT: {}", key);
        Ok(Some(response))
    }

    async fn store(
        &self,
        request: &CacheRequest,
        response: CachedResponse,
        ttl: Duration,
    ) -> CacheResult<()> {
        let key = self.build_key(request);
        let mut conn = self.client.clone();

        let payload = serde_json::to_string(&response.to_snapshot())
            .map_err(|e| CacheError::OperationError(format!("Serialize {}: {}", key, e)))?;

        // EX 0 is rejected by Redis.
        let ttl_seconds = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(&key, payload, ttl_seconds)
            .await
            .map_err(|e| CacheError::OperationError(format!("SET {}: {}", key, e)))?;

        debug!("Edge cache SET: {} (TTL: {}s)", key, ttl_seconds);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
