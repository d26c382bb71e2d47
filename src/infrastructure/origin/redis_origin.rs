//! Redis-backed origin store.

use crate::domain::repositories::{OriginError, OriginResolver};
use crate::domain::slug::Slug;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisError, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

/// Origin store reading `slug → target URL` records with Redis `GET`.
///
/// Every call is bounded by a timeout so a stalled store surfaces as
/// [`OriginError::Timeout`] instead of hanging the request.
pub struct RedisOrigin {
    client: ConnectionManager,
    key_prefix: String,
    timeout: Duration,
}

impl RedisOrigin {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `key_prefix` - namespace prepended to every slug (`ORIGIN_KEY_PREFIX`)
    /// - `timeout` - upper bound for a single lookup (`ORIGIN_TIMEOUT_MS`)
    ///
    /// # Errors
    ///
    /// Returns [`OriginError::Unavailable`] if the connection cannot be established
    /// or the PING fails.
    pub async fn connect(
        redis_url: &str,
        key_prefix: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, OriginError> {
        info!("Connecting to origin Redis");

        let client = Client::open(redis_url).map_err(|e| {
            OriginError::Unavailable(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| OriginError::Unavailable(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| OriginError::Unavailable(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to origin Redis");

        Ok(Self {
            client: manager,
            key_prefix: key_prefix.into(),
            timeout,
        })
    }

    fn build_key(&self, slug: &Slug) -> String {
        format!("{}{}", self.key_prefix, slug)
    }
}

#[async_trait]
impl OriginResolver for RedisOrigin {
    async fn resolve(&self, slug: &Slug) -> Result<Option<String>, OriginError> {
        let key = self.build_key(slug);
        let mut conn = self.client.clone();

        let result = tokio::time::timeout(self.timeout, conn.get::<_, Option<Vec<u8>>>(&key))
            .await
            .map_err(|_| OriginError::Timeout(self.timeout.as_millis() as u64))?;

        match result.map_err(classify_error)? {
            Some(raw) => {
                let url = decode_record(raw)?;
                debug!("Origin FOUND: {} -> {}", slug, url);
                Ok(Some(url))
            }
            None => {
                debug!("Origin NOT FOUND: {}", slug);
                Ok(None)
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        tokio::time::timeout(self.timeout, conn.ping::<()>())
            .await
            .is_ok_and(|r| r.is_ok())
    }
}

/// Server replies that will not change on retry become [`OriginError::InvalidRecord`].
fn classify_error(e: RedisError) -> OriginError {
    match e.code() {
        Some("WRONGTYPE") => OriginError::InvalidRecord(e.to_string()),
        _ => OriginError::Unavailable(e.to_string()),
    }
}

fn decode_record(raw: Vec<u8>) -> Result<String, OriginError> {
    String::from_utf8(raw)
        .map_err(|e| OriginError::InvalidRecord(format!("value is not UTF-8: {}", e)))
}
