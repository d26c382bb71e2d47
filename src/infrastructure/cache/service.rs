//! Edge cache trait and error types.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::cache_key::CacheRequest;
use crate::domain::cached_response::CachedResponse;

/// Errors that can occur during edge cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Response cache sitting in front of the origin store.
///
/// Entries are complete responses addressed by a synthetic [`CacheRequest`].
/// The cache is only a hint: an entry may be evicted at any time, even right
/// after a successful `store`, and a miss says nothing about writes in flight
/// elsewhere. No locking or single-writer guarantee is provided.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::MokaEdgeCache`] - in-process cache with per-entry expiry
/// - [`crate::infrastructure::cache::RedisEdgeCache`] - Redis-backed cache shared by the fleet
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EdgeCache: Send + Sync {
    /// Returns the stored response for `request`, if any.
    ///
    /// Reads never mutate the cache contents.
    ///
    /// # Errors
    ///
    /// Backend failures are returned; callers treat them as a miss.
    async fn lookup(&self, request: &CacheRequest) -> CacheResult<Option<CachedResponse>>;

    /// Stores `response` for `request`, replacing any previous entry wholesale.
    ///
    /// # Errors
    ///
    /// Backend failures are returned to the caller, which is expected to log them.
    async fn store(
        &self,
        request: &CacheRequest,
        response: CachedResponse,
        ttl: Duration,
    ) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Short backend name for logs and health reports.
    fn backend(&self) -> &'static str;
}
