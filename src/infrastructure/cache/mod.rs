//! Edge cache layer in front of the origin store.
//!
//! Provides an [`EdgeCache`] trait with two implementations:
//! - [`MokaEdgeCache`] - In-process cache, the default
//! - [`RedisEdgeCache`] - Redis cache shared across instances

mod moka_cache;
mod redis_cache;
mod service;

pub use moka_cache::MokaEdgeCache;
pub use redis_cache::RedisEdgeCache;
pub use service::{CacheError, CacheResult, EdgeCache};

#[cfg(test)]
pub use service::MockEdgeCache;
