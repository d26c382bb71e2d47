//! Origin store adapters.
//!
//! - [`RedisOrigin`] - Redis key-value store holding slug → URL records

mod redis_origin;

pub use redis_origin::RedisOrigin;
