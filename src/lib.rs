//! # Edge Redirector
//!
//! Resolves a short slug to a target URL and answers with a `301`, keeping a
//! response cache in front of a Redis origin store.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Cache keys, response snapshots, origin trait, write-back
//! - **Application Layer** ([`application`]) - Redirect resolution and miss coalescing
//! - **Infrastructure Layer** ([`infrastructure`]) - Edge cache and origin store clients
//! - **API Layer** ([`api`]) - HTTP handlers, DTOs, and middleware
//!
//! ## Request Flow
//!
//! 1. Canonical cache key from the public request URL
//! 2. Edge cache lookup; a hit is returned as stored
//! 3. On a miss, origin store lookup by slug
//! 4. The redirect is returned immediately and written back to the edge cache
//!    by a background worker
//!
//! ## Quick Start
//!
//! ```bash
//! export ORIGIN_REDIS_URL="redis://localhost:6379"
//! redis-cli SET abc https://example.com/page
//!
//! cargo run
//! curl -i http://localhost:3000/abc
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{RedirectResolver, ResolverSettings};
    pub use crate::domain::cache_key::{CacheKey, CacheRequest};
    pub use crate::domain::cached_response::CachedResponse;
    pub use crate::domain::repositories::{OriginError, OriginResolver};
    pub use crate::error::AppError;
    pub use crate::infrastructure::cache::{EdgeCache, MokaEdgeCache};
    pub use crate::state::AppState;
}
