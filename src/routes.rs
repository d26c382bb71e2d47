//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`  - Health check: origin, edge cache, write-back queue
//! - `ANY  /{slug}`  - Slug redirect (non-`GET` answers 405)
//! - `ANY  /`        - No slug: 405 for non-`GET`, otherwise 404
//! - anything else   - 404
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slashes trimmed before routing (see [`app`])

use crate::api::handlers::{fallback_handler, health_handler, redirect_handler, root_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::{any, get};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// The service actually served: [`app_router`] behind trailing-slash trimming.
///
/// Normalization has to wrap the router rather than be added with
/// `Router::layer`, which only runs after a route has matched. With it,
/// `/abc///` is routed (and cached) as `/abc`.
pub fn app(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(app_router(state))
}

/// Constructs the application router with all routes and middleware.
///
/// `/health` is a static route and wins over `/{slug}`, so `health` cannot be
/// used as a slug.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(root_handler))
        .route("/health", get(health_handler))
        .route("/{slug}", any(redirect_handler))
        .fallback(fallback_handler)
        .with_state(state)
        .layer(tracing::layer())
}
