//! Handler for short URL redirect.

use axum::{
    extract::{Path, State, rejection::PathRejection},
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::effective_url::effective_url;

/// Redirects a slug to its target URL.
///
/// # Endpoint
///
/// `ANY /{slug}` (only `GET` succeeds)
///
/// # Request Flow
///
/// 1. Rebuild the effective request URL from `Host` and the path
/// 2. Hand method, slug and URL to [`crate::application::services::RedirectResolver`]
/// 3. Return the resolved response unchanged
///
/// Edge cache hits and fresh origin lookups produce byte-identical responses.
///
/// A path segment that does not decode to UTF-8 cannot name a slug; it is
/// treated as a missing slug so the method check still runs first.
///
/// # Errors
///
/// - 400 Bad Request if the Host header is missing or invalid
/// - 404 Not Found if the slug has no record or does not decode
/// - 405 Method Not Allowed for anything but `GET`
/// - 502 Bad Gateway if the origin holds an unusable target
/// - 503 Service Unavailable if the origin store cannot be reached
pub async fn redirect_handler(
    slug: Result<Path<String>, PathRejection>,
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let slug = match slug {
        Ok(Path(slug)) => Some(slug),
        Err(e) => {
            tracing::debug!("Undecodable slug in {}: {}", uri.path(), e);
            None
        }
    };

    resolve(state, method, slug, uri, headers).await
}

/// Handles `ANY /`: a request without a slug segment.
///
/// Goes through the same resolver so method validation comes first
/// (405 for non-`GET`), then the missing slug yields 404.
pub async fn root_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    resolve(state, method, None, uri, headers).await
}

async fn resolve(
    state: AppState,
    method: Method,
    slug: Option<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let url = effective_url(&headers, &uri, &state.public_scheme, state.behind_proxy)?;

    let outcome = state.resolver.resolve_detached(method, slug, url).await?;

    Ok(outcome.response.into_response())
}
