//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::RedirectResolver;

/// Application state shared across requests.
///
/// Cloned per request; everything inside is either `Arc`-shared or cheap to copy.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<RedirectResolver>,
    /// Scheme used for cache keys when no trusted proxy header says otherwise.
    pub public_scheme: Arc<str>,
    /// Whether `X-Forwarded-Proto` is trusted.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(resolver: Arc<RedirectResolver>, public_scheme: &str, behind_proxy: bool) -> Self {
        Self {
            resolver,
            public_scheme: Arc::from(public_scheme),
            behind_proxy,
        }
    }
}
