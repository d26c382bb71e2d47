//! Canonical edge-cache keys and the synthetic requests addressed by them.

use axum::http::Method;
use std::fmt;
use url::Url;

/// Canonical identity of a redirect response in the edge cache.
///
/// Built from the public URL the client requested as
/// `<lowercased-origin><normalized-path>`, where the path has every trailing
/// `/` removed and an empty path becomes `/`. Query string and fragment are
/// not part of the key.
///
/// # Examples
///
/// ```ignore
/// let a = CacheKey::from_url(&Url::parse("HTTP://Example.com/foo///")?);
/// let b = CacheKey::from_url(&Url::parse("http://example.com/foo")?);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key from an effective request URL.
    ///
    /// Pure function: the same URL always yields the same key.
    pub fn from_url(url: &Url) -> Self {
        let origin = url.origin().ascii_serialization().to_ascii_lowercase();

        let trimmed = url.path().trim_end_matches('/');
        let path = if trimmed.is_empty() { "/" } else { trimmed };

        Self(format!("{}{}", origin, path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Synthetic request used as the addressing unit of an edge cache.
///
/// Always a `GET` for the key's URL, so a lookup and a later write-back for the
/// same public URL address the same entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRequest {
    method: Method,
    key: CacheKey,
}

impl CacheRequest {
    pub fn new(key: &CacheKey) -> Self {
        Self {
            method: Method::GET,
            key: key.clone(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }
}
