//! Construction of the canonical redirect response.

use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use bytes::Bytes;
use url::Url;

use crate::domain::cached_response::CachedResponse;

/// `Content-Type` sent with every redirect.
pub const REDIRECT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Builds the fixed-shape 301 response for a resolved target.
///
/// The only input besides the target is `max_age`, advertised as
/// `Cache-Control: public, max-age=<max_age>` and fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct RedirectResponseBuilder {
    max_age: u64,
}

impl RedirectResponseBuilder {
    pub fn new(max_age_seconds: u64) -> Self {
        Self {
            max_age: max_age_seconds,
        }
    }

    pub fn max_age(&self) -> u64 {
        self.max_age
    }

    /// Returns `301 Moved Permanently` with `Location`, `Cache-Control`,
    /// `Content-Type` and an empty body.
    pub fn build(&self, target: &Url) -> CachedResponse {
        let mut headers = HeaderMap::with_capacity(3);

        // `Url` serialization is always valid ASCII.
        if let Ok(location) = HeaderValue::from_str(target.as_str()) {
            headers.insert(header::LOCATION, location);
        }

        headers.insert(header::CACHE_CONTROL, self.cache_control());
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(REDIRECT_CONTENT_TYPE),
        );

        CachedResponse::new(StatusCode::MOVED_PERMANENTLY, headers, Bytes::new())
    }

    fn cache_control(&self) -> HeaderValue {
        HeaderValue::try_from(format!("public, max-age={}", self.max_age))
            .unwrap_or_else(|_| HeaderValue::from_static("public"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_redirect() {
        let builder = RedirectResponseBuilder::new(3600);
        let target = Url::parse("https://dest.example/page").unwrap();

        let response = builder.build(&target);

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://dest.example/page"
        );
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=3600"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            REDIRECT_CONTENT_TYPE
        );
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = RedirectResponseBuilder::new(60);
        let target = Url::parse("https://dest.example/a?b=c").unwrap();

        assert_eq!(builder.build(&target), builder.build(&target));
    }

    #[test]
    fn test_location_uses_serialized_url() {
        let builder = RedirectResponseBuilder::new(60);
        let target = Url::parse("HTTPS://Dest.Example").unwrap();

        let response = builder.build(&target);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://dest.example/"
        );
    }
}
