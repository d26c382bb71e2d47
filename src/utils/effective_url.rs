//! Reconstruction of the public URL a client requested.

use crate::AppError;
use axum::http::{HeaderMap, Uri, header};
use serde_json::json;
use url::Url;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Rebuilds the effective request URL from the request line and headers.
///
/// - **Scheme**: first `X-Forwarded-Proto` value when `behind_proxy` is set and the
///   header carries `http` or `https`, otherwise `default_scheme`
/// - **Authority**: the `Host` header, falling back to the URI authority (HTTP/2)
/// - **Path**: the request URI path; the query string is dropped
///
/// # Errors
///
/// Returns [`AppError::Validation`] if:
/// - Neither a `Host` header nor a URI authority is present
/// - The host contains invalid UTF-8 or characters that are not part of an authority
/// - The resulting URL does not parse
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "S.Example.com:8080".parse().unwrap());
///
/// let url = effective_url(&headers, &"/abc?x=1".parse().unwrap(), "http", false).unwrap();
/// assert_eq!(url.as_str(), "http://s.example.com:8080/abc");
/// ```
pub fn effective_url(
    headers: &HeaderMap,
    uri: &Uri,
    default_scheme: &str,
    behind_proxy: bool,
) -> Result<Url, AppError> {
    let host = match headers.get(header::HOST) {
        Some(value) => value
            .to_str()
            .map_err(|_| AppError::bad_request("Invalid Host header", json!({})))?
            .to_string(),
        None => uri
            .authority()
            .map(|a| a.as_str().to_string())
            .ok_or_else(|| AppError::bad_request("Missing Host header", json!({})))?,
    };

    if host.is_empty()
        || host
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '@' | '\\'))
    {
        return Err(AppError::bad_request(
            "Invalid Host header",
            json!({ "host": host }),
        ));
    }

    let scheme = forwarded_scheme(headers, behind_proxy).unwrap_or(default_scheme);

    Url::parse(&format!("{}://{}{}", scheme, host, uri.path())).map_err(|e| {
        AppError::bad_request(
            "Invalid request URL",
            json!({ "host": host, "reason": e.to_string() }),
        )
    })
}

/// Returns the scheme announced by a trusted proxy, if usable.
fn forwarded_scheme(headers: &HeaderMap, behind_proxy: bool) -> Option<&'static str> {
    if !behind_proxy {
        return None;
    }

    let value = headers.get(FORWARDED_PROTO)?.to_str().ok()?;
    let first = value.split(',').next()?.trim();

    if first.eq_ignore_ascii_case("https") {
        Some("https")
    } else if first.eq_ignore_ascii_case("http") {
        Some("http")
    } else {
        None
    }
}
