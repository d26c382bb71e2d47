//! Validation of redirect targets read from the origin store.
//!
//! The origin store is written by other systems, so its values are parsed
//! before they end up in a `Location` header.

use url::Url;

/// Errors for origin values that cannot be used as a redirect target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetUrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("Stored value is not a string: {0}")]
    Unreadable(String),
}

/// Parses a stored target into an absolute URL.
///
/// # Rules
///
/// 1. **Protocol**: Only HTTP and HTTPS are allowed
/// 2. **Whitespace**: Leading/trailing whitespace is ignored
/// 3. **Everything else**: Kept as the `url` crate serializes it, including
///    query and fragment
///
/// # Security
///
/// Rejects potentially dangerous protocols like `javascript:`, `data:`, `file:`, etc.
///
/// # Errors
///
/// Returns [`TargetUrlError::InvalidFormat`] for malformed or relative URLs.
/// Returns [`TargetUrlError::UnsupportedProtocol`] for non-HTTP(S) schemes.
pub fn parse_target_url(input: &str) -> Result<Url, TargetUrlError> {
    let url =
        Url::parse(input.trim()).map_err(|e| TargetUrlError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(TargetUrlError::UnsupportedProtocol),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_https() {
        let result = parse_target_url("https://dest.example/page");
        assert_eq!(result.unwrap().as_str(), "https://dest.example/page");
    }

    #[test]
    fn test_parse_keeps_query_and_fragment() {
        let result = parse_target_url("https://dest.example/page?a=1#section");
        assert_eq!(
            result.unwrap().as_str(),
            "https://dest.example/page?a=1#section"
        );
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let result = parse_target_url("  https://dest.example/\n");
        assert_eq!(result.unwrap().as_str(), "https://dest.example/");
    }

    #[test]
    fn test_parse_relative_url() {
        let result = parse_target_url("/just/a/path");
        assert!(matches!(result, Err(TargetUrlError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_javascript_scheme() {
        let result = parse_target_url("javascript:alert(1)");
        assert_eq!(result, Err(TargetUrlError::UnsupportedProtocol));
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_target_url("").is_err());
    }
}
