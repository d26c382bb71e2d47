//! Slug value type.

use std::fmt;

/// Path segment naming a redirect target in the origin store.
///
/// Opaque to this service apart from two rules: it is non-empty and it is a
/// single path segment (no `/`). Uniqueness is the origin store's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    /// Accepts a raw route segment, returning `None` when it cannot name a record.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || raw.contains('/') {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let slug = Slug::parse("abc").unwrap();
        assert_eq!(slug.as_str(), "abc");
        assert_eq!(slug.to_string(), "abc");
    }

    #[test]
    fn test_parse_empty() {
        assert!(Slug::parse("").is_none());
    }

    #[test]
    fn test_parse_multi_segment() {
        assert!(Slug::parse("a/b").is_none());
    }
}
