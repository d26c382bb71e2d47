//! Repository trait for the origin slug store.

use crate::domain::slug::Slug;
use async_trait::async_trait;

/// Failures talking to the origin store.
///
/// A missing record is never an error: it is `Ok(None)` from
/// [`OriginResolver::resolve`]. `Unavailable` and `Timeout` mean "the answer
/// is unknown right now" and must not be cached or reported as not found.
/// `InvalidRecord` means the store answered with something that can never be
/// a target URL (not UTF-8, wrong value type); asking again will not help.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OriginError {
    #[error("Origin store unavailable: {0}")]
    Unavailable(String),

    #[error("Origin store timed out after {0}ms")]
    Timeout(u64),

    #[error("Origin record is unreadable: {0}")]
    InvalidRecord(String),
}

impl OriginError {
    /// Whether a retry of the same lookup may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}

/// Read-only access to the slug → target URL mapping.
///
/// # Implementations
///
/// - [`crate::infrastructure::origin::RedisOrigin`] - Redis `GET` per slug
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OriginResolver: Send + Sync {
    /// Looks up the target URL stored for `slug`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` if a record exists
    /// - `Ok(None)` if the store has no record for the slug
    ///
    /// # Errors
    ///
    /// Returns [`OriginError`] when the store cannot be reached, answers too
    /// late, or holds a record that is not a string.
    async fn resolve(&self, slug: &Slug) -> Result<Option<String>, OriginError>;

    /// Checks if the origin store is reachable.
    async fn health_check(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(OriginError::Unavailable("connection refused".to_string()).is_transient());
        assert!(OriginError::Timeout(2000).is_transient());
        assert!(!OriginError::InvalidRecord("WRONGTYPE".to_string()).is_transient());
    }
}
