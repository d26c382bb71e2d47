//! Immutable HTTP response snapshot stored in the edge cache.

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Complete response representation: status, headers and body.
///
/// Built once (see [`crate::domain::redirect_response::RedirectResponseBuilder`])
/// and never mutated afterwards. Both the cache-hit and the origin path turn the
/// same value into the wire response through [`IntoResponse`], so a client
/// cannot tell which path served it.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl CachedResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Converts into the serializable form used by out-of-process caches.
    pub fn to_snapshot(&self) -> ResponseSnapshot {
        ResponseSnapshot {
            status: self.status.as_u16(),
            headers: self
                .headers
                .iter()
                .map(|(name, value)| (name.as_str().to_string(), value.as_bytes().to_vec()))
                .collect(),
            body: self.body.clone(),
        }
    }
}

impl IntoResponse for CachedResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Serializable form of a [`CachedResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseSnapshot {
    pub status: u16,
    pub headers: Vec<(String, Vec<u8>)>,
    pub body: Bytes,
}

/// Errors rebuilding a [`CachedResponse`] from a stored snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Invalid status code: {0}")]
    Status(u16),

    #[error("Invalid header: {0}")]
    Header(String),
}

impl TryFrom<ResponseSnapshot> for CachedResponse {
    type Error = SnapshotError;

    fn try_from(snapshot: ResponseSnapshot) -> Result<Self, Self::Error> {
        let status = StatusCode::from_u16(snapshot.status)
            .map_err(|_| SnapshotError::Status(snapshot.status))?;

        let mut headers = HeaderMap::with_capacity(snapshot.headers.len());
        for (name, value) in snapshot.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| SnapshotError::Header(name.clone()))?;
            let header_value =
                HeaderValue::from_bytes(&value).map_err(|_| SnapshotError::Header(name))?;
            headers.append(header_name, header_value);
        }

        Ok(Self::new(status, headers, snapshot.body))
    }
}
