//! HTTP-facing error type.
//!
//! Every failure that reaches a handler is an [`AppError`], rendered as
//! `{ "error": { "code", "message", "details" } }` with a matching status code.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::application::services::ResolveError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    MethodNotAllowed { message: String, details: Value },
    #[error("{message}")]
    BadGateway { message: String, details: Value },
    #[error("{message}")]
    Unavailable { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn method_not_allowed(message: impl Into<String>, details: Value) -> Self {
        Self::MethodNotAllowed {
            message: message.into(),
            details,
        }
    }
    pub fn bad_gateway(message: impl Into<String>, details: Value) -> Self {
        Self::BadGateway {
            message: message.into(),
            details,
        }
    }
    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::MethodNotAllowed { message, details } => {
                ("method_not_allowed", message, details)
            }
            AppError::BadGateway { message, details } => ("bad_gateway", message, details),
            AppError::Unavailable { message, details } => {
                ("service_unavailable", message, details)
            }
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::METHOD_NOT_ALLOWED {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("GET"));
        }
        response
    }
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::MethodNotAllowed(method) => {
                AppError::method_not_allowed("Method not allowed", json!({ "method": method }))
            }
            ResolveError::MissingSlug => AppError::not_found("Not found", json!({})),
            ResolveError::NotFound(slug) => {
                AppError::not_found("Short link not found", json!({ "slug": slug }))
            }
            ResolveError::Origin { slug, source } => AppError::unavailable(
                "Origin store unavailable",
                json!({ "slug": slug, "reason": source.to_string() }),
            ),
            ResolveError::InvalidTarget { slug, reason } => AppError::bad_gateway(
                "Origin store returned an invalid target",
                json!({ "slug": slug, "reason": reason.to_string() }),
            ),
            ResolveError::Aborted(reason) => {
                AppError::internal("Redirect resolution failed", json!({ "reason": reason }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::OriginError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::not_found("x", json!({})).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::method_not_allowed("x", json!({})).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            AppError::unavailable("x", json!({})).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::bad_gateway("x", json!({})).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::bad_request("Missing Host header", json!({})).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let response = AppError::from(ResolveError::MethodNotAllowed("POST".to_string()))
            .into_response();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "GET");
    }

    #[test]
    fn test_resolve_error_mapping() {
        assert_eq!(
            AppError::from(ResolveError::MissingSlug).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(ResolveError::NotFound("abc".to_string())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(ResolveError::Origin {
                slug: "abc".to_string(),
                source: OriginError::Timeout(100),
            })
            .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
