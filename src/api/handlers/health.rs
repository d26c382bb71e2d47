//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Origin**: Tests origin store reachability
/// 2. **Edge cache**: Backend health check (Redis PING, always ok in memory)
/// 3. **Write-back queue**: Checks if channel is open and reports free capacity
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "origin": { "status": "ok", "message": "Origin store reachable" },
///     "edge_cache": { "status": "ok", "message": "Backend: memory" },
///     "write_back_queue": { "status": "ok", "message": "Free capacity: 1024" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let origin_check = check_origin(&state).await;

    let cache_check = check_edge_cache(&state).await;

    let queue_check = check_write_back_queue(&state);

    let all_healthy =
        origin_check.status == "ok" && cache_check.status == "ok" && queue_check.status == "ok";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            origin: origin_check,
            edge_cache: cache_check,
            write_back_queue: queue_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_origin(state: &AppState) -> CheckStatus {
    if state.resolver.origin().health_check().await {
        CheckStatus {
            status: "ok".to_string(),
            message: Some("Origin store reachable".to_string()),
        }
    } else {
        CheckStatus {
            status: "error".to_string(),
            message: Some("Origin store unreachable".to_string()),
        }
    }
}

async fn check_edge_cache(state: &AppState) -> CheckStatus {
    let cache = state.resolver.edge_cache();

    if cache.health_check().await {
        CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("Backend: {}", cache.backend())),
        }
    } else {
        CheckStatus {
            status: "error".to_string(),
            message: Some(format!("Backend {} unreachable", cache.backend())),
        }
    }
}

/// Checks if the write-back queue is still drained by its worker.
fn check_write_back_queue(state: &AppState) -> CheckStatus {
    let sender = state.resolver.write_back_sender();

    if sender.is_closed() {
        CheckStatus {
            status: "error".to_string(),
            message: Some("Write-back queue is closed".to_string()),
        }
    } else {
        CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("Free capacity: {}", sender.capacity())),
        }
    }
}
