mod common;

use axum::{Router, http::StatusCode, routing::get};
use axum_test::TestServer;
use edge_redirector::api::handlers::health_handler;

fn make_server(ctx: &common::TestContext) -> TestServer {
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(ctx.state.clone());
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_endpoint_success() {
    let ctx = common::create_test_state(&[]);
    let server = make_server(&ctx);

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["origin"]["status"], "ok");
    assert_eq!(json["checks"]["edge_cache"]["status"], "ok");
    assert_eq!(json["checks"]["edge_cache"]["message"], "Backend: memory");
    assert_eq!(json["checks"]["write_back_queue"]["status"], "ok");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let ctx = common::create_test_state(&[]);
    let server = make_server(&ctx);

    let response = server.get("/health").await;

    let json = response.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json.get("checks").is_some());
    assert!(json["checks"].get("origin").is_some());
    assert!(json["checks"].get("edge_cache").is_some());
    assert!(json["checks"].get("write_back_queue").is_some());
}

#[tokio::test]
async fn test_health_degraded_when_origin_down() {
    let ctx = common::create_test_state(&[]);
    ctx.origin.set_offline(true);
    let server = make_server(&ctx);

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["origin"]["status"], "error");
}

#[tokio::test]
async fn test_health_degraded_when_write_back_queue_closed() {
    let common::TestContext {
        state,
        write_back_rx,
        ..
    } = common::create_test_state(&[]);
    drop(write_back_rx);

    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);
    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["checks"]["write_back_queue"]["status"], "error");
}
