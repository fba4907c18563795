mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use linktrack::api::handlers::health_handler;

fn server(ctx: &common::TestContext) -> TestServer {
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(ctx.state.clone());

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_ok() {
    let ctx = common::create_test_context(100);
    let server = server(&ctx);

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 200);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert_eq!(json["checks"]["click_queue"]["status"], "ok");
    assert_eq!(
        json["checks"]["click_queue"]["message"],
        "Buffered: 0/100, dropped: 0"
    );
}

#[tokio::test]
async fn test_health_degraded_when_queue_closed() {
    let ctx = common::create_test_context(100);
    ctx.queue.close();

    let server = server(&ctx);

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["click_queue"]["status"], "error");
}
