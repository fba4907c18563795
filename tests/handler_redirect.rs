mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use linktrack::api::handlers::redirect_handler;

fn server(ctx: &common::TestContext) -> TestServer {
    let app = Router::new()
        .route("/{code}", get(redirect_handler))
        .layer(common::MockConnectInfoLayer)
        .with_state(ctx.state.clone());

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_redirect_success() {
    let ctx = common::create_test_context(100);
    common::create_test_link(&ctx.links, "aB3xY9", "https://example.com/target").await;

    let server = server(&ctx);

    let response = server
        .get("/aB3xY9")
        .add_header("User-Agent", "Mozilla/5.0 (test)")
        .await;

    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "https://example.com/target");

    assert_eq!(ctx.queue.len(), 1);
    ctx.queue.close();
    let event = ctx.queue.dequeue().await.unwrap();
    assert_eq!(event.short_code, "aB3xY9");
    assert_eq!(event.ip, "127.0.0.1");
    assert_eq!(event.user_agent, "Mozilla/5.0 (test)");
}

#[tokio::test]
async fn test_redirect_without_user_agent() {
    let ctx = common::create_test_context(100);
    common::create_test_link(&ctx.links, "noUA00", "https://example.com").await;

    let server = server(&ctx);

    let response = server.get("/noUA00").await;

    assert_eq!(response.status_code(), 302);
    ctx.queue.close();
    let event = ctx.queue.dequeue().await.unwrap();
    assert_eq!(event.user_agent, "");
}

#[tokio::test]
async fn test_redirect_not_found() {
    let ctx = common::create_test_context(100);
    let server = server(&ctx);

    let response = server.get("/nonexistent").await;

    assert_eq!(response.status_code(), 404);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
    assert!(ctx.queue.is_empty());
}

#[tokio::test]
async fn test_redirect_is_case_sensitive() {
    let ctx = common::create_test_context(100);
    common::create_test_link(&ctx.links, "AbCdEf", "https://example.com").await;

    let server = server(&ctx);

    assert_eq!(server.get("/AbCdEf").await.status_code(), 302);
    assert_eq!(server.get("/abcdef").await.status_code(), 404);
}

#[tokio::test]
async fn test_redirect_with_full_queue_still_redirects() {
    let ctx = common::create_test_context(1);
    common::create_test_link(&ctx.links, "busy01", "https://example.com/busy").await;

    let server = server(&ctx);

    for _ in 0..3 {
        let response = server.get("/busy01").await;
        assert_eq!(response.status_code(), 302);
        assert_eq!(response.header("location"), "https://example.com/busy");
    }

    assert_eq!(ctx.queue.len(), 1);
    assert_eq!(ctx.queue.dropped(), 2);
}
