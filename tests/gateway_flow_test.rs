//! End-to-end flow: router -> scheduler -> HTTP transport against a mocked session service.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use httpmock::prelude::*;
use relay_gateway::api::create_router;
use relay_gateway::utils::validation::Validate;
use relay_gateway::{GatewayConfig, GatewayServer};
use serde_json::json;
use std::time::Duration;
use tower::ServiceExt;

fn config_for(server: &MockServer) -> GatewayConfig {
    let toml = format!(
        r#"
[transport]
endpoint = "{}"
timeout_seconds = 5

[bulk]
max_messages = 10
min_delay_ms = 1
max_delay_ms = 5

[[instances]]
phone_number = "+15550000001"
api_key = "flow-key"
"#,
        server.base_url()
    );
    GatewayConfig::from_toml_str(&toml).unwrap()
}

#[tokio::test]
async fn test_bulk_send_reaches_session_service() {
    let server = MockServer::start_async().await;
    let status = server
        .mock_async(|when, then| {
            when.method(GET).path_contains("/sessions/").path_contains("/status");
            then.status(200).json_body(json!({"connected": true}));
        })
        .await;
    let combined = server
        .mock_async(|when, then| {
            when.method(POST)
                .path_contains("/messages")
                .json_body(json!({"to": "+11111111111", "body": "first\n\nsecond"}));
            then.status(200);
        })
        .await;
    let single = server
        .mock_async(|when, then| {
            when.method(POST)
                .path_contains("/messages")
                .json_body(json!({"to": "+12222222222", "body": "other"}));
            then.status(500).body("session crashed");
        })
        .await;

    let config = config_for(&server);
    tokio_test::assert_ok!(config.validate());

    let state = tokio_test::assert_ok!(GatewayServer::new(config).build_state());
    let scheduler = state.scheduler.clone();
    let app = create_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/send/bulk")
        .header("x-api-key", "flow-key")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"messages": [
                {"to": "+11111111111", "message": "first"},
                {"to": "+12222222222", "message": "other"},
                {"to": "+11111111111", "message": "second"}
            ]})
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let summary = scheduler.shutdown(Duration::from_secs(5)).await;
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.abandoned, 0);

    status.assert_async().await;
    combined.assert_async().await;
    single.assert_async().await;
}

#[tokio::test]
async fn test_single_send_reports_disconnected_session() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path_contains("/status");
            then.status(200).json_body(json!({"connected": false}));
        })
        .await;
    let send = server
        .mock_async(|when, then| {
            when.method(POST).path_contains("/messages");
            then.status(200);
        })
        .await;

    let state = GatewayServer::new(config_for(&server)).build_state().unwrap();
    let app = create_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/send")
        .header("x-api-key", "flow-key")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"to": "+11111111111", "message": "hi"}).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    send.assert_hits_async(0).await;
}
