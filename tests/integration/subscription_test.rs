//! Subscription endpoint behavior.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn duplicate_submission_stores_one_row() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json("/api/subscriptions", json!({ "token": "tok-device-1" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);

    let (status, body) = app
        .post_json("/api/subscriptions", json!({ "token": "tok-device-1" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body["data"]["message"]
            .as_str()
            .unwrap()
            .contains("already registered")
    );

    assert_eq!(app.store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn blank_token_is_rejected() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json("/api/subscriptions", json!({ "token": "" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("token is required")
    );

    let (status, _) = app
        .post_json("/api/subscriptions", json!({ "token": "   " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A body without the field reports the same contract.
    let (status, _) = app.post_json("/api/subscriptions", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn listing_returns_registered_subscriptions() {
    let app = TestApp::new();

    app.post_json(
        "/api/subscriptions",
        json!({ "token": "tok-a", "platform": "android" }),
    )
    .await;
    app.post_json("/api/subscriptions", json!({ "token": "tok-b" }))
        .await;

    let (status, body) = app.get("/api/subscriptions").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    let tokens: Vec<&str> = rows.iter().map(|r| r["token"].as_str().unwrap()).collect();
    assert!(tokens.contains(&"tok-a"));
    assert!(tokens.contains(&"tok-b"));
}

#[tokio::test]
async fn health_reports_store_status() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["store"], true);
}

#[tokio::test]
async fn dispatch_without_messaging_config_is_unavailable() {
    let app = TestApp::new();

    let (status, _) = app
        .post_json(
            "/api/notifications",
            json!({ "title": "Hello", "body": "World" }),
        )
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn preflight_is_answered_permissively() {
    use axum::body::Body;
    use http::Request;
    use tower::ServiceExt;

    let app = TestApp::new();

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/subscriptions")
        .header("Origin", "https://widgets.example.com")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert!(response.status().is_success());
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}
