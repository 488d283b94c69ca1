mod common;

use axum::http::{Method, StatusCode};
use common::{expect_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn register_login_me_roundtrip() {
    let app = TestApp::new().await;

    let registered = expect_json(
        app.request(
            Method::POST,
            "/auth/register",
            Some(json!({
                "name": "Carla Reyes",
                "email": "carla@example.com",
                "password": "a-long-enough-password",
            })),
            None,
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(registered["user"]["role"], "customer");
    assert!(registered["token"]["access_token"].as_str().is_some());

    let logged_in = expect_json(
        app.request(
            Method::POST,
            "/auth/login",
            Some(json!({
                "email": "carla@example.com",
                "password": "a-long-enough-password",
            })),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let token = logged_in["token"]["access_token"].as_str().unwrap().to_string();

    let me = expect_json(
        app.request(Method::GET, "/auth/me", None, Some(&token)).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(me["email"], "carla@example.com");
    assert_eq!(me["name"], "Carla Reyes");
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/auth/register",
            Some(json!({
                "name": "Dan",
                "email": "dan@example.com",
                "password": "correct-password-1",
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({
                "email": "dan@example.com",
                "password": "wrong-password-1",
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_rejects_duplicates_and_bad_input() {
    let app = TestApp::new().await;

    let payload = json!({
        "name": "Eve",
        "email": "eve@example.com",
        "password": "a-long-enough-password",
    });
    let response = app
        .request(Method::POST, "/auth/register", Some(payload.clone()), None)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request(Method::POST, "/auth/register", Some(payload), None)
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .request(
            Method::POST,
            "/auth/register",
            Some(json!({ "name": "X", "email": "not-an-email", "password": "long-enough-pass" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(
            Method::POST,
            "/auth/register",
            Some(json!({ "name": "X", "email": "x@example.com", "password": "short" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn requests_with_invalid_tokens_are_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/v1/cart", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
