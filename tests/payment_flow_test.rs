mod common;

use axum::http::{Method, StatusCode};
use common::{expect_json, read_json, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use woodcraft_api::services::providers::{maya, stripe, MayaClient, StripeClient};

/// Seed a product, put it in the customer's cart, and check out.
/// Returns the order id.
async fn checkout_order(app: &TestApp, payment: serde_json::Value) -> Uuid {
    let bed = app.seed_product("Bed Frame", dec!(9500.00), 50).await;
    let response = app
        .as_customer(
            Method::POST,
            "/api/v1/cart",
            Some(json!({ "product_id": bed.id, "quantity": 1 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = expect_json(
        app.as_customer(Method::POST, "/api/v1/checkout", Some(payment)).await,
        StatusCode::OK,
    )
    .await;
    serde_json::from_value(body["order_id"].clone()).expect("order id")
}

#[tokio::test]
async fn init_gcash_creates_stripe_session_and_stores_reference() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .and(header("authorization", "Bearer sk_test_woodcraft"))
        .and(body_string_contains("mode=payment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_test_123",
            "url": "https://checkout.stripe.test/cs_test_123",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = TestApp::with_config(|cfg| {
        cfg.stripe_secret_key = Some("sk_test_woodcraft".to_string());
        cfg.stripe_api_base = server.uri();
    })
    .await;

    let order_id = checkout_order(&app, json!({ "payment_method": "gcash" })).await;

    let body = expect_json(
        app.as_customer(
            Method::POST,
            "/api/v1/payments/init",
            Some(json!({ "order_id": order_id, "provider": "gcash" })),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(body["checkout_url"], "https://checkout.stripe.test/cs_test_123");
    assert_eq!(body["transaction_ref"], "cs_test_123");

    let status = read_json(
        app.as_customer(
            Method::GET,
            &format!("/api/v1/orders/{}/payment-status", order_id),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(status["payment_status"], "unpaid");
    assert_eq!(status["transaction_ref"], "cs_test_123");
}

#[tokio::test]
async fn init_maya_creates_checkout_with_order_reference() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/checkout/v1/checkouts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "checkoutId": "chk_456",
            "redirectUrl": "https://maya.test/checkout/chk_456",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = TestApp::with_config(|cfg| {
        cfg.maya_public_key = Some("pk-test-woodcraft".to_string());
        cfg.maya_api_base = server.uri();
    })
    .await;

    let order_id = checkout_order(&app, json!({ "payment_method": "maya" })).await;

    let body = expect_json(
        app.as_customer(
            Method::POST,
            "/api/v1/payments/init",
            Some(json!({ "order_id": order_id, "provider": "maya" })),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(body["checkout_url"], "https://maya.test/checkout/chk_456");
    let reference = body["transaction_ref"].as_str().unwrap();
    assert!(reference.starts_with("ORD-"), "reference: {}", reference);
}

#[tokio::test]
async fn init_returns_service_unavailable_when_provider_unconfigured() {
    let app = TestApp::new().await;
    let order_id = checkout_order(&app, json!({ "payment_method": "gcash" })).await;

    let response = app
        .as_customer(
            Method::POST,
            "/api/v1/payments/init",
            Some(json!({ "order_id": order_id, "provider": "gcash" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn init_rejects_unknown_provider_and_foreign_orders() {
    let app = TestApp::new().await;
    let order_id = checkout_order(&app, json!({ "payment_method": "gcash" })).await;

    let response = app
        .as_customer(
            Method::POST,
            "/api/v1/payments/init",
            Some(json!({ "order_id": order_id, "provider": "paypal" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Another user's order is invisible.
    let response = app
        .as_employee(
            Method::POST,
            "/api/v1/payments/init",
            Some(json!({ "order_id": order_id, "provider": "gcash" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn verify_requires_matching_transaction_reference() {
    let app = TestApp::new().await;
    let order_id = checkout_order(
        &app,
        json!({ "payment_method": "maya", "transaction_ref": "TXN-0001" }),
    )
    .await;

    // Wrong reference is rejected without changing the order.
    let response = app
        .as_customer(
            Method::POST,
            "/api/v1/payments/verify",
            Some(json!({
                "order_id": order_id,
                "transaction_ref": "TXN-9999",
                "status": "paid",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let status = read_json(
        app.as_customer(
            Method::GET,
            &format!("/api/v1/orders/{}/payment-status", order_id),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(status["payment_status"], "unpaid");

    // Matching reference applies the reported status.
    let body = expect_json(
        app.as_customer(
            Method::POST,
            "/api/v1/payments/verify",
            Some(json!({
                "order_id": order_id,
                "transaction_ref": "TXN-0001",
                "status": "paid",
            })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["order"]["payment_status"], "paid");
}

#[tokio::test]
async fn verify_can_mark_payment_failed() {
    let app = TestApp::new().await;
    let order_id = checkout_order(
        &app,
        json!({ "payment_method": "gcash", "transaction_ref": "TXN-0002" }),
    )
    .await;

    let body = expect_json(
        app.as_customer(
            Method::POST,
            "/api/v1/payments/verify",
            Some(json!({
                "order_id": order_id,
                "transaction_ref": "TXN-0002",
                "status": "failed",
            })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["order"]["payment_status"], "failed");
}

#[tokio::test]
async fn confirm_is_optimistic_and_idempotent() {
    let app = TestApp::new().await;
    let order_id = checkout_order(&app, json!({ "payment_method": "maya" })).await;

    let body = expect_json(
        app.as_customer(
            Method::POST,
            "/api/v1/payments/confirm",
            Some(json!({ "order_id": order_id, "provider": "maya" })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["message"], "Payment confirmed");
    assert_eq!(body["order"]["payment_status"], "paid");

    let body = expect_json(
        app.as_customer(
            Method::POST,
            "/api/v1/payments/confirm",
            Some(json!({ "order_id": order_id, "provider": "maya" })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["message"], "Already paid");
    assert_eq!(body["order"]["payment_status"], "paid");
}

#[tokio::test]
async fn stripe_client_builds_checkout_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .and(header("authorization", "Bearer sk_test_abc"))
        .and(body_string_contains("line_items%5B0%5D%5Bquantity%5D=1"))
        .and(body_string_contains("unit_amount%5D=450000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_unit_1",
            "url": "https://checkout.stripe.test/cs_unit_1",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = StripeClient::new("sk_test_abc".to_string(), server.uri());
    let session = client
        .create_checkout_session(stripe::CheckoutSessionRequest {
            amount: dec!(4500),
            currency: "PHP".to_string(),
            name: "Order #ORD-TEST".to_string(),
            success_url: "http://localhost:8080/payment/success".to_string(),
            cancel_url: "http://localhost:8080/payment/failed".to_string(),
            order_id: Uuid::new_v4(),
        })
        .await
        .expect("session created");

    assert_eq!(session.id, "cs_unit_1");
    assert_eq!(
        session.url.as_deref(),
        Some("https://checkout.stripe.test/cs_unit_1")
    );
}

#[tokio::test]
async fn stripe_client_surfaces_provider_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "error": { "message": "Your card was declined." }
        })))
        .mount(&server)
        .await;

    let client = StripeClient::new("sk_test_abc".to_string(), server.uri());
    let result = client
        .create_checkout_session(stripe::CheckoutSessionRequest {
            amount: dec!(100),
            currency: "PHP".to_string(),
            name: "Order #ORD-TEST".to_string(),
            success_url: "http://localhost/success".to_string(),
            cancel_url: "http://localhost/cancel".to_string(),
            order_id: Uuid::new_v4(),
        })
        .await;

    assert!(matches!(
        result,
        Err(woodcraft_api::errors::ServiceError::ExternalServiceError(_))
    ));
}

#[tokio::test]
async fn maya_client_sends_basic_auth_and_parses_redirect() {
    // base64("pk-test:") with a trailing colon, per basic auth with an empty password
    let expected_auth = "Basic cGstdGVzdDo=";

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/checkout/v1/checkouts"))
        .and(header("authorization", expected_auth))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "checkoutId": "chk_unit_1",
            "redirectUrl": "https://maya.test/chk_unit_1",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = MayaClient::new("pk-test".to_string(), server.uri());
    let checkout = client
        .create_checkout(maya::CheckoutRequest {
            total_amount: maya::CheckoutAmount {
                value: dec!(1200),
                currency: "PHP".to_string(),
            },
            buyer: maya::CheckoutBuyer {
                first_name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
            },
            items: vec![maya::CheckoutItem {
                name: "Order #ORD-TEST".to_string(),
                quantity: 1,
                total_amount: maya::CheckoutItemAmount { value: dec!(1200) },
            }],
            request_reference_number: "ORD-TEST-1700000000".to_string(),
            redirect_url: maya::RedirectUrls {
                success: "http://localhost:3000/cart?payment=success".to_string(),
                failure: "http://localhost:3000/cart?payment=failed".to_string(),
                cancel: "http://localhost:3000/cart?payment=cancel".to_string(),
            },
        })
        .await
        .expect("checkout created");

    assert_eq!(checkout.redirect_url.as_deref(), Some("https://maya.test/chk_unit_1"));
    assert_eq!(checkout.checkout_id.as_deref(), Some("chk_unit_1"));
}
