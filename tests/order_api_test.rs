mod common;

use axum::http::{Method, StatusCode};
use common::{expect_json, read_json, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

async fn place_order(app: &TestApp) -> Uuid {
    let table = app.seed_product("Coffee Table", dec!(3200.00), 15).await;
    let response = app
        .as_customer(
            Method::POST,
            "/api/v1/cart",
            Some(json!({ "product_id": table.id, "quantity": 2 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = expect_json(
        app.as_customer(Method::POST, "/api/v1/checkout", None).await,
        StatusCode::OK,
    )
    .await;
    serde_json::from_value(body["order_id"].clone()).unwrap()
}

#[tokio::test]
async fn employees_see_all_orders_with_customer_details() {
    let app = TestApp::new().await;
    let order_id = place_order(&app).await;

    let listed = expect_json(
        app.as_employee(Method::GET, "/api/v1/orders", None).await,
        StatusCode::OK,
    )
    .await;
    let orders = listed.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], order_id.to_string());
    assert_eq!(orders[0]["customer"]["email"], "ana@example.com");
    assert_eq!(orders[0]["items"][0]["product_name"], "Coffee Table");

    // Customers may not use the staff listing.
    let response = app.as_customer(Method::GET, "/api/v1/orders", None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn customers_see_their_own_orders() {
    let app = TestApp::new().await;
    let order_id = place_order(&app).await;

    let listed = read_json(app.as_customer(Method::GET, "/api/v1/orders/my", None).await).await;
    let orders = listed.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], order_id.to_string());
    let total: rust_decimal::Decimal =
        serde_json::from_value(orders[0]["total_price"].clone()).unwrap();
    assert_eq!(total, dec!(6400));

    // The employee placed no orders.
    let listed = read_json(app.as_employee(Method::GET, "/api/v1/orders/my", None).await).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn order_detail_is_a_staff_view() {
    let app = TestApp::new().await;
    let order_id = place_order(&app).await;

    let detail = expect_json(
        app.as_employee(Method::GET, &format!("/api/v1/orders/{}", order_id), None)
            .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(detail["items"].as_array().unwrap().len(), 1);
    assert_eq!(detail["items"][0]["quantity"], 2);

    let response = app
        .as_customer(Method::GET, &format!("/api/v1/orders/{}", order_id), None)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .as_employee(Method::GET, &format!("/api/v1/orders/{}", Uuid::new_v4()), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn employees_can_mark_orders_complete() {
    let app = TestApp::new().await;
    let order_id = place_order(&app).await;

    let body = expect_json(
        app.as_employee(
            Method::POST,
            &format!("/api/v1/orders/{}/complete", order_id),
            None,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["message"], "Order marked as complete");

    let detail = read_json(
        app.as_employee(Method::GET, &format!("/api/v1/orders/{}", order_id), None)
            .await,
    )
    .await;
    assert_eq!(detail["status"], "completed");

    // Customers cannot complete orders, even their own.
    let response = app
        .as_customer(
            Method::POST,
            &format!("/api/v1/orders/{}/complete", order_id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
