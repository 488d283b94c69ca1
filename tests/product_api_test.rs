mod common;

use axum::http::{Method, StatusCode};
use common::{expect_json, read_json, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn product_crud_is_gated_to_employees() {
    let app = TestApp::new().await;

    let created = expect_json(
        app.as_employee(
            Method::POST,
            "/api/v1/products",
            Some(json!({
                "name": "Dining Table",
                "description": "Solid pine, seats six",
                "price": "4500.00",
                "stock": 10,
            })),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let product_id = created["id"].as_str().unwrap().to_string();

    // Customers can browse...
    let listed = read_json(app.as_customer(Method::GET, "/api/v1/products", None).await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let fetched = read_json(
        app.as_customer(Method::GET, &format!("/api/v1/products/{}", product_id), None)
            .await,
    )
    .await;
    assert_eq!(fetched["name"], "Dining Table");

    // ...but not mutate.
    let response = app
        .as_customer(
            Method::POST,
            "/api/v1/products",
            Some(json!({ "name": "Nope", "price": "1.00" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .as_customer(
            Method::PUT,
            &format!("/api/v1/products/{}", product_id),
            Some(json!({ "stock": 0 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Employee updates stick.
    let updated = expect_json(
        app.as_employee(
            Method::PUT,
            &format!("/api/v1/products/{}", product_id),
            Some(json!({ "stock": 7 })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(updated["stock"], 7);

    // Delete
    let response = app
        .as_employee(Method::DELETE, &format!("/api/v1/products/{}", product_id), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn product_bom_can_be_replaced_and_read() {
    let app = TestApp::new().await;

    let pine = app.seed_inventory_item("PW-1x4x8", "Pinewood 1x4x8ft", 40).await;
    let screws = app.seed_inventory_item("BS-1.5", "Black Screw 1 1/2", 200).await;
    let chair = app.seed_product("Wooden Chair", dec!(1200.00), 10).await;

    let body = expect_json(
        app.as_employee(
            Method::PUT,
            &format!("/api/v1/products/{}/materials", chair.id),
            Some(json!({
                "materials": [
                    { "inventory_item_id": pine.id, "qty_per_unit": "3" },
                    { "inventory_item_id": screws.id, "qty_per_unit": "8" },
                ]
            })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let listed = read_json(
        app.as_employee(
            Method::GET,
            &format!("/api/v1/products/{}/materials", chair.id),
            None,
        )
        .await,
    )
    .await;
    let lines = listed.as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().any(|l| l["material"]["sku"] == "PW-1x4x8"));

    // Replacing again swaps the whole set.
    let body = expect_json(
        app.as_employee(
            Method::PUT,
            &format!("/api/v1/products/{}/materials", chair.id),
            Some(json!({
                "materials": [
                    { "inventory_item_id": pine.id, "qty_per_unit": "4" },
                ]
            })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn bom_replace_validates_items_and_quantities() {
    let app = TestApp::new().await;
    let chair = app.seed_product("Wooden Chair", dec!(1200.00), 10).await;

    let response = app
        .as_employee(
            Method::PUT,
            &format!("/api/v1/products/{}/materials", chair.id),
            Some(json!({
                "materials": [
                    { "inventory_item_id": uuid::Uuid::new_v4(), "qty_per_unit": "2" },
                ]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let pine = app.seed_inventory_item("PW-1x4x8", "Pinewood 1x4x8ft", 40).await;
    let response = app
        .as_employee(
            Method::PUT,
            &format!("/api/v1/products/{}/materials", chair.id),
            Some(json!({
                "materials": [
                    { "inventory_item_id": pine.id, "qty_per_unit": "0" },
                ]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
