mod common;

use axum::http::{Method, StatusCode};
use common::{expect_json, TestApp};
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;
use woodcraft_api::entities::{
    cart_item, inventory_item, inventory_usage, order, order_item, product, production,
};

async fn add_to_cart(app: &TestApp, product_id: uuid::Uuid, quantity: i32) {
    let response = app
        .as_customer(
            Method::POST,
            "/api/v1/cart",
            Some(json!({ "product_id": product_id, "quantity": quantity })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn checkout_creates_order_and_deducts_stock_and_materials() {
    let app = TestApp::new().await;

    let pine = app.seed_inventory_item("PW-1x4x8", "Pinewood 1x4x8ft", 50).await;
    let screws = app.seed_inventory_item("BS-1.5", "Black Screw 1 1/2", 100).await;
    let table = app.seed_product("Dining Table", dec!(4500.00), 10).await;
    app.set_bom(table.id, &[(pine.id, dec!(4)), (screws.id, dec!(12))])
        .await;

    add_to_cart(&app, table.id, 2).await;

    let body = expect_json(
        app.as_customer(
            Method::POST,
            "/api/v1/checkout",
            Some(json!({
                "payment_method": "cod",
                "shipping_address": "123 Mabini St",
                "contact_phone": "0917-555-0101",
            })),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(body["message"], "Checkout successful");
    let order_id: uuid::Uuid =
        serde_json::from_value(body["order_id"].clone()).expect("order id in response");
    assert_eq!(body["order"]["payment_status"], "cod_pending");
    assert_eq!(body["order"]["status"], "pending");

    let db = &*app.state.db;

    // Order and items
    let stored = order::Entity::find_by_id(order_id)
        .one(db)
        .await
        .unwrap()
        .expect("order persisted");
    assert_eq!(stored.total_price, dec!(9000.00));

    let items = order_item::Entity::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .all(db)
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);
    assert_eq!(items[0].price, dec!(4500.00));

    // Finished-goods stock decremented
    let table = product::Entity::find_by_id(table.id)
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(table.stock, 8);

    // Raw materials deducted per BOM: 4*2 pine, 12*2 screws
    let pine = inventory_item::Entity::find_by_id(pine.id)
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pine.quantity_on_hand, 42);
    let screws = inventory_item::Entity::find_by_id(screws.id)
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(screws.quantity_on_hand, 76);

    // Usage rows logged
    let usage = inventory_usage::Entity::find().all(db).await.unwrap();
    assert_eq!(usage.len(), 2);
    assert!(usage.iter().any(|u| u.qty_used == 8));
    assert!(usage.iter().any(|u| u.qty_used == 24));

    // One production record per line, seeded at Preparation/Pending
    let productions = production::Entity::find()
        .filter(production::Column::OrderId.eq(order_id))
        .all(db)
        .await
        .unwrap();
    assert_eq!(productions.len(), 1);
    assert_eq!(productions[0].stage, production::ProductionStage::Preparation);
    assert_eq!(productions[0].status, production::ProductionStatus::Pending);
    assert_eq!(productions[0].quantity, 2);
    assert_eq!(productions[0].product_name, "Dining Table");
    assert!(productions[0]
        .notes
        .as_deref()
        .unwrap()
        .starts_with("Generated from Order #ORD-"));

    // Cart cleared
    let remaining = cart_item::Entity::find()
        .filter(cart_item::Column::UserId.eq(app.customer.id))
        .count(db)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn checkout_rejects_empty_cart() {
    let app = TestApp::new().await;

    let body = expect_json(
        app.as_customer(Method::POST, "/api/v1/checkout", Some(json!({})))
            .await,
        StatusCode::BAD_REQUEST,
    )
    .await;

    assert!(body["message"].as_str().unwrap().contains("Cart is empty"));
}

#[tokio::test]
async fn checkout_rejects_insufficient_product_stock() {
    let app = TestApp::new().await;

    let stool = app.seed_product("Stool", dec!(800.00), 5).await;
    add_to_cart(&app, stool.id, 3).await;

    // Stock drops below the cart quantity between add and checkout.
    let mut update: product::ActiveModel = stool.clone().into();
    update.stock = sea_orm::Set(1);
    sea_orm::ActiveModelTrait::update(update, &*app.state.db)
        .await
        .unwrap();

    let body = expect_json(
        app.as_customer(Method::POST, "/api/v1/checkout", Some(json!({})))
            .await,
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await;

    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Stock unavailable for Stool"));

    // Nothing was written
    let orders = order::Entity::find().count(&*app.state.db).await.unwrap();
    assert_eq!(orders, 0);
}

#[tokio::test]
async fn checkout_reports_material_shortages_and_rolls_back() {
    let app = TestApp::new().await;

    let plywood = app
        .seed_inventory_item("PLY-4.2-4x8", "Plywood 4.2mm 4x8ft", 3)
        .await;
    let cabinet = app.seed_product("Cabinet", dec!(7000.00), 10).await;
    app.set_bom(cabinet.id, &[(plywood.id, dec!(4))]).await;

    add_to_cart(&app, cabinet.id, 2).await;

    let body = expect_json(
        app.as_customer(Method::POST, "/api/v1/checkout", Some(json!({})))
            .await,
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await;

    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Insufficient raw materials"));
    let shortages = body["shortages"].as_array().expect("shortages list");
    assert_eq!(shortages.len(), 1);
    assert_eq!(shortages[0]["sku"], "PLY-4.2-4x8");
    assert_eq!(shortages[0]["material_name"], "Plywood 4.2mm 4x8ft");
    assert_eq!(shortages[0]["on_hand"], 3);
    assert_eq!(shortages[0]["deficit"], 5);

    let db = &*app.state.db;

    // Rollback: inventory untouched, no order/production rows, cart intact
    let plywood = inventory_item::Entity::find_by_id(plywood.id)
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(plywood.quantity_on_hand, 3);
    assert_eq!(order::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(production::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(cart_item::Entity::find().count(db).await.unwrap(), 1);
}

#[tokio::test]
async fn checkout_accounts_for_materials_shared_across_lines() {
    let app = TestApp::new().await;

    // Both products consume the same pine stock. Each line alone fits within
    // on-hand, but together they exceed it.
    let pine = app.seed_inventory_item("PW-1x4x8", "Pinewood 1x4x8ft", 10).await;
    let chair = app.seed_product("Wooden Chair", dec!(1200.00), 10).await;
    let shelf = app.seed_product("Bookshelf", dec!(2500.00), 10).await;
    app.set_bom(chair.id, &[(pine.id, dec!(3))]).await;
    app.set_bom(shelf.id, &[(pine.id, dec!(4))]).await;

    add_to_cart(&app, chair.id, 2).await; // needs 6
    add_to_cart(&app, shelf.id, 2).await; // needs 8, only 4 left after the chairs

    let body = expect_json(
        app.as_customer(Method::POST, "/api/v1/checkout", Some(json!({})))
            .await,
        StatusCode::UNPROCESSABLE_ENTITY,
    )
    .await;

    let shortages = body["shortages"].as_array().expect("shortages list");
    assert_eq!(shortages.len(), 1);
    assert_eq!(shortages[0]["sku"], "PW-1x4x8");

    // No partial deduction happened
    let pine = inventory_item::Entity::find_by_id(pine.id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pine.quantity_on_hand, 10);
}

#[tokio::test]
async fn checkout_defaults_to_cod_and_provider_orders_start_unpaid() {
    let app = TestApp::new().await;

    let bed = app.seed_product("Bed Frame", dec!(9500.00), 4).await;
    add_to_cart(&app, bed.id, 1).await;

    let body = expect_json(
        app.as_customer(
            Method::POST,
            "/api/v1/checkout",
            Some(json!({ "payment_method": "maya" })),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["order"]["payment_method"], "maya");
    assert_eq!(body["order"]["payment_status"], "unpaid");

    // Second order without a payment method defaults to cash on delivery.
    add_to_cart(&app, bed.id, 1).await;
    let body = expect_json(
        app.as_customer(Method::POST, "/api/v1/checkout", None).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["order"]["payment_method"], "cod");
    assert_eq!(body["order"]["payment_status"], "cod_pending");
}

#[tokio::test]
async fn checkout_requires_authentication() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::POST, "/api/v1/checkout", Some(json!({})), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
