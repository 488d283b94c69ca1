use crate::handlers::common::{created_response, no_content_response, success_response, validate_input};
use crate::{
    auth::AuthUser,
    errors::ServiceError,
    services::carts::AddToCartInput,
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Creates the router for cart endpoints
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cart))
        .route("/", post(add_to_cart))
        .route("/:id", put(update_cart_item))
        .route("/:id", delete(remove_cart_item))
}

/// List the caller's cart with product details
async fn list_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let lines = state.services.carts.list(user.user_id).await?;
    Ok(success_response(lines))
}

/// Add a product to the caller's cart
async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddItemRequest>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let item = state
        .services
        .carts
        .add_item(
            user.user_id,
            AddToCartInput {
                product_id: payload.product_id,
                quantity: payload.quantity,
            },
        )
        .await?;

    Ok(created_response(item))
}

/// Set the quantity of a cart line
async fn update_cart_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let item = state
        .services
        .carts
        .update_quantity(user.user_id, id, payload.quantity)
        .await?;

    Ok(success_response(item))
}

/// Remove a cart line
async fn remove_cart_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    state.services.carts.remove_item(user.user_id, id).await?;
    Ok(no_content_response())
}

// Request DTOs

#[derive(Debug, Deserialize, Validate)]
pub struct AddItemRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuantityRequest {
    #[validate(range(min = 1))]
    pub quantity: i32,
}
