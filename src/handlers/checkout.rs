use crate::{auth::AuthUser, errors::ServiceError, services::orders::CheckoutInput, AppState};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::post,
    Router,
};
use serde_json::json;

pub fn checkout_routes() -> Router<AppState> {
    Router::new().route("/", post(checkout))
}

/// Convert the caller's cart into an order.
///
/// Rejections: 400 on an empty cart, 422 with a message when finished-goods
/// stock is short, and 422 with a `shortages` list when raw materials are
/// insufficient.
#[utoipa::path(
    post,
    path = "/api/v1/checkout",
    request_body = CheckoutInput,
    responses(
        (status = 200, description = "Checkout successful"),
        (status = 400, description = "Cart is empty", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock or raw materials", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Checkout"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Option<Json<CheckoutInput>>,
) -> Result<(StatusCode, Json<serde_json::Value>), ServiceError> {
    let input = payload.map(|Json(input)| input).unwrap_or_default();

    let outcome = state.services.orders.checkout(user.user_id, input).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Checkout successful",
            "order_id": outcome.order_id,
            "order": outcome.order,
        })),
    ))
}
