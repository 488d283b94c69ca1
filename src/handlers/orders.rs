use crate::handlers::common::success_response;
use crate::{auth::AuthUser, errors::ServiceError, AppState};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};
use serde_json::json;
use uuid::Uuid;

/// Creates the router for order endpoints. Staff-only handlers enforce the
/// employee role themselves; the router as a whole sits behind auth.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/my", get(my_orders))
        .route("/:id", get(get_order))
        .route("/:id/complete", post(mark_complete))
        .route("/:id/payment-status", get(payment_status))
        .route("/:id/tracking", get(order_tracking))
}

/// All orders with customer and line details. Employees only.
async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    user.require_employee()?;
    let orders = state.services.orders.list_all().await?;
    Ok(success_response(orders))
}

/// The caller's own orders
async fn my_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let orders = state.services.orders.my_orders(user.user_id).await?;
    Ok(success_response(orders))
}

/// Single order detail. Employees only.
async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    user.require_employee()?;
    let order = state.services.orders.get(id).await?;
    Ok(success_response(order))
}

/// Mark an order completed. Employees only.
async fn mark_complete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    user.require_employee()?;
    state.services.orders.mark_complete(id).await?;
    Ok(success_response(json!({
        "message": "Order marked as complete"
    })))
}

/// Payment status poll target used by the storefront during external
/// checkout.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/payment-status",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Payment status", body = crate::services::orders::PaymentStatusView),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn payment_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let view = state.services.orders.payment_status(user.user_id, id).await?;
    Ok(success_response(view))
}

/// Production tracking summary for the caller's order
async fn order_tracking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let tracking = state.services.orders.tracking(user.user_id, id).await?;
    Ok(success_response(tracking))
}
