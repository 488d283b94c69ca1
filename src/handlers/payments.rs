use crate::{
    auth::AuthUser,
    errors::ServiceError,
    services::payments::{
        ConfirmPaymentInput, InitPaymentInput, PaymentProvider, VerifyPaymentInput, VerifyStatus,
    },
    AppState,
};
use axum::{
    extract::{Json, State},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Payment routes
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/init", post(init_payment))
        .route("/verify", post(verify_payment))
        .route("/confirm", post(confirm_payment))
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InitPaymentRequest {
    /// Order to start an external checkout for
    pub order_id: Uuid,
    /// Payment provider ("gcash" or "maya")
    #[schema(example = "gcash")]
    pub provider: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyPaymentRequest {
    pub order_id: Uuid,
    /// Reference returned by /payments/init
    pub transaction_ref: String,
    /// Outcome reported by the storefront ("paid" or "failed")
    #[schema(example = "paid")]
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConfirmPaymentRequest {
    pub order_id: Uuid,
    /// Payment provider ("gcash" or "maya")
    #[schema(example = "maya")]
    pub provider: String,
}

fn parse_provider(value: &str) -> Result<PaymentProvider, ServiceError> {
    match value.to_ascii_lowercase().as_str() {
        "gcash" => Ok(PaymentProvider::Gcash),
        "maya" => Ok(PaymentProvider::Maya),
        other => Err(ServiceError::ValidationError(format!(
            "Unsupported provider: {}",
            other
        ))),
    }
}

fn parse_status(value: &str) -> Result<VerifyStatus, ServiceError> {
    match value.to_ascii_lowercase().as_str() {
        "paid" => Ok(VerifyStatus::Paid),
        "failed" => Ok(VerifyStatus::Failed),
        other => Err(ServiceError::ValidationError(format!(
            "Invalid payment status: {}",
            other
        ))),
    }
}

/// Start an external checkout for an order
#[utoipa::path(
    post,
    path = "/api/v1/payments/init",
    request_body = InitPaymentRequest,
    responses(
        (status = 200, description = "Checkout created; redirect the customer to checkout_url"),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 502, description = "Provider error", body = crate::errors::ErrorResponse),
        (status = 503, description = "Provider not configured", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn init_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<InitPaymentRequest>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let provider = parse_provider(&request.provider)?;

    let outcome = state
        .services
        .payments
        .init_payment(
            &user,
            InitPaymentInput {
                order_id: request.order_id,
                provider,
            },
        )
        .await?;

    Ok(Json(outcome))
}

/// Apply a storefront-reported payment outcome after matching the stored
/// transaction reference
#[utoipa::path(
    post,
    path = "/api/v1/payments/verify",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Payment status updated"),
        (status = 400, description = "Reference mismatch", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn verify_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let status = parse_status(&request.status)?;

    let order = state
        .services
        .payments
        .verify_payment(
            user.user_id,
            VerifyPaymentInput {
                order_id: request.order_id,
                transaction_ref: request.transaction_ref,
                status,
            },
        )
        .await?;

    Ok(Json(serde_json::json!({
        "message": "Payment status updated",
        "order": order,
    })))
}

/// Optimistically confirm a payment on return from the provider redirect
#[utoipa::path(
    post,
    path = "/api/v1/payments/confirm",
    request_body = ConfirmPaymentRequest,
    responses(
        (status = 200, description = "Payment confirmed (idempotent)"),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn confirm_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<ConfirmPaymentRequest>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let provider = parse_provider(&request.provider)?;

    let outcome = state
        .services
        .payments
        .confirm_payment(
            user.user_id,
            ConfirmPaymentInput {
                order_id: request.order_id,
                provider,
            },
        )
        .await?;

    Ok(Json(outcome))
}
