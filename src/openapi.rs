//! OpenAPI documentation for the externally-interesting endpoints: checkout,
//! payments, and the payment-status poll target.

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "woodcraft-api",
        description = "Furniture storefront and production tracking API"
    ),
    paths(
        crate::handlers::checkout::checkout,
        crate::handlers::orders::payment_status,
        crate::handlers::payments::init_payment,
        crate::handlers::payments::verify_payment,
        crate::handlers::payments::confirm_payment,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::errors::MaterialShortage,
        crate::entities::order::PaymentMethod,
        crate::entities::order::PaymentStatus,
        crate::services::orders::CheckoutInput,
        crate::services::orders::PaymentStatusView,
        crate::handlers::payments::InitPaymentRequest,
        crate::handlers::payments::VerifyPaymentRequest,
        crate::handlers::payments::ConfirmPaymentRequest,
    )),
    tags(
        (name = "Checkout", description = "Cart-to-order conversion"),
        (name = "Orders", description = "Order status and tracking"),
        (name = "Payments", description = "External payment provider flows")
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at /docs, serving the document at /api-docs/openapi.json
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
