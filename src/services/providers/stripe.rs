//! Stripe Checkout Session client, used for GCash payments routed through
//! Stripe. Form-encoded requests against the Checkout Sessions endpoint.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;

#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    base_url: String,
}

#[derive(Debug, Clone)]
pub struct CheckoutSessionRequest {
    /// Amount in major currency units (pesos); converted to the minor unit
    /// Stripe expects.
    pub amount: Decimal,
    pub currency: String,
    pub name: String,
    pub success_url: String,
    pub cancel_url: String,
    pub order_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

impl StripeClient {
    pub fn new(secret_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            base_url,
        }
    }

    /// Creates a Checkout Session with a single line item for the order.
    #[instrument(skip(self, request), fields(order_id = %request.order_id))]
    pub async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> Result<CheckoutSession, ServiceError> {
        let unit_amount = (request.amount * Decimal::from(100))
            .round()
            .to_i64()
            .ok_or_else(|| {
                ServiceError::InvalidInput(format!("Amount {} out of range", request.amount))
            })?;

        let currency = request.currency.to_lowercase();
        let params = [
            ("mode", "payment".to_string()),
            ("line_items[0][price_data][currency]", currency),
            (
                "line_items[0][price_data][product_data][name]",
                request.name.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]",
                unit_amount.to_string(),
            ),
            ("line_items[0][quantity]", "1".to_string()),
            ("success_url", request.success_url.clone()),
            ("cancel_url", request.cancel_url.clone()),
            ("metadata[order_id]", request.order_id.to_string()),
        ];

        let response = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| ServiceError::ExternalServiceError(format!("Stripe request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "Stripe checkout session creation failed: {}", body);
            return Err(ServiceError::ExternalServiceError(format!(
                "Stripe returned {}",
                status
            )));
        }

        let session: CheckoutSession = response
            .json()
            .await
            .map_err(|e| ServiceError::ExternalServiceError(format!("Stripe response: {}", e)))?;

        info!(session_id = %session.id, "Created Stripe checkout session");
        Ok(session)
    }
}
