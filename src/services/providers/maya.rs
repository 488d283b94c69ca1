//! Maya Checkout client (sandbox REST API). JSON requests authenticated with
//! the basic-auth-encoded public key.

use base64::Engine;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::errors::ServiceError;

#[derive(Clone)]
pub struct MayaClient {
    http: reqwest::Client,
    public_key: String,
    base_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub total_amount: CheckoutAmount,
    pub buyer: CheckoutBuyer,
    pub items: Vec<CheckoutItem>,
    pub request_reference_number: String,
    pub redirect_url: RedirectUrls,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutAmount {
    pub value: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBuyer {
    pub first_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub name: String,
    pub quantity: u32,
    pub total_amount: CheckoutItemAmount,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutItemAmount {
    pub value: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct RedirectUrls {
    pub success: String,
    pub failure: String,
    pub cancel: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub checkout_id: Option<String>,
    pub redirect_url: Option<String>,
}

impl MayaClient {
    pub fn new(public_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            public_key,
            base_url,
        }
    }

    fn auth_header(&self) -> String {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{}:", self.public_key));
        format!("Basic {}", encoded)
    }

    /// Creates a hosted checkout and returns the redirect URL the customer
    /// should be sent to.
    #[instrument(skip(self, request), fields(reference = %request.request_reference_number))]
    pub async fn create_checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutResponse, ServiceError> {
        let response = self
            .http
            .post(format!("{}/checkout/v1/checkouts", self.base_url))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::ExternalServiceError(format!("Maya request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "Maya checkout creation failed: {}", body);
            return Err(ServiceError::ExternalServiceError(format!(
                "Maya returned {}",
                status
            )));
        }

        let checkout: CheckoutResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::ExternalServiceError(format!("Maya response: {}", e)))?;

        info!("Created Maya checkout");
        Ok(checkout)
    }
}
