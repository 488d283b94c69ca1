//! Payment flows: provider checkout initiation, manual verification against
//! the stored transaction reference, and optimistic confirmation on return
//! from the provider. Webhook capture is intentionally absent; the
//! storefront polls the order's payment status instead.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    config::AppConfig,
    entities::order::{self, Entity as OrderEntity, PaymentMethod, PaymentStatus},
    errors::ServiceError,
    events::{Event, EventSender},
    services::providers::{maya, stripe, MayaClient, StripeClient},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentProvider {
    Gcash,
    Maya,
}

impl PaymentProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentProvider::Gcash => "gcash",
            PaymentProvider::Maya => "maya",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyStatus {
    Paid,
    Failed,
}

#[derive(Debug, Deserialize)]
pub struct InitPaymentInput {
    pub order_id: Uuid,
    pub provider: PaymentProvider,
}

#[derive(Debug, Serialize)]
pub struct InitPaymentOutcome {
    pub checkout_url: Option<String>,
    pub transaction_ref: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentInput {
    pub order_id: Uuid,
    pub transaction_ref: String,
    pub status: VerifyStatus,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmPaymentInput {
    pub order_id: Uuid,
    pub provider: PaymentProvider,
}

#[derive(Debug, Serialize)]
pub struct ConfirmPaymentOutcome {
    pub message: String,
    pub order: order::Model,
}

/// Payment service wrapping the provider clients.
#[derive(Clone)]
pub struct PaymentService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
    stripe: Option<StripeClient>,
    maya: Option<MayaClient>,
    app_url: String,
    frontend_url: String,
    currency: String,
}

impl PaymentService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: Arc<EventSender>,
        config: &AppConfig,
    ) -> Self {
        let stripe = config
            .stripe_secret_key
            .clone()
            .map(|key| StripeClient::new(key, config.stripe_api_base.clone()));
        let maya = config
            .maya_public_key
            .clone()
            .map(|key| MayaClient::new(key, config.maya_api_base.clone()));

        Self {
            db,
            event_sender,
            stripe,
            maya,
            app_url: config.app_url.clone(),
            frontend_url: config.frontend_url.clone(),
            currency: config.payment_currency.clone(),
        }
    }

    async fn order_for_user(
        &self,
        user_id: Uuid,
        order_id: Uuid,
    ) -> Result<order::Model, ServiceError> {
        OrderEntity::find_by_id(order_id)
            .filter(order::Column::UserId.eq(user_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))
    }

    /// Starts an external checkout for an order and stores the provider
    /// reference on it.
    #[instrument(skip(self, user), fields(user_id = %user.user_id))]
    pub async fn init_payment(
        &self,
        user: &AuthUser,
        input: InitPaymentInput,
    ) -> Result<InitPaymentOutcome, ServiceError> {
        let order = self.order_for_user(user.user_id, input.order_id).await?;

        let outcome = match input.provider {
            PaymentProvider::Gcash => self.init_gcash(&order).await?,
            PaymentProvider::Maya => self.init_maya(user, &order).await?,
        };

        self.event_sender
            .send_or_log(Event::PaymentInitiated {
                order_id: order.id,
                provider: input.provider.as_str().to_string(),
            })
            .await;

        Ok(outcome)
    }

    async fn init_gcash(&self, order: &order::Model) -> Result<InitPaymentOutcome, ServiceError> {
        let stripe = self.stripe.as_ref().ok_or_else(|| {
            ServiceError::ServiceUnavailable("Stripe is not configured".to_string())
        })?;

        let session = stripe
            .create_checkout_session(stripe::CheckoutSessionRequest {
                amount: order.total_price.round(),
                currency: self.currency.clone(),
                name: format!("Order #{}", order.order_number),
                success_url: format!(
                    "{}/payment/success?session_id={{CHECKOUT_SESSION_ID}}",
                    self.app_url
                ),
                cancel_url: format!("{}/payment/failed", self.app_url),
                order_id: order.id,
            })
            .await?;

        let transaction_ref = Some(session.id.clone());
        self.store_payment_ref(order, PaymentMethod::Gcash, transaction_ref.clone())
            .await?;

        Ok(InitPaymentOutcome {
            checkout_url: session.url,
            transaction_ref,
        })
    }

    async fn init_maya(
        &self,
        user: &AuthUser,
        order: &order::Model,
    ) -> Result<InitPaymentOutcome, ServiceError> {
        let maya = self
            .maya
            .as_ref()
            .ok_or_else(|| ServiceError::ServiceUnavailable("Maya is not configured".to_string()))?;

        let reference = format!("{}-{}", order.order_number, Utc::now().timestamp());
        let amount = order.total_price.round();

        let return_url = |outcome: &str| {
            format!(
                "{}/cart?payment={}&provider=maya&order_id={}",
                self.frontend_url, outcome, order.id
            )
        };

        let checkout = maya
            .create_checkout(maya::CheckoutRequest {
                total_amount: maya::CheckoutAmount {
                    value: amount,
                    currency: self.currency.clone(),
                },
                buyer: maya::CheckoutBuyer {
                    first_name: user.name.clone().unwrap_or_else(|| "Customer".to_string()),
                    email: user
                        .email
                        .clone()
                        .unwrap_or_else(|| "customer@example.com".to_string()),
                },
                items: vec![maya::CheckoutItem {
                    name: format!("Order #{}", order.order_number),
                    quantity: 1,
                    total_amount: maya::CheckoutItemAmount { value: amount },
                }],
                request_reference_number: reference.clone(),
                redirect_url: maya::RedirectUrls {
                    success: return_url("success"),
                    failure: return_url("failed"),
                    cancel: return_url("cancel"),
                },
            })
            .await?;

        self.store_payment_ref(order, PaymentMethod::Maya, Some(reference.clone()))
            .await?;

        Ok(InitPaymentOutcome {
            checkout_url: checkout.redirect_url,
            transaction_ref: Some(reference),
        })
    }

    async fn store_payment_ref(
        &self,
        order: &order::Model,
        method: PaymentMethod,
        transaction_ref: Option<String>,
    ) -> Result<(), ServiceError> {
        let mut update: order::ActiveModel = order.clone().into();
        update.payment_method = Set(method);
        update.payment_status = Set(PaymentStatus::Unpaid);
        update.transaction_ref = Set(transaction_ref);
        update.updated_at = Set(Some(Utc::now()));
        update.update(&*self.db).await?;
        Ok(())
    }

    /// Manual reconciliation: the reported status is applied only when the
    /// caller's reference matches the one stored at initiation.
    #[instrument(skip(self))]
    pub async fn verify_payment(
        &self,
        user_id: Uuid,
        input: VerifyPaymentInput,
    ) -> Result<order::Model, ServiceError> {
        let order = self.order_for_user(user_id, input.order_id).await?;

        if order.transaction_ref.as_deref() != Some(input.transaction_ref.as_str()) {
            return Err(ServiceError::InvalidOperation(
                "Invalid transaction".to_string(),
            ));
        }

        let new_status = match input.status {
            VerifyStatus::Paid => PaymentStatus::Paid,
            VerifyStatus::Failed => PaymentStatus::Failed,
        };

        let order_id = order.id;
        let mut update: order::ActiveModel = order.into();
        update.payment_status = Set(new_status);
        update.updated_at = Set(Some(Utc::now()));
        let updated = update.update(&*self.db).await?;

        let event = match new_status {
            PaymentStatus::Paid => Event::PaymentConfirmed(order_id),
            _ => Event::PaymentFailed(order_id),
        };
        self.event_sender.send_or_log(event).await;

        info!(order_id = %order_id, status = ?new_status, "Payment status updated");
        Ok(updated)
    }

    /// Optimistic confirmation on return from the provider redirect.
    /// Idempotent: an already-paid order is returned unchanged.
    #[instrument(skip(self))]
    pub async fn confirm_payment(
        &self,
        user_id: Uuid,
        input: ConfirmPaymentInput,
    ) -> Result<ConfirmPaymentOutcome, ServiceError> {
        let order = self.order_for_user(user_id, input.order_id).await?;

        if order.payment_status == PaymentStatus::Paid {
            return Ok(ConfirmPaymentOutcome {
                message: "Already paid".to_string(),
                order,
            });
        }

        let order_id = order.id;
        let mut update: order::ActiveModel = order.into();
        update.payment_status = Set(PaymentStatus::Paid);
        update.updated_at = Set(Some(Utc::now()));
        let updated = update.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::PaymentConfirmed(order_id))
            .await;

        Ok(ConfirmPaymentOutcome {
            message: "Payment confirmed".to_string(),
            order: updated,
        })
    }
}
