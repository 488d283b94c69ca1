//! Order lifecycle: the checkout transaction, listings, the payment-status
//! poll target, and production tracking with ETA math.

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entities::{
        cart_item::{self, Entity as CartItemEntity},
        inventory_usage,
        order::{self, Entity as OrderEntity, OrderStatus, PaymentMethod, PaymentStatus},
        order_item::{self, Entity as OrderItemEntity},
        product::{self, Entity as ProductEntity},
        production::{self, Entity as ProductionEntity, ProductionStage, ProductionStatus},
        user::{self, Entity as UserEntity},
    },
    errors::{MaterialShortage, ServiceError},
    events::{Event, EventSender},
    services::bom,
};

/// Assumed days each production stage takes per order, used for the coarse
/// customer-facing ETA.
const PER_STAGE_DAYS: i64 = 2;

/// Order service: checkout and everything downstream of it.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CheckoutInput {
    /// Defaults to cash-on-delivery when omitted
    pub payment_method: Option<PaymentMethod>,
    pub shipping_address: Option<String>,
    pub contact_phone: Option<String>,
    pub transaction_ref: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutOutcome {
    pub order_id: Uuid,
    pub order: order::Model,
}

/// Order line with joined product data.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemDetail {
    #[serde(flatten)]
    pub item: order_item::Model,
    pub product_name: String,
    pub product: Option<product::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: order::Model,
    pub items: Vec<OrderItemDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentStatusView {
    pub payment_status: PaymentStatus,
    pub transaction_ref: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StageSummary {
    pub stage: &'static str,
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
}

#[derive(Debug, Serialize)]
pub struct OverallProgress {
    pub total: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub progress_pct: i64,
    pub eta: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct TrackingResponse {
    pub order: OrderDetail,
    pub stage_summary: Vec<StageSummary>,
    pub productions: Vec<production::Model>,
    pub overall: OverallProgress,
}

impl OrderService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Converts the user's cart into an order.
    ///
    /// Everything runs in one transaction: stock validation, BOM sufficiency,
    /// order + line creation, finished-goods decrement, raw-material
    /// deduction with usage logging, per-line production spawning, and the
    /// cart clear. Any failure rolls the whole order back.
    #[instrument(skip(self, input))]
    pub async fn checkout(
        &self,
        user_id: Uuid,
        input: CheckoutInput,
    ) -> Result<CheckoutOutcome, ServiceError> {
        let txn = self.db.begin().await?;

        let lines = CartItemEntity::find()
            .filter(cart_item::Column::UserId.eq(user_id))
            .find_also_related(ProductEntity)
            .all(&txn)
            .await?;

        if lines.is_empty() {
            return Err(ServiceError::InvalidOperation("Cart is empty".to_string()));
        }

        // Resolve products and validate finished-goods stock.
        let mut total_price = Decimal::ZERO;
        let mut resolved: Vec<(cart_item::Model, product::Model)> = Vec::with_capacity(lines.len());
        for (line, product) in lines {
            let product = product.ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} no longer exists", line.product_id))
            })?;
            if product.stock < line.quantity {
                return Err(ServiceError::InsufficientStock(format!(
                    "Stock unavailable for {}",
                    product.name
                )));
            }
            total_price += product.price * Decimal::from(line.quantity);
            resolved.push((line, product));
        }

        // Validate raw materials across the whole cart. Requirements are
        // checked against a running remainder so two lines sharing a material
        // cannot both pass on the same stock.
        let mut remaining: HashMap<Uuid, i32> = HashMap::new();
        let mut shortages: Vec<MaterialShortage> = Vec::new();
        let mut requirements: Vec<Vec<bom::MaterialRequirement>> =
            Vec::with_capacity(resolved.len());

        for (line, product) in &resolved {
            let reqs = bom::requirements_for(&txn, product.id, line.quantity).await?;
            for req in &reqs {
                let rem = *remaining
                    .entry(req.item.id)
                    .or_insert(req.item.quantity_on_hand);
                if rem < req.required_units {
                    shortages.push(MaterialShortage {
                        product_id: product.id,
                        product_name: product.name.clone(),
                        sku: req.item.sku.clone(),
                        material_name: req.item.name.clone(),
                        on_hand: req.item.quantity_on_hand,
                        required: req.required,
                        deficit: req.required_units - rem.max(0),
                    });
                } else {
                    remaining.insert(req.item.id, rem - req.required_units);
                }
            }
            requirements.push(reqs);
        }

        if !shortages.is_empty() {
            return Err(ServiceError::InsufficientMaterials {
                message: "Insufficient raw materials for this order".to_string(),
                shortages,
            });
        }

        let payment_method = input.payment_method.unwrap_or(PaymentMethod::Cod);
        let payment_status = match payment_method {
            PaymentMethod::Cod => PaymentStatus::CodPending,
            _ => PaymentStatus::Unpaid,
        };

        let order_id = Uuid::new_v4();
        let order_number = format!("ORD-{}", order_id.to_string()[..8].to_uppercase());
        let now = Utc::now();
        let today = now.date_naive();

        let order = order::ActiveModel {
            id: Set(order_id),
            order_number: Set(order_number.clone()),
            user_id: Set(user_id),
            total_price: Set(total_price),
            status: Set(OrderStatus::Pending),
            checkout_date: Set(now),
            payment_method: Set(payment_method),
            payment_status: Set(payment_status),
            transaction_ref: Set(input.transaction_ref),
            shipping_address: Set(input.shipping_address),
            contact_phone: Set(input.contact_phone),
            created_at: Set(now),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await?;

        // Track deducted material quantities so lines sharing an item see the
        // values written by earlier lines.
        let mut on_hand: HashMap<Uuid, i32> = HashMap::new();

        for ((line, product), reqs) in resolved.iter().zip(requirements.iter()) {
            order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                product_id: Set(product.id),
                quantity: Set(line.quantity),
                price: Set(product.price),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;

            // Reduce finished product stock.
            let mut product_update: product::ActiveModel = product.clone().into();
            product_update.stock = Set(product.stock - line.quantity);
            product_update.updated_at = Set(Some(now));
            product_update.update(&txn).await?;

            // Deduct raw materials per BOM and record usage.
            let mut resources = Vec::with_capacity(reqs.len());
            for req in reqs {
                let current = *on_hand
                    .entry(req.item.id)
                    .or_insert(req.item.quantity_on_hand);
                let new_quantity = current - req.required_units;
                if new_quantity < 0 {
                    // Unreachable after the shortage pass; kept as the abort
                    // guard that forces a rollback.
                    return Err(ServiceError::InsufficientStock(format!(
                        "Insufficient stock for SKU {}",
                        req.item.sku
                    )));
                }

                let mut item_update: crate::entities::inventory_item::ActiveModel =
                    req.item.clone().into();
                item_update.quantity_on_hand = Set(new_quantity);
                item_update.updated_at = Set(Some(now));
                item_update.update(&txn).await?;
                on_hand.insert(req.item.id, new_quantity);

                inventory_usage::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    inventory_item_id: Set(req.item.id),
                    date: Set(today),
                    qty_used: Set(req.required_units),
                    created_at: Set(now),
                }
                .insert(&txn)
                .await?;

                resources.push(serde_json::json!({
                    "inventory_item_id": req.item.id,
                    "qty": req.required,
                }));
            }

            // Spawn the production job for this line.
            production::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                user_id: Set(user_id),
                product_id: Set(product.id),
                product_name: Set(product.name.clone()),
                date: Set(today),
                stage: Set(ProductionStage::Preparation),
                status: Set(ProductionStatus::Pending),
                quantity: Set(line.quantity),
                resources_used: Set(Some(serde_json::Value::Array(resources))),
                notes: Set(Some(format!("Generated from Order #{}", order_number))),
                created_at: Set(now),
                updated_at: Set(None),
            }
            .insert(&txn)
            .await?;
        }

        CartItemEntity::delete_many()
            .filter(cart_item::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::OrderCreated(order_id))
            .await;
        self.event_sender
            .send_or_log(Event::CheckoutCompleted { order_id, user_id })
            .await;

        info!(
            "Checkout completed: order {} ({}) for user {}",
            order_id, order.order_number, user_id
        );

        Ok(CheckoutOutcome {
            order_id,
            order,
        })
    }

    /// All orders with customer and line details, newest first. Staff view.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<OrderDetail>, ServiceError> {
        let orders = OrderEntity::find()
            .order_by_desc(order::Column::CheckoutDate)
            .all(&*self.db)
            .await?;

        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            details.push(self.build_detail(order, true).await?);
        }
        Ok(details)
    }

    /// The caller's orders with line details, newest first.
    #[instrument(skip(self))]
    pub async fn my_orders(&self, user_id: Uuid) -> Result<Vec<OrderDetail>, ServiceError> {
        let orders = OrderEntity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::CheckoutDate)
            .all(&*self.db)
            .await?;

        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            details.push(self.build_detail(order, false).await?);
        }
        Ok(details)
    }

    /// Single order with customer and lines. Staff view.
    #[instrument(skip(self))]
    pub async fn get(&self, order_id: Uuid) -> Result<OrderDetail, ServiceError> {
        let order = OrderEntity::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;

        self.build_detail(order, true).await
    }

    /// Fetches an order scoped to its owner.
    pub async fn get_for_user(
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

    /// Payment status + stored reference, polled by the storefront while the
    /// customer completes an external checkout.
    #[instrument(skip(self))]
    pub async fn payment_status(
        &self,
        user_id: Uuid,
        order_id: Uuid,
    ) -> Result<PaymentStatusView, ServiceError> {
        let order = self.get_for_user(user_id, order_id).await?;
        Ok(PaymentStatusView {
            payment_status: order.payment_status,
            transaction_ref: order.transaction_ref,
        })
    }

    /// Marks an order completed. Staff action.
    #[instrument(skip(self))]
    pub async fn mark_complete(&self, order_id: Uuid) -> Result<order::Model, ServiceError> {
        let order = OrderEntity::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;

        let mut update: order::ActiveModel = order.into();
        update.status = Set(OrderStatus::Completed);
        update.updated_at = Set(Some(Utc::now()));
        let updated = update.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::OrderCompleted(order_id))
            .await;

        Ok(updated)
    }

    /// Production tracking for an order: per-stage counts, the raw production
    /// rows, and a coarse ETA assuming [`PER_STAGE_DAYS`] days per stage.
    #[instrument(skip(self))]
    pub async fn tracking(
        &self,
        user_id: Uuid,
        order_id: Uuid,
    ) -> Result<TrackingResponse, ServiceError> {
        let order = self.get_for_user(user_id, order_id).await?;
        let detail = self.build_detail(order, false).await?;

        let productions = ProductionEntity::find()
            .filter(production::Column::OrderId.eq(order_id))
            .all(&*self.db)
            .await?;

        let stage_summary = ProductionStage::ALL
            .iter()
            .map(|stage| {
                let of_stage = productions.iter().filter(|p| p.stage == *stage);
                let mut summary = StageSummary {
                    stage: stage.as_str(),
                    pending: 0,
                    in_progress: 0,
                    completed: 0,
                };
                for p in of_stage {
                    match p.status {
                        ProductionStatus::Pending => summary.pending += 1,
                        ProductionStatus::InProgress => summary.in_progress += 1,
                        ProductionStatus::Completed => summary.completed += 1,
                        ProductionStatus::Hold => {}
                    }
                }
                summary
            })
            .collect();

        let total = productions.len() as u64;
        let completed = productions
            .iter()
            .filter(|p| p.status == ProductionStatus::Completed)
            .count() as u64;
        let in_progress = productions
            .iter()
            .filter(|p| p.status == ProductionStatus::InProgress)
            .count() as u64;
        let pending = productions
            .iter()
            .filter(|p| p.status == ProductionStatus::Pending)
            .count() as u64;

        let total_jobs = total.max(1);
        let progress_ratio = (completed as f64 + 0.5 * in_progress as f64) / total_jobs as f64;
        let progress_pct = (progress_ratio * 100.0).round() as i64;

        let estimated_total_days = ProductionStage::ALL.len() as i64 * PER_STAGE_DAYS;
        let remaining_days = ((estimated_total_days as f64) * (1.0 - progress_ratio))
            .round()
            .max(0.0) as i64;
        let eta = Utc::now().date_naive() + Duration::days(remaining_days);

        Ok(TrackingResponse {
            order: detail,
            stage_summary,
            productions,
            overall: OverallProgress {
                total,
                pending,
                in_progress,
                completed,
                progress_pct,
                eta,
            },
        })
    }

    async fn build_detail(
        &self,
        order: order::Model,
        with_customer: bool,
    ) -> Result<OrderDetail, ServiceError> {
        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(order.id))
            .find_also_related(ProductEntity)
            .all(&*self.db)
            .await?;

        let items = items
            .into_iter()
            .map(|(item, product)| {
                let product_name = product
                    .as_ref()
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| "Unknown Product".to_string());
                OrderItemDetail {
                    item,
                    product_name,
                    product,
                }
            })
            .collect();

        let customer = if with_customer {
            UserEntity::find_by_id(order.user_id)
                .one(&*self.db)
                .await?
                .map(|u: user::Model| CustomerSummary {
                    id: u.id,
                    name: u.name,
                    email: u.email,
                })
        } else {
            None
        };

        Ok(OrderDetail {
            order,
            items,
            customer,
        })
    }
}
