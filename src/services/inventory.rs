use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        inventory_item::{self, Entity as InventoryItemEntity},
        inventory_usage::{self, Entity as InventoryUsageEntity},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Service for managing raw-material inventory.
#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInventoryItemInput {
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub category: Option<String>,
    pub location: Option<String>,
    pub unit: Option<String>,
    pub unit_cost: Option<Decimal>,
    pub supplier: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub quantity_on_hand: i32,
    #[serde(default)]
    pub safety_stock: i32,
    #[serde(default)]
    pub reorder_point: i32,
    #[serde(default)]
    pub max_level: i32,
    #[serde(default)]
    pub lead_time_days: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateInventoryItemInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub unit: Option<String>,
    pub unit_cost: Option<Decimal>,
    pub supplier: Option<String>,
    pub description: Option<String>,
    pub safety_stock: Option<i32>,
    pub reorder_point: Option<i32>,
    pub max_level: Option<i32>,
    pub lead_time_days: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdjustStockInput {
    pub delta: i32,
    #[validate(length(min = 1, max = 255))]
    pub reason: String,
}

impl InventoryService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Lists inventory items with pagination, ordered by SKU.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<inventory_item::Model>, u64), ServiceError> {
        let paginator = InventoryItemEntity::find()
            .order_by_asc(inventory_item::Column::Sku)
            .paginate(&*self.db, limit.max(1));

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<inventory_item::Model, ServiceError> {
        InventoryItemEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Inventory item {} not found", id)))
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        input: CreateInventoryItemInput,
    ) -> Result<inventory_item::Model, ServiceError> {
        input.validate()?;

        let existing = InventoryItemEntity::find()
            .filter(inventory_item::Column::Sku.eq(input.sku.clone()))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "SKU {} already exists",
                input.sku
            )));
        }

        let created = inventory_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            sku: Set(input.sku),
            name: Set(input.name),
            category: Set(input.category),
            location: Set(input.location),
            unit: Set(input.unit),
            unit_cost: Set(input.unit_cost),
            supplier: Set(input.supplier),
            description: Set(input.description),
            quantity_on_hand: Set(input.quantity_on_hand),
            safety_stock: Set(input.safety_stock),
            reorder_point: Set(input.reorder_point),
            max_level: Set(input.max_level),
            lead_time_days: Set(input.lead_time_days),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db)
        .await?;

        info!(sku = %created.sku, "Created inventory item");
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateInventoryItemInput,
    ) -> Result<inventory_item::Model, ServiceError> {
        let item = self.get(id).await?;
        let mut update: inventory_item::ActiveModel = item.into();

        if let Some(name) = input.name {
            update.name = Set(name);
        }
        if let Some(category) = input.category {
            update.category = Set(Some(category));
        }
        if let Some(location) = input.location {
            update.location = Set(Some(location));
        }
        if let Some(unit) = input.unit {
            update.unit = Set(Some(unit));
        }
        if let Some(unit_cost) = input.unit_cost {
            update.unit_cost = Set(Some(unit_cost));
        }
        if let Some(supplier) = input.supplier {
            update.supplier = Set(Some(supplier));
        }
        if let Some(description) = input.description {
            update.description = Set(Some(description));
        }
        if let Some(safety_stock) = input.safety_stock {
            update.safety_stock = Set(safety_stock);
        }
        if let Some(reorder_point) = input.reorder_point {
            update.reorder_point = Set(reorder_point);
        }
        if let Some(max_level) = input.max_level {
            update.max_level = Set(max_level);
        }
        if let Some(lead_time_days) = input.lead_time_days {
            update.lead_time_days = Set(lead_time_days);
        }
        update.updated_at = Set(Some(Utc::now()));

        Ok(update.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let item = self.get(id).await?;
        item.delete(&*self.db).await?;
        Ok(())
    }

    /// Items at or below their reorder point.
    #[instrument(skip(self))]
    pub async fn low_stock(&self) -> Result<Vec<inventory_item::Model>, ServiceError> {
        let items = InventoryItemEntity::find()
            .filter(
                Expr::col(inventory_item::Column::QuantityOnHand)
                    .lte(Expr::col(inventory_item::Column::ReorderPoint)),
            )
            .order_by_asc(inventory_item::Column::Sku)
            .all(&*self.db)
            .await?;
        Ok(items)
    }

    /// Manual stock adjustment. Negative deltas are recorded in the usage
    /// log; the on-hand quantity can never go below zero.
    #[instrument(skip(self))]
    pub async fn adjust(
        &self,
        id: Uuid,
        input: AdjustStockInput,
    ) -> Result<inventory_item::Model, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await?;

        let item = InventoryItemEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Inventory item {} not found", id)))?;

        let old_quantity = item.quantity_on_hand;
        let new_quantity = old_quantity + input.delta;
        if new_quantity < 0 {
            return Err(ServiceError::InvalidOperation(format!(
                "Adjustment would drive SKU {} below zero",
                item.sku
            )));
        }

        let mut update: inventory_item::ActiveModel = item.into();
        update.quantity_on_hand = Set(new_quantity);
        update.updated_at = Set(Some(Utc::now()));
        let updated = update.update(&txn).await?;

        if input.delta < 0 {
            inventory_usage::ActiveModel {
                id: Set(Uuid::new_v4()),
                inventory_item_id: Set(id),
                date: Set(Utc::now().date_naive()),
                qty_used: Set(-input.delta),
                created_at: Set(Utc::now()),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::InventoryAdjusted {
                item_id: id,
                old_quantity,
                new_quantity,
                reason: input.reason,
            })
            .await;

        Ok(updated)
    }

    /// Usage log rows for an item, newest first.
    #[instrument(skip(self))]
    pub async fn usage(&self, id: Uuid) -> Result<Vec<inventory_usage::Model>, ServiceError> {
        self.get(id).await?;

        let rows = InventoryUsageEntity::find()
            .filter(inventory_usage::Column::InventoryItemId.eq(id))
            .order_by_desc(inventory_usage::Column::Date)
            .all(&*self.db)
            .await?;
        Ok(rows)
    }
}
