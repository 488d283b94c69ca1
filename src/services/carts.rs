use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        cart_item::{self, Entity as CartItemEntity},
        product::{self, Entity as ProductEntity},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Shopping cart service. Carts are per-user bags of product lines; a
/// (user, product) pair holds at most one line and adds merge into it.
#[derive(Clone)]
pub struct CartService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

/// Cart line with joined product data, as returned to the storefront.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub item: cart_item::Model,
    pub product: product::Model,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddToCartInput {
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

impl CartService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Lists the user's cart with product details, newest line first.
    /// Lines whose product was deleted are omitted.
    #[instrument(skip(self))]
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<CartLine>, ServiceError> {
        let lines = CartItemEntity::find()
            .filter(cart_item::Column::UserId.eq(user_id))
            .order_by_desc(cart_item::Column::CreatedAt)
            .find_also_related(ProductEntity)
            .all(&*self.db)
            .await?;

        Ok(lines
            .into_iter()
            .filter_map(|(item, product)| product.map(|product| CartLine { item, product }))
            .collect())
    }

    /// Adds a product to the cart, merging into an existing line. The merged
    /// quantity is capped by the product's available stock.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        user_id: Uuid,
        input: AddToCartInput,
    ) -> Result<cart_item::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let product = ProductEntity::find_by_id(input.product_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", input.product_id))
            })?;

        let existing = CartItemEntity::find()
            .filter(cart_item::Column::UserId.eq(user_id))
            .filter(cart_item::Column::ProductId.eq(input.product_id))
            .one(&txn)
            .await?;

        let new_quantity = existing.as_ref().map_or(0, |i| i.quantity) + input.quantity;
        if product.stock < new_quantity {
            return Err(ServiceError::InsufficientStock(format!(
                "Stock unavailable for {}",
                product.name
            )));
        }

        let saved = if let Some(item) = existing {
            let mut item: cart_item::ActiveModel = item.into();
            item.quantity = Set(new_quantity);
            item.updated_at = Set(Some(Utc::now()));
            item.update(&txn).await?
        } else {
            cart_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                product_id: Set(input.product_id),
                quantity: Set(input.quantity),
                created_at: Set(Utc::now()),
                updated_at: Set(None),
            }
            .insert(&txn)
            .await?
        };

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::CartItemAdded {
                user_id,
                product_id: input.product_id,
            })
            .await;

        info!(
            "Added to cart for user {}: product {} x{}",
            user_id, input.product_id, input.quantity
        );
        Ok(saved)
    }

    /// Sets the quantity of a cart line owned by the user.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<cart_item::Model, ServiceError> {
        if quantity < 1 {
            return Err(ServiceError::ValidationError(
                "quantity must be at least 1".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let item = CartItemEntity::find_by_id(item_id)
            .one(&txn)
            .await?
            .filter(|item| item.user_id == user_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Cart item {} not found", item_id)))?;

        let product = ProductEntity::find_by_id(item.product_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", item.product_id))
            })?;

        if product.stock < quantity {
            return Err(ServiceError::InsufficientStock(format!(
                "Stock unavailable for {}",
                product.name
            )));
        }

        let mut item: cart_item::ActiveModel = item.into();
        item.quantity = Set(quantity);
        item.updated_at = Set(Some(Utc::now()));
        let updated = item.update(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::CartItemUpdated { user_id, item_id })
            .await;

        Ok(updated)
    }

    /// Removes a cart line owned by the user.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, user_id: Uuid, item_id: Uuid) -> Result<(), ServiceError> {
        let item = CartItemEntity::find_by_id(item_id)
            .one(&*self.db)
            .await?
            .filter(|item| item.user_id == user_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Cart item {} not found", item_id)))?;

        item.delete(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::CartItemRemoved { user_id, item_id })
            .await;

        Ok(())
    }
}
