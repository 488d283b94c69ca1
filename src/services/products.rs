use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait, QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::product::{self, Entity as ProductEntity},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Finished-goods catalog service.
#[derive(Clone)]
pub struct ProductCatalogService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
}

impl ProductCatalogService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Lists products with pagination, ordered by name.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<product::Model>, u64), ServiceError> {
        let paginator = ProductEntity::find()
            .order_by_asc(product::Column::Name)
            .paginate(&*self.db, limit.max(1));

        let total = paginator.num_items().await?;
        let products = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((products, total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<product::Model, ServiceError> {
        ProductEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateProductInput) -> Result<product::Model, ServiceError> {
        input.validate()?;

        if input.price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "price cannot be negative".to_string(),
            ));
        }
        if input.stock < 0 {
            return Err(ServiceError::ValidationError(
                "stock cannot be negative".to_string(),
            ));
        }

        let created = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            stock: Set(input.stock),
            image_url: Set(input.image_url),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db)
        .await?;

        self.event_sender
            .send_or_log(Event::ProductCreated(created.id))
            .await;

        info!(product_id = %created.id, "Created product");
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateProductInput,
    ) -> Result<product::Model, ServiceError> {
        let existing = self.get(id).await?;
        let mut update: product::ActiveModel = existing.into();

        if let Some(name) = input.name {
            update.name = Set(name);
        }
        if let Some(description) = input.description {
            update.description = Set(Some(description));
        }
        if let Some(price) = input.price {
            if price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "price cannot be negative".to_string(),
                ));
            }
            update.price = Set(price);
        }
        if let Some(stock) = input.stock {
            if stock < 0 {
                return Err(ServiceError::ValidationError(
                    "stock cannot be negative".to_string(),
                ));
            }
            update.stock = Set(stock);
        }
        if let Some(image_url) = input.image_url {
            update.image_url = Set(Some(image_url));
        }
        update.updated_at = Set(Some(Utc::now()));

        let updated = update.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::ProductUpdated(id))
            .await;

        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;
        existing.delete(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::ProductDeleted(id))
            .await;

        Ok(())
    }
}
