use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    entities::{
        production::{self, Entity as ProductionEntity, ProductionStage, ProductionStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Service for managing workshop production records.
#[derive(Clone)]
pub struct ProductionService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductionFilter {
    pub stage: Option<ProductionStage>,
    pub status: Option<ProductionStatus>,
    pub order_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductionInput {
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub date: Option<NaiveDate>,
    pub stage: Option<ProductionStage>,
    pub status: Option<ProductionStatus>,
    pub quantity: i32,
    pub resources_used: Option<serde_json::Value>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductionInput {
    pub stage: Option<ProductionStage>,
    pub status: Option<ProductionStatus>,
    pub quantity: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StageCount {
    pub stage: &'static str,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: &'static str,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct DailyOutput {
    pub date: NaiveDate,
    pub completed: u64,
}

#[derive(Debug, Serialize)]
pub struct ProductionAnalytics {
    pub by_stage: Vec<StageCount>,
    pub by_status: Vec<StatusCount>,
    pub quantity_in_progress: i64,
    pub daily_output: Vec<DailyOutput>,
}

impl ProductionService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    fn build_filters(filter: &ProductionFilter) -> Condition {
        let mut condition = Condition::all();

        if let Some(stage) = filter.stage {
            condition = condition.add(production::Column::Stage.eq(stage));
        }
        if let Some(status) = filter.status {
            condition = condition.add(production::Column::Status.eq(status));
        }
        if let Some(order_id) = filter.order_id {
            condition = condition.add(production::Column::OrderId.eq(order_id));
        }

        condition
    }

    /// Lists production records with optional stage/status/order filters.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: ProductionFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<production::Model>, u64), ServiceError> {
        let paginator = ProductionEntity::find()
            .filter(Self::build_filters(&filter))
            .order_by_desc(production::Column::Date)
            .paginate(&*self.db, limit.max(1));

        let total = paginator.num_items().await?;
        let records = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((records, total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<production::Model, ServiceError> {
        ProductionEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Production {} not found", id)))
    }

    /// Creates a production record manually (checkout spawns them itself).
    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        input: CreateProductionInput,
    ) -> Result<production::Model, ServiceError> {
        if input.quantity < 1 {
            return Err(ServiceError::ValidationError(
                "quantity must be at least 1".to_string(),
            ));
        }

        let created = production::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(input.order_id),
            user_id: Set(input.user_id),
            product_id: Set(input.product_id),
            product_name: Set(input.product_name),
            date: Set(input.date.unwrap_or_else(|| Utc::now().date_naive())),
            stage: Set(input.stage.unwrap_or(ProductionStage::Preparation)),
            status: Set(input.status.unwrap_or(ProductionStatus::Pending)),
            quantity: Set(input.quantity),
            resources_used: Set(input.resources_used),
            notes: Set(input.notes),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db)
        .await?;

        self.event_sender
            .send_or_log(Event::ProductionCreated(created.id))
            .await;

        info!(production_id = %created.id, "Created production record");
        Ok(created)
    }

    /// Updates stage/status/quantity/notes of a record.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateProductionInput,
    ) -> Result<production::Model, ServiceError> {
        let record = self.get(id).await?;
        let mut update: production::ActiveModel = record.into();

        if let Some(stage) = input.stage {
            update.stage = Set(stage);
        }
        if let Some(status) = input.status {
            update.status = Set(status);
        }
        if let Some(quantity) = input.quantity {
            if quantity < 1 {
                return Err(ServiceError::ValidationError(
                    "quantity must be at least 1".to_string(),
                ));
            }
            update.quantity = Set(quantity);
        }
        if let Some(notes) = input.notes {
            update.notes = Set(Some(notes));
        }
        update.updated_at = Set(Some(Utc::now()));

        let updated = update.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::ProductionUpdated {
                production_id: id,
                stage: updated.stage.as_str().to_string(),
                status: updated.status.as_str().to_string(),
            })
            .await;

        Ok(updated)
    }

    /// Aggregate view for the workshop dashboard: counts per stage and
    /// status, units currently in progress, and completed jobs per day over
    /// the last 14 days.
    #[instrument(skip(self))]
    pub async fn analytics(&self) -> Result<ProductionAnalytics, ServiceError> {
        let records = ProductionEntity::find().all(&*self.db).await?;

        let by_stage = ProductionStage::ALL
            .iter()
            .map(|stage| StageCount {
                stage: stage.as_str(),
                count: records.iter().filter(|r| r.stage == *stage).count() as u64,
            })
            .collect();

        let by_status = ProductionStatus::ALL
            .iter()
            .map(|status| StatusCount {
                status: status.as_str(),
                count: records.iter().filter(|r| r.status == *status).count() as u64,
            })
            .collect();

        let quantity_in_progress = records
            .iter()
            .filter(|r| r.status == ProductionStatus::InProgress)
            .map(|r| r.quantity as i64)
            .sum();

        let today = Utc::now().date_naive();
        let window_start = today - Duration::days(13);
        let daily_output = (0..14)
            .map(|offset| {
                let date = window_start + Duration::days(offset);
                DailyOutput {
                    date,
                    completed: records
                        .iter()
                        .filter(|r| r.status == ProductionStatus::Completed && r.date == date)
                        .count() as u64,
                }
            })
            .collect();

        Ok(ProductionAnalytics {
            by_stage,
            by_status,
            quantity_in_progress,
            daily_output,
        })
    }

    /// CSV export of production records, optionally bounded by date.
    #[instrument(skip(self))]
    pub async fn export_csv(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<String, ServiceError> {
        let mut query = ProductionEntity::find().order_by_asc(production::Column::Date);
        if let Some(from) = from {
            query = query.filter(production::Column::Date.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(production::Column::Date.lte(to));
        }

        let records = query.all(&*self.db).await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "id",
                "order_id",
                "product_name",
                "date",
                "stage",
                "status",
                "quantity",
                "notes",
            ])
            .map_err(|e| ServiceError::SerializationError(e.to_string()))?;

        for record in records {
            writer
                .write_record([
                    record.id.to_string(),
                    record.order_id.to_string(),
                    record.product_name.clone(),
                    record.date.to_string(),
                    record.stage.as_str().to_string(),
                    record.status.as_str().to_string(),
                    record.quantity.to_string(),
                    record.notes.clone().unwrap_or_default(),
                ])
                .map_err(|e| ServiceError::SerializationError(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ServiceError::SerializationError(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ServiceError::SerializationError(e.to_string()))
    }
}
