use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-order-line production job. One record is spawned for every order item
/// at checkout, seeded at the Preparation stage.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "productions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub date: NaiveDate,
    pub stage: ProductionStage,
    pub status: ProductionStatus,
    pub quantity: i32,
    #[sea_orm(column_type = "Json", nullable)]
    pub resources_used: Option<Json>,
    #[sea_orm(nullable)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Workshop stages in process order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ProductionStage {
    #[sea_orm(string_value = "Design")]
    Design,
    #[sea_orm(string_value = "Preparation")]
    Preparation,
    #[sea_orm(string_value = "Cutting")]
    Cutting,
    #[sea_orm(string_value = "Assembly")]
    Assembly,
    #[sea_orm(string_value = "Finishing")]
    Finishing,
    #[sea_orm(string_value = "Quality Control")]
    #[serde(rename = "Quality Control")]
    QualityControl,
}

impl ProductionStage {
    /// All stages in process order, used by tracking summaries and ETA math.
    pub const ALL: [ProductionStage; 6] = [
        ProductionStage::Design,
        ProductionStage::Preparation,
        ProductionStage::Cutting,
        ProductionStage::Assembly,
        ProductionStage::Finishing,
        ProductionStage::QualityControl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductionStage::Design => "Design",
            ProductionStage::Preparation => "Preparation",
            ProductionStage::Cutting => "Cutting",
            ProductionStage::Assembly => "Assembly",
            ProductionStage::Finishing => "Finishing",
            ProductionStage::QualityControl => "Quality Control",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ProductionStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,
    #[sea_orm(string_value = "Completed")]
    Completed,
    #[sea_orm(string_value = "Hold")]
    Hold,
}

impl ProductionStatus {
    pub const ALL: [ProductionStatus; 4] = [
        ProductionStatus::Pending,
        ProductionStatus::InProgress,
        ProductionStatus::Completed,
        ProductionStatus::Hold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductionStatus::Pending => "Pending",
            ProductionStatus::InProgress => "In Progress",
            ProductionStatus::Completed => "Completed",
            ProductionStatus::Hold => "Hold",
        }
    }
}
