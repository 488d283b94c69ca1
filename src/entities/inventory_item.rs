use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw-material inventory row tracked by SKU.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub sku: String,
    pub name: String,
    #[sea_orm(nullable)]
    pub category: Option<String>,
    #[sea_orm(nullable)]
    pub location: Option<String>,
    #[sea_orm(nullable)]
    pub unit: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub unit_cost: Option<Decimal>,
    #[sea_orm(nullable)]
    pub supplier: Option<String>,
    #[sea_orm(nullable)]
    pub description: Option<String>,
    pub quantity_on_hand: i32,
    pub safety_stock: i32,
    pub reorder_point: i32,
    pub max_level: i32,
    pub lead_time_days: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_material::Entity")]
    BomLines,
    #[sea_orm(has_many = "super::inventory_usage::Entity")]
    Usage,
}

impl Related<super::product_material::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BomLines.def()
    }
}

impl Related<super::inventory_usage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Usage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
