//! Bill-of-materials queries: per-product material lines and the requirement
//! math the checkout transaction deducts against.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        inventory_item::{self, Entity as InventoryItemEntity},
        product::Entity as ProductEntity,
        product_material::{self, Entity as ProductMaterialEntity},
    },
    errors::ServiceError,
};

/// One BOM line joined with its inventory item.
#[derive(Debug, Clone, Serialize)]
pub struct BomLineDetail {
    #[serde(flatten)]
    pub line: product_material::Model,
    pub material: inventory_item::Model,
}

/// Material requirement for a given production quantity. `required` keeps the
/// fractional arithmetic for reporting; `required_units` is what gets
/// deducted from on-hand stock (rounded up so fractional BOM lines never
/// under-consume).
#[derive(Debug, Clone)]
pub struct MaterialRequirement {
    pub line: product_material::Model,
    pub item: inventory_item::Model,
    pub required: Decimal,
    pub required_units: i32,
}

/// Input line for replacing a product's BOM.
#[derive(Debug, Deserialize, Validate)]
pub struct BomLineInput {
    pub inventory_item_id: Uuid,
    pub qty_per_unit: Decimal,
}

/// Computes the material requirements for `quantity` units of a product.
/// BOM lines whose inventory item no longer exists are skipped.
pub async fn requirements_for<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    quantity: i32,
) -> Result<Vec<MaterialRequirement>, ServiceError> {
    let lines = ProductMaterialEntity::find()
        .filter(product_material::Column::ProductId.eq(product_id))
        .all(conn)
        .await?;

    let mut requirements = Vec::with_capacity(lines.len());
    for line in lines {
        let Some(item) = InventoryItemEntity::find_by_id(line.inventory_item_id)
            .one(conn)
            .await?
        else {
            continue;
        };

        let required = line.qty_per_unit * Decimal::from(quantity);
        let required_units = required.ceil().to_i32().unwrap_or(i32::MAX);
        requirements.push(MaterialRequirement {
            line,
            item,
            required,
            required_units,
        });
    }

    Ok(requirements)
}

/// Service for managing product bills of materials.
#[derive(Clone)]
pub struct BomService {
    db: Arc<DatabaseConnection>,
}

impl BomService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists the BOM for a product with joined inventory items.
    #[instrument(skip(self))]
    pub async fn materials_for_product(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<BomLineDetail>, ServiceError> {
        let db = &*self.db;

        ProductEntity::find_by_id(product_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

        let lines = ProductMaterialEntity::find()
            .filter(product_material::Column::ProductId.eq(product_id))
            .find_also_related(InventoryItemEntity)
            .all(db)
            .await?;

        Ok(lines
            .into_iter()
            .filter_map(|(line, item)| item.map(|material| BomLineDetail { line, material }))
            .collect())
    }

    /// Replaces a product's BOM atomically. Every referenced inventory item
    /// must exist and quantities must be positive.
    #[instrument(skip(self, lines))]
    pub async fn replace_materials(
        &self,
        product_id: Uuid,
        lines: Vec<BomLineInput>,
    ) -> Result<Vec<BomLineDetail>, ServiceError> {
        let txn = self.db.begin().await?;

        ProductEntity::find_by_id(product_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

        for line in &lines {
            if line.qty_per_unit <= Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "qty_per_unit must be greater than zero".to_string(),
                ));
            }
            InventoryItemEntity::find_by_id(line.inventory_item_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "Inventory item {} not found",
                        line.inventory_item_id
                    ))
                })?;
        }

        ProductMaterialEntity::delete_many()
            .filter(product_material::Column::ProductId.eq(product_id))
            .exec(&txn)
            .await?;

        for line in lines {
            product_material::ActiveModel {
                id: Set(Uuid::new_v4()),
                product_id: Set(product_id),
                inventory_item_id: Set(line.inventory_item_id),
                qty_per_unit: Set(line.qty_per_unit),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        info!(product_id = %product_id, "Replaced product BOM");
        self.materials_for_product(product_id).await
    }

    /// Requirement math over the service's own connection.
    #[instrument(skip(self))]
    pub async fn requirements(
        &self,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Vec<MaterialRequirement>, ServiceError> {
        requirements_for(&*self.db, product_id, quantity).await
    }
}
