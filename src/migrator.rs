//! Embedded schema migrations.
// sea-orm's MigrationTrait requires late-bound elided lifetimes on `&SchemaManager`,
// which conflicts with the crate-wide `deny(rust_2018_idioms)`; allow it locally.
#![allow(elided_lifetimes_in_paths)]

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_users_table::Migration),
            Box::new(m20240601_000002_create_products_table::Migration),
            Box::new(m20240601_000003_create_inventory_items_table::Migration),
            Box::new(m20240601_000004_create_product_materials_table::Migration),
            Box::new(m20240601_000005_create_inventory_usage_table::Migration),
            Box::new(m20240601_000006_create_cart_items_table::Migration),
            Box::new(m20240601_000007_create_orders_table::Migration),
            Box::new(m20240601_000008_create_order_items_table::Migration),
            Box::new(m20240601_000009_create_productions_table::Migration),
            Box::new(m20240601_000010_add_indexes::Migration),
        ]
    }
}

mod m20240601_000001_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(
                            ColumnDef::new(Users::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(
                            ColumnDef::new(Users::Role)
                                .string_len(20)
                                .not_null()
                                .default("customer"),
                        )
                        .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Users::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Users {
        Table,
        Id,
        Name,
        Email,
        PasswordHash,
        Role,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240601_000002_create_products_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000002_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Products::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::Description).text().null())
                        .col(
                            ColumnDef::new(Products::Price)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::Stock)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Products::ImageUrl).string().null())
                        .col(ColumnDef::new(Products::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Products::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Products {
        Table,
        Id,
        Name,
        Description,
        Price,
        Stock,
        ImageUrl,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240601_000003_create_inventory_items_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000003_create_inventory_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::Sku)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(InventoryItems::Name).string().not_null())
                        .col(ColumnDef::new(InventoryItems::Category).string().null())
                        .col(ColumnDef::new(InventoryItems::Location).string().null())
                        .col(ColumnDef::new(InventoryItems::Unit).string().null())
                        .col(
                            ColumnDef::new(InventoryItems::UnitCost)
                                .decimal_len(19, 4)
                                .null(),
                        )
                        .col(ColumnDef::new(InventoryItems::Supplier).string().null())
                        .col(ColumnDef::new(InventoryItems::Description).text().null())
                        .col(
                            ColumnDef::new(InventoryItems::QuantityOnHand)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::SafetyStock)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::ReorderPoint)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::MaxLevel)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::LeadTimeDays)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryItems::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum InventoryItems {
        Table,
        Id,
        Sku,
        Name,
        Category,
        Location,
        Unit,
        UnitCost,
        Supplier,
        Description,
        QuantityOnHand,
        SafetyStock,
        ReorderPoint,
        MaxLevel,
        LeadTimeDays,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240601_000004_create_product_materials_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000004_create_product_materials_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductMaterials::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductMaterials::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductMaterials::ProductId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductMaterials::InventoryItemId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductMaterials::QtyPerUnit)
                                .decimal_len(12, 4)
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-product_materials-product_id")
                                .from(ProductMaterials::Table, ProductMaterials::ProductId)
                                .to(
                                    super::m20240601_000002_create_products_table::Products::Table,
                                    super::m20240601_000002_create_products_table::Products::Id,
                                ),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-product_materials-inventory_item_id")
                                .from(ProductMaterials::Table, ProductMaterials::InventoryItemId)
                                .to(
                                    super::m20240601_000003_create_inventory_items_table::InventoryItems::Table,
                                    super::m20240601_000003_create_inventory_items_table::InventoryItems::Id,
                                ),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductMaterials::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum ProductMaterials {
        Table,
        Id,
        ProductId,
        InventoryItemId,
        QtyPerUnit,
    }
}

mod m20240601_000005_create_inventory_usage_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000005_create_inventory_usage_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryUsage::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryUsage::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryUsage::InventoryItemId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryUsage::Date).date().not_null())
                        .col(ColumnDef::new(InventoryUsage::QtyUsed).integer().not_null())
                        .col(
                            ColumnDef::new(InventoryUsage::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-inventory_usage-inventory_item_id")
                                .from(InventoryUsage::Table, InventoryUsage::InventoryItemId)
                                .to(
                                    super::m20240601_000003_create_inventory_items_table::InventoryItems::Table,
                                    super::m20240601_000003_create_inventory_items_table::InventoryItems::Id,
                                ),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryUsage::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum InventoryUsage {
        Table,
        Id,
        InventoryItemId,
        Date,
        QtyUsed,
        CreatedAt,
    }
}

mod m20240601_000006_create_cart_items_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000006_create_cart_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(CartItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CartItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CartItems::UserId).uuid().not_null())
                        .col(ColumnDef::new(CartItems::ProductId).uuid().not_null())
                        .col(ColumnDef::new(CartItems::Quantity).integer().not_null())
                        .col(ColumnDef::new(CartItems::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(CartItems::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-cart_items-user_id")
                                .from(CartItems::Table, CartItems::UserId)
                                .to(
                                    super::m20240601_000001_create_users_table::Users::Table,
                                    super::m20240601_000001_create_users_table::Users::Id,
                                ),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-cart_items-product_id")
                                .from(CartItems::Table, CartItems::ProductId)
                                .to(
                                    super::m20240601_000002_create_products_table::Products::Table,
                                    super::m20240601_000002_create_products_table::Products::Id,
                                ),
                        )
                        .to_owned(),
                )
                .await?;

            // One cart line per (user, product); adds merge into the line.
            manager
                .create_index(
                    Index::create()
                        .name("idx-cart_items-user-product")
                        .table(CartItems::Table)
                        .col(CartItems::UserId)
                        .col(CartItems::ProductId)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CartItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum CartItems {
        Table,
        Id,
        UserId,
        ProductId,
        Quantity,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240601_000007_create_orders_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000007_create_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Orders::OrderNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Orders::UserId).uuid().not_null())
                        .col(
                            ColumnDef::new(Orders::TotalPrice)
                                .decimal_len(19, 4)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Orders::Status)
                                .string_len(20)
                                .not_null()
                                .default("pending"),
                        )
                        .col(ColumnDef::new(Orders::CheckoutDate).timestamp().not_null())
                        .col(
                            ColumnDef::new(Orders::PaymentMethod)
                                .string_len(20)
                                .not_null()
                                .default("cod"),
                        )
                        .col(
                            ColumnDef::new(Orders::PaymentStatus)
                                .string_len(20)
                                .not_null()
                                .default("unpaid"),
                        )
                        .col(ColumnDef::new(Orders::TransactionRef).string().null())
                        .col(ColumnDef::new(Orders::ShippingAddress).text().null())
                        .col(ColumnDef::new(Orders::ContactPhone).string().null())
                        .col(ColumnDef::new(Orders::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Orders::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-orders-user_id")
                                .from(Orders::Table, Orders::UserId)
                                .to(
                                    super::m20240601_000001_create_users_table::Users::Table,
                                    super::m20240601_000001_create_users_table::Users::Id,
                                ),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Orders {
        Table,
        Id,
        OrderNumber,
        UserId,
        TotalPrice,
        Status,
        CheckoutDate,
        PaymentMethod,
        PaymentStatus,
        TransactionRef,
        ShippingAddress,
        ContactPhone,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240601_000008_create_order_items_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000008_create_order_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(OrderItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderItems::OrderId).uuid().not_null())
                        .col(ColumnDef::new(OrderItems::ProductId).uuid().not_null())
                        .col(ColumnDef::new(OrderItems::Quantity).integer().not_null())
                        .col(
                            ColumnDef::new(OrderItems::Price)
                                .decimal_len(19, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderItems::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-order_items-order_id")
                                .from(OrderItems::Table, OrderItems::OrderId)
                                .to(
                                    super::m20240601_000007_create_orders_table::Orders::Table,
                                    super::m20240601_000007_create_orders_table::Orders::Id,
                                ),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-order_items-product_id")
                                .from(OrderItems::Table, OrderItems::ProductId)
                                .to(
                                    super::m20240601_000002_create_products_table::Products::Table,
                                    super::m20240601_000002_create_products_table::Products::Id,
                                ),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum OrderItems {
        Table,
        Id,
        OrderId,
        ProductId,
        Quantity,
        Price,
        CreatedAt,
    }
}

mod m20240601_000009_create_productions_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000009_create_productions_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Productions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Productions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Productions::OrderId).uuid().not_null())
                        .col(ColumnDef::new(Productions::UserId).uuid().not_null())
                        .col(ColumnDef::new(Productions::ProductId).uuid().not_null())
                        .col(ColumnDef::new(Productions::ProductName).string().not_null())
                        .col(ColumnDef::new(Productions::Date).date().not_null())
                        .col(
                            ColumnDef::new(Productions::Stage)
                                .string_len(20)
                                .not_null()
                                .default("Preparation"),
                        )
                        .col(
                            ColumnDef::new(Productions::Status)
                                .string_len(20)
                                .not_null()
                                .default("Pending"),
                        )
                        .col(ColumnDef::new(Productions::Quantity).integer().not_null())
                        .col(ColumnDef::new(Productions::ResourcesUsed).json().null())
                        .col(ColumnDef::new(Productions::Notes).text().null())
                        .col(
                            ColumnDef::new(Productions::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Productions::UpdatedAt).timestamp().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk-productions-order_id")
                                .from(Productions::Table, Productions::OrderId)
                                .to(
                                    super::m20240601_000007_create_orders_table::Orders::Table,
                                    super::m20240601_000007_create_orders_table::Orders::Id,
                                ),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Productions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Productions {
        Table,
        Id,
        OrderId,
        UserId,
        ProductId,
        ProductName,
        Date,
        Stage,
        Status,
        Quantity,
        ResourcesUsed,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240601_000010_add_indexes {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000010_add_indexes"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_index(
                    Index::create()
                        .name("idx-orders-user_id")
                        .table(super::m20240601_000007_create_orders_table::Orders::Table)
                        .col(super::m20240601_000007_create_orders_table::Orders::UserId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx-order_items-order_id")
                        .table(super::m20240601_000008_create_order_items_table::OrderItems::Table)
                        .col(super::m20240601_000008_create_order_items_table::OrderItems::OrderId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx-productions-order_id")
                        .table(super::m20240601_000009_create_productions_table::Productions::Table)
                        .col(super::m20240601_000009_create_productions_table::Productions::OrderId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx-product_materials-product_id")
                        .table(
                            super::m20240601_000004_create_product_materials_table::ProductMaterials::Table,
                        )
                        .col(
                            super::m20240601_000004_create_product_materials_table::ProductMaterials::ProductId,
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for name in [
                "idx-orders-user_id",
                "idx-order_items-order_id",
                "idx-productions-order_id",
                "idx-product_materials-product_id",
            ] {
                manager
                    .drop_index(Index::drop().name(name).to_owned())
                    .await?;
            }
            Ok(())
        }
    }
}
