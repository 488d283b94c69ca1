//! Database entities (sea-orm models).

pub mod cart_item;
pub mod inventory_item;
pub mod inventory_usage;
pub mod order;
pub mod order_item;
pub mod product;
pub mod product_material;
pub mod production;
pub mod user;

pub use cart_item::Entity as CartItem;
pub use inventory_item::Entity as InventoryItem;
pub use inventory_usage::Entity as InventoryUsage;
pub use order::Entity as Order;
pub use order_item::Entity as OrderItem;
pub use product::Entity as Product;
pub use product_material::Entity as ProductMaterial;
pub use production::Entity as Production;
pub use user::Entity as User;
