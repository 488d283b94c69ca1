pub mod carts;
pub mod checkout;
pub mod common;
pub mod inventory;
pub mod orders;
pub mod payments;
pub mod products;
pub mod productions;
pub mod reports;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub carts: Arc<crate::services::carts::CartService>,
    pub orders: Arc<crate::services::orders::OrderService>,
    pub inventory: Arc<crate::services::inventory::InventoryService>,
    pub bom: Arc<crate::services::bom::BomService>,
    pub productions: Arc<crate::services::productions::ProductionService>,
    pub payments: Arc<crate::services::payments::PaymentService>,
    pub catalog: Arc<crate::services::products::ProductCatalogService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, config: &AppConfig) -> Self {
        let carts = Arc::new(crate::services::carts::CartService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let orders = Arc::new(crate::services::orders::OrderService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let inventory = Arc::new(crate::services::inventory::InventoryService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let bom = Arc::new(crate::services::bom::BomService::new(db_pool.clone()));
        let productions = Arc::new(crate::services::productions::ProductionService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let payments = Arc::new(crate::services::payments::PaymentService::new(
            db_pool.clone(),
            event_sender.clone(),
            config,
        ));
        let catalog = Arc::new(crate::services::products::ProductCatalogService::new(
            db_pool,
            event_sender,
        ));

        Self {
            carts,
            orders,
            inventory,
            bom,
            productions,
            payments,
            catalog,
        }
    }
}
