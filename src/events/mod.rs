use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Handle for publishing domain events onto the shared channel.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event, surfacing channel failures to the caller.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event; a full or closed channel is logged and swallowed.
    /// Event delivery is advisory and must never fail a request.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("Event delivery failed: {}", e);
        }
    }
}

// The events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Order events
    OrderCreated(Uuid),
    OrderCompleted(Uuid),
    CheckoutCompleted {
        order_id: Uuid,
        user_id: Uuid,
    },

    // Cart events
    CartItemAdded {
        user_id: Uuid,
        product_id: Uuid,
    },
    CartItemUpdated {
        user_id: Uuid,
        item_id: Uuid,
    },
    CartItemRemoved {
        user_id: Uuid,
        item_id: Uuid,
    },
    CartCleared(Uuid),

    // Inventory events
    InventoryAdjusted {
        item_id: Uuid,
        old_quantity: i32,
        new_quantity: i32,
        reason: String,
    },
    MaterialsConsumed {
        order_id: Uuid,
        item_id: Uuid,
        qty_used: i32,
    },

    // Production events
    ProductionCreated(Uuid),
    ProductionUpdated {
        production_id: Uuid,
        stage: String,
        status: String,
    },

    // Payment events
    PaymentInitiated {
        order_id: Uuid,
        provider: String,
    },
    PaymentConfirmed(Uuid),
    PaymentFailed(Uuid),

    // Catalog events
    ProductCreated(Uuid),
    ProductUpdated(Uuid),
    ProductDeleted(Uuid),

    // Generic event for custom messages
    Generic {
        message: String,
        timestamp: DateTime<Utc>,
        metadata: serde_json::Value,
    },
}

/// Background consumer: drains the event channel and logs each event.
/// Runs until every `EventSender` is dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        info!(event = ?event, "Processing event");
    }
    info!("Event channel closed; event processor shutting down");
}
