use crate::handlers::common::{
    created_response, no_content_response, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    errors::ServiceError,
    services::inventory::{AdjustStockInput, CreateInventoryItemInput, UpdateInventoryItemInput},
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

/// Creates the router for inventory endpoints. The whole router is mounted
/// behind the employee role.
pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_inventory))
        .route("/", post(create_inventory_item))
        .route("/low-stock", get(low_stock))
        .route("/:id", get(get_inventory_item))
        .route("/:id", put(update_inventory_item))
        .route("/:id", delete(delete_inventory_item))
        .route("/:id/adjust", post(adjust_stock))
        .route("/:id/usage", get(usage_log))
}

/// List inventory items with pagination
async fn list_inventory(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let (items, total) = state
        .services
        .inventory
        .list(params.page, params.per_page)
        .await?;

    Ok(success_response(PaginatedResponse::new(
        items,
        params.page,
        params.per_page,
        total,
    )))
}

/// Items at or below their reorder point
async fn low_stock(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let items = state.services.inventory.low_stock().await?;
    Ok(success_response(items))
}

async fn get_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let item = state.services.inventory.get(id).await?;
    Ok(success_response(item))
}

async fn create_inventory_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateInventoryItemInput>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let item = state.services.inventory.create(payload).await?;
    Ok(created_response(item))
}

async fn update_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInventoryItemInput>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let item = state.services.inventory.update(id, payload).await?;
    Ok(success_response(item))
}

async fn delete_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    state.services.inventory.delete(id).await?;
    Ok(no_content_response())
}

/// Manual stock adjustment; negative deltas are logged as usage
async fn adjust_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdjustStockInput>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let item = state.services.inventory.adjust(id, payload).await?;
    Ok(success_response(item))
}

/// Usage log for an item, newest first
async fn usage_log(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let rows = state.services.inventory.usage(id).await?;
    Ok(success_response(rows))
}
