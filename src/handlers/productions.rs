use crate::handlers::common::{
    created_response, success_response, PaginatedResponse, PaginationParams,
};
use crate::{
    errors::ServiceError,
    services::productions::{CreateProductionInput, ProductionFilter, UpdateProductionInput},
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post, put},
    Router,
};
use uuid::Uuid;

/// Creates the router for production endpoints. Mounted behind the employee
/// role.
pub fn production_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_productions))
        .route("/", post(create_production))
        .route("/analytics", get(analytics))
        .route("/:id", get(get_production))
        .route("/:id", put(update_production))
}

/// List production records, filterable by stage/status/order
async fn list_productions(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<ProductionFilter>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let (records, total) = state
        .services
        .productions
        .list(filter, params.page, params.per_page)
        .await?;

    Ok(success_response(PaginatedResponse::new(
        records,
        params.page,
        params.per_page,
        total,
    )))
}

async fn get_production(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let record = state.services.productions.get(id).await?;
    Ok(success_response(record))
}

async fn create_production(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductionInput>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let record = state.services.productions.create(payload).await?;
    Ok(created_response(record))
}

async fn update_production(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductionInput>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let record = state.services.productions.update(id, payload).await?;
    Ok(success_response(record))
}

/// Aggregate counts for the workshop dashboard
async fn analytics(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let analytics = state.services.productions.analytics().await?;
    Ok(success_response(analytics))
}
