use crate::handlers::common::{
    created_response, no_content_response, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    auth::AuthUser,
    errors::ServiceError,
    services::{
        bom::BomLineInput,
        products::{CreateProductInput, UpdateProductInput},
    },
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

/// Creates the router for catalog endpoints. Reads are available to any
/// authenticated user; mutations and BOM management are staff actions.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/", post(create_product))
        .route("/:id", get(get_product))
        .route("/:id", put(update_product))
        .route("/:id", delete(delete_product))
        .route("/:id/materials", get(get_materials))
        .route("/:id/materials", put(replace_materials))
}

/// List products with pagination
async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let (products, total) = state
        .services
        .catalog
        .list(params.page, params.per_page)
        .await?;

    Ok(success_response(PaginatedResponse::new(
        products,
        params.page,
        params.per_page,
        total,
    )))
}

/// Single product
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    let product = state.services.catalog.get(id).await?;
    Ok(success_response(product))
}

/// Create a product. Employees only.
async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProductInput>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    user.require_employee()?;
    validate_input(&payload)?;

    let product = state.services.catalog.create(payload).await?;
    Ok(created_response(product))
}

/// Update a product. Employees only.
async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductInput>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    user.require_employee()?;
    let product = state.services.catalog.update(id, payload).await?;
    Ok(success_response(product))
}

/// Delete a product. Employees only.
async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    user.require_employee()?;
    state.services.catalog.delete(id).await?;
    Ok(no_content_response())
}

/// Read a product's bill of materials. Employees only.
async fn get_materials(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    user.require_employee()?;
    let materials = state.services.bom.materials_for_product(id).await?;
    Ok(success_response(materials))
}

#[derive(Debug, Deserialize)]
pub struct ReplaceMaterialsRequest {
    pub materials: Vec<BomLineInput>,
}

/// Replace a product's bill of materials. Employees only.
async fn replace_materials(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReplaceMaterialsRequest>,
) -> Result<impl axum::response::IntoResponse, ServiceError> {
    user.require_employee()?;
    let materials = state
        .services
        .bom
        .replace_materials(id, payload.materials)
        .await?;
    Ok(success_response(materials))
}
