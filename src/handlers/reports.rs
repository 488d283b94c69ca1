use crate::{errors::ServiceError, AppState};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

/// Creates the router for report exports. Mounted behind the employee role.
pub fn report_routes() -> Router<AppState> {
    Router::new().route("/production.csv", get(production_csv))
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductionReportParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// CSV export of production records
async fn production_csv(
    State(state): State<AppState>,
    Query(params): Query<ProductionReportParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let csv = state
        .services
        .productions
        .export_csv(params.from, params.to)
        .await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"production.csv\"",
            ),
        ],
        csv,
    ))
}
