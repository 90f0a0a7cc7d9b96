use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use trek_catalog::{Package, PackageAvailableDate};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/packages", get(list_packages))
        .route("/v1/packages/{id}", get(get_package))
        .route("/v1/packages/{id}/available-dates", get(list_available_dates))
}

/// GET /v1/packages — active packages, newest first.
async fn list_packages(State(state): State<AppState>) -> Result<Json<Vec<Package>>, AppError> {
    Ok(Json(state.packages.list_active().await?))
}

/// GET /v1/packages/{id}
async fn get_package(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Package>, AppError> {
    let package = state
        .packages
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("package not found".to_string()))?;

    Ok(Json(package))
}

/// GET /v1/packages/{id}/available-dates — open dates only, ascending.
async fn list_available_dates(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PackageAvailableDate>>, AppError> {
    let today = Utc::now().date_naive();
    Ok(Json(state.packages.list_open_dates(id, today).await?))
}
