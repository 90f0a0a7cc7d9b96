use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::auth::admin_auth_middleware;
use crate::state::AppState;
use trek_booking::{Booking, BookingDetails, DashboardMetrics, UpdateBookingStatusRequest};
use trek_catalog::{CreatePackageRequest, Package, PackageAvailableDate, UpdatePackageRequest};
use trek_core::identity::{Profile, Role};

#[derive(Debug, Deserialize)]
struct AddDateRequest {
    available_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct UpdateRoleRequest {
    role: Role,
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/admin/packages", post(create_package))
        .route(
            "/v1/admin/packages/{id}",
            put(update_package).delete(delete_package),
        )
        .route(
            "/v1/admin/packages/{id}/available-dates",
            post(add_available_date),
        )
        .route(
            "/v1/admin/available-dates/{id}",
            delete(remove_available_date),
        )
        .route("/v1/admin/bookings", get(list_bookings))
        .route("/v1/admin/bookings/{id}/status", put(update_booking_status))
        .route("/v1/admin/users", get(list_users))
        .route("/v1/admin/users/{id}/role", put(update_user_role))
        .route("/v1/admin/dashboard", get(dashboard))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            admin_auth_middleware,
        ))
}

// ============================================================================
// Package Management
// ============================================================================

/// POST /v1/admin/packages
async fn create_package(
    State(state): State<AppState>,
    Json(req): Json<CreatePackageRequest>,
) -> Result<Json<Package>, AppError> {
    let package = state.packages.create(&req).await?;
    info!("Package {} created", package.id);
    Ok(Json(package))
}

/// PUT /v1/admin/packages/{id}
async fn update_package(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePackageRequest>,
) -> Result<Json<Package>, AppError> {
    Ok(Json(state.packages.update(id, &req).await?))
}

/// DELETE /v1/admin/packages/{id}
async fn delete_package(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.packages.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/admin/packages/{id}/available-dates
async fn add_available_date(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddDateRequest>,
) -> Result<Json<PackageAvailableDate>, AppError> {
    Ok(Json(
        state
            .packages
            .add_available_date(id, req.available_date)
            .await?,
    ))
}

/// DELETE /v1/admin/available-dates/{id}
async fn remove_available_date(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.packages.remove_available_date(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Booking Management
// ============================================================================

/// GET /v1/admin/bookings — every booking, newest first.
async fn list_bookings(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookingDetails>>, AppError> {
    Ok(Json(state.bookings.list_all().await?))
}

/// PUT /v1/admin/bookings/{id}/status
async fn update_booking_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBookingStatusRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.bookings.update_status(id, &req).await?;
    info!("Booking {} set to {}", booking.id, booking.status);
    Ok(Json(booking))
}

// ============================================================================
// User Management
// ============================================================================

/// GET /v1/admin/users
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<Profile>>, AppError> {
    Ok(Json(state.profiles.list().await?))
}

/// PUT /v1/admin/users/{id}/role
async fn update_user_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<Profile>, AppError> {
    Ok(Json(state.profiles.update_role(id, req.role).await?))
}

// ============================================================================
// Dashboard
// ============================================================================

/// GET /v1/admin/dashboard — counts and sums over the full booking set,
/// recomputed on every request.
async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardMetrics>, AppError> {
    let details = state.bookings.list_all().await?;
    let bookings: Vec<Booking> = details.into_iter().map(|d| d.booking).collect();

    Ok(Json(DashboardMetrics::compute(&bookings)))
}
