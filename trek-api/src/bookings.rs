use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use tracing::info;

use crate::error::AppError;
use crate::middleware::auth::{auth_middleware, Claims};
use crate::state::AppState;
use trek_booking::{Booking, BookingDetails, CreateBookingRequest};

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking))
        .route("/v1/bookings/mine", get(my_bookings))
        .route_layer(axum::middleware::from_fn_with_state(state, auth_middleware))
}

/// POST /v1/bookings
async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<Booking>, AppError> {
    let session = claims.session()?;
    let booking = state.bookings.create(&session, &req).await?;

    info!("Booking {} created by {}", booking.id, session.username);

    Ok(Json(booking))
}

/// GET /v1/bookings/mine — the session user's bookings, newest first,
/// joined with package and members.
async fn my_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<BookingDetails>>, AppError> {
    let session = claims.session()?;
    Ok(Json(state.bookings.list_for_user(session.user_id).await?))
}
