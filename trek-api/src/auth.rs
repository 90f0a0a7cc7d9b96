use axum::{extract::State, routing::post, Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::state::{AppState, AuthConfig};
use trek_core::identity::{CreateProfileRequest, Profile};

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    profile: Profile,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/register", post(register))
        .route("/v1/auth/login", post(login))
}

/// POST /v1/auth/register
async fn register(
    State(state): State<AppState>,
    Json(req): Json<CreateProfileRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let profile = state.profiles.create(&req).await?;
    let token = issue_token(&profile, &state.auth)?;

    Ok(Json(AuthResponse { token, profile }))
}

/// POST /v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let profile = state
        .profiles
        .find_by_username(&req.username)
        .await?
        .ok_or_else(|| AppError::Authentication("unknown username".to_string()))?;

    let token = issue_token(&profile, &state.auth)?;

    Ok(Json(AuthResponse { token, profile }))
}

fn issue_token(profile: &Profile, auth: &AuthConfig) -> Result<String, AppError> {
    let claims = Claims {
        sub: profile.id.to_string(),
        username: profile.username.clone(),
        role: profile.role.as_str().to_string(),
        exp: (Utc::now() + Duration::seconds(auth.expiration as i64)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))
}
