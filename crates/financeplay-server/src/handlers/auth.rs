//! Authentication-related handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use financeplay_core::models::User;

use crate::{issue_token, AppError, AppState, AuthContext, AuthMethod};

/// Request body for signup
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

/// A user together with a fresh bearer token
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub user: User,
    pub token: String,
}

/// Response for the /api/me endpoint
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: User,
    /// How the user was authenticated
    pub auth_method: AuthMethod,
}

/// GET /health - Liveness check
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn token_for(state: &AppState, user: User) -> Result<TokenResponse, AppError> {
    let token = issue_token(
        user.id,
        &user.email,
        &state.config.token_secret,
        state.config.token_ttl_hours,
    )?;
    Ok(TokenResponse { user, token })
}

/// POST /api/users - Create a user and return a token
pub async fn signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let Json(req) = payload?;
    let user = state.db.create_user(&req.email, req.name.as_deref())?;
    info!(user_id = user.id, "User signed up");
    Ok((StatusCode::CREATED, Json(token_for(&state, user)?)))
}

/// POST /api/login - Exchange an email for a token
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(req) = payload?;
    let user = state
        .db
        .get_user_by_email(&req.email)?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(token_for(&state, user)?))
}

/// GET /api/me - Get the currently authenticated user
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<MeResponse>, AppError> {
    let user = state
        .db
        .get_user(auth.user_id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(MeResponse {
        user,
        auth_method: auth.method,
    }))
}
