//! Derived views: snapshot, dashboard, insights, health score, gamification

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;

use financeplay_core::gamification::Gamification;
use financeplay_core::health::HealthScore;
use financeplay_core::insights::Insight;
use financeplay_core::ledger::LedgerAction;
use financeplay_core::models::Persona;
use financeplay_core::snapshot::{Dashboard, Snapshot};

use crate::{AppError, AppState, AuthContext};

fn snapshot_for(state: &AppState, auth: &AuthContext) -> Result<Snapshot, AppError> {
    Ok(state.ledger(auth.user_id)?.snapshot(state.today()))
}

/// GET /api/snapshot - Records plus derived totals
pub async fn get_snapshot(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Snapshot>, AppError> {
    Ok(Json(snapshot_for(&state, &auth)?))
}

/// GET /api/dashboard - Snapshot with health score and insights
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Dashboard>, AppError> {
    let snapshot = snapshot_for(&state, &auth)?;
    Ok(Json(Dashboard::from_snapshot(snapshot)))
}

/// GET /api/insights - Up to three insights
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<Insight>>, AppError> {
    Ok(Json(snapshot_for(&state, &auth)?.insights()))
}

/// GET /api/health-score
pub async fn get_health_score(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<HealthScore>, AppError> {
    Ok(Json(snapshot_for(&state, &auth)?.health()))
}

/// GET /api/gamification - Level, XP, streak and badges
pub async fn get_gamification(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Gamification>, AppError> {
    Ok(Json(snapshot_for(&state, &auth)?.gamification))
}

/// Request body for changing the coach persona
#[derive(Debug, Deserialize)]
pub struct PersonaRequest {
    pub persona: String,
}

/// PATCH /api/gamification/persona
pub async fn update_persona(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<PersonaRequest>, JsonRejection>,
) -> Result<Json<Gamification>, AppError> {
    let Json(req) = payload?;
    let persona: Persona = req
        .persona
        .parse()
        .map_err(|e: String| AppError::bad_request(&e))?;

    state.write(auth.user_id, |db| {
        db.set_persona(auth.user_id, persona)?;
        Ok(((), vec![LedgerAction::PersonaChanged(persona)]))
    })?;

    Ok(Json(snapshot_for(&state, &auth)?.gamification))
}
