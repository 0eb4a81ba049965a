//! Coaching endpoint

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;
use tracing::info;

use financeplay_core::coach::{CoachReply, CoachRequest};
use financeplay_core::models::{ChatTurn, Persona};

use crate::{AppError, AppState, AuthContext};

fn default_include_snapshot() -> bool {
    true
}

/// Request body for a coaching turn
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachChatRequest {
    pub prompt: String,
    /// Overrides the stored persona for this turn only
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    #[serde(default = "default_include_snapshot")]
    pub include_snapshot: bool,
}

/// POST /api/coach - Ask the coach; always answers, falling back when the model fails
pub async fn coach(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<CoachChatRequest>, JsonRejection>,
) -> Result<Json<CoachReply>, AppError> {
    let Json(req) = payload?;

    let prompt = req.prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::bad_request("prompt is required"));
    }

    let today = state.today();
    let snapshot = state.ledger(auth.user_id)?.snapshot(today);

    let persona = match req.persona.as_deref() {
        Some(p) => p
            .parse::<Persona>()
            .map_err(|e: String| AppError::bad_request(&e))?,
        None => snapshot.gamification.persona,
    };

    let request = CoachRequest {
        user_prompt: prompt,
        persona,
        history: &req.history,
        snapshot: req.include_snapshot.then_some(&snapshot),
        today,
    };

    let reply = state.coach.reply(&request).await;
    info!(
        user_id = auth.user_id,
        source = reply.source.as_str(),
        "Coach replied"
    );
    Ok(Json(reply))
}
