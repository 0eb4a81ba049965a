//! Report handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;

use financeplay_core::report::build_weekly_report;

use crate::{AppError, AppState, AuthContext};

/// Query parameters for the weekly report
#[derive(Debug, Deserialize)]
pub struct WeeklyReportQuery {
    /// `text` for a plain-text rendering, JSON otherwise
    pub format: Option<String>,
}

/// GET /api/reports/weekly - Summary of the trailing seven days
pub async fn weekly_report(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<WeeklyReportQuery>,
) -> Result<Response, AppError> {
    let today = state.today();
    let snapshot = state.ledger(auth.user_id)?.snapshot(today);
    let report = build_weekly_report(&snapshot, today);

    match params.format.as_deref() {
        Some(f) if f.eq_ignore_ascii_case("text") => Ok((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            report.to_text(),
        )
            .into_response()),
        Some(f) if !f.eq_ignore_ascii_case("json") => Err(AppError::bad_request(&format!(
            "Unknown report format: {}",
            f
        ))),
        _ => Ok(Json(report).into_response()),
    }
}
