//! FinancePlay Web Server
//!
//! Axum-based REST API for the FinancePlay budgeting coach.
//!
//! Security features:
//! - Signed bearer tokens (secure by default, disable auth for local single-user use)
//! - Restrictive CORS policy
//! - Input validation with 400 responses
//! - Sanitized error responses (internal details are logged only)

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use financeplay_core::ai::{CoachBackend, CoachClient};
use financeplay_core::coach::Coach;
use financeplay_core::config::{CoachSettings, Settings};
use financeplay_core::db::Database;
use financeplay_core::ledger::{Ledger, LedgerAction};

mod auth;
mod handlers;

pub use auth::{issue_token, AuthContext, AuthMethod, Claims, LOCAL_USER_EMAIL, TOKEN_SECRET_ENV};

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether bearer tokens are required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// HMAC secret for signing bearer tokens
    pub token_secret: String,
    /// Token lifetime in hours
    pub token_ttl_hours: i64,
    /// Fixed reference date for derived values (tests); None means the local date
    pub today: Option<NaiveDate>,
    /// Backend timeout and fallback reply
    pub coach: CoachSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
            token_secret: String::new(),
            token_ttl_hours: 24 * 30,
            today: None,
            coach: Settings::default().coach,
        }
    }
}

impl ServerConfig {
    /// Build from settings, taking the token secret from the environment
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            require_auth: settings.server.require_auth,
            allowed_origins: settings.server.allowed_origins.clone(),
            token_secret: std::env::var(TOKEN_SECRET_ENV).unwrap_or_default(),
            token_ttl_hours: settings.server.token_ttl_hours,
            today: None,
            coach: settings.coach.clone(),
        }
    }
}

/// One user's cached ledger. The lock also serializes that user's writes.
type LedgerSlot = Arc<Mutex<Option<Arc<Ledger>>>>;

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    pub coach: Coach,
    /// Per-user ledgers, loaded on first use and kept in step with writes
    ledgers: Mutex<HashMap<i64, LedgerSlot>>,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig, coach: Coach) -> Self {
        Self {
            db,
            config,
            coach,
            ledgers: Mutex::new(HashMap::new()),
        }
    }

    /// Reference date for derived values
    pub fn today(&self) -> NaiveDate {
        self.config.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn slot(&self, user_id: i64) -> LedgerSlot {
        self.ledgers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(user_id)
            .or_default()
            .clone()
    }

    /// The user's ledger, loading it from the database when not cached
    pub fn ledger(&self, user_id: i64) -> Result<Arc<Ledger>, AppError> {
        let slot = self.slot(user_id);
        let mut cached = slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(ledger) = cached.as_ref() {
            return Ok(ledger.clone());
        }

        let ledger = Arc::new(Ledger::new(self.db.load_user_records(user_id)?));
        *cached = Some(ledger.clone());
        Ok(ledger)
    }

    /// Persist a change, then fold the returned actions into the cached ledger
    ///
    /// Runs under the user's slot lock, so a first load never interleaves with
    /// a write. If `persist` fails the cached ledger is dropped, since part of
    /// the change may already be in the database; the next read reloads it.
    pub fn write<T, F>(&self, user_id: i64, persist: F) -> Result<T, AppError>
    where
        F: FnOnce(&Database) -> Result<(T, Vec<LedgerAction>), AppError>,
    {
        let slot = self.slot(user_id);
        let mut cached = slot.lock().unwrap_or_else(|e| e.into_inner());

        match persist(&self.db) {
            Ok((value, actions)) => {
                if let Some(current) = cached.take() {
                    *cached = Some(Arc::new(current.apply_all(actions)));
                }
                Ok(value)
            }
            Err(err) => {
                if cached.take().is_some() {
                    warn!(user_id, "Write failed, dropped cached ledger");
                }
                Err(err)
            }
        }
    }
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
///
/// The coach backend is chosen from the environment.
pub fn create_router(db: Database, config: ServerConfig) -> anyhow::Result<Router> {
    let coach = Coach::from_settings(&config.coach)?;
    match coach.client() {
        Some(client) => info!(
            "Coach backend configured: {} (model: {})",
            client.host(),
            client.model()
        ),
        None => info!(
            "ℹ️  Coach backend not configured (set COACH_BACKEND, OPENAI_API_KEY or OLLAMA_HOST)"
        ),
    }
    Ok(create_router_with_coach(db, config, coach))
}

/// Create the application router with an explicit coach (for testing)
pub fn create_router_with_coach(db: Database, config: ServerConfig, coach: Coach) -> Router {
    let state = Arc::new(AppState::new(db, config.clone(), coach));

    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/users", post(handlers::signup))
        .route("/api/login", post(handlers::login));

    let api_routes = Router::new()
        // Auth
        .route("/api/me", get(handlers::get_me))
        // Derived views
        .route("/api/snapshot", get(handlers::get_snapshot))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/insights", get(handlers::get_insights))
        .route("/api/health-score", get(handlers::get_health_score))
        // Records
        .route(
            "/api/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route("/api/income", post(handlers::create_income))
        .route("/api/savings", post(handlers::create_savings_transfer))
        .route("/api/goals", get(handlers::list_goals).post(handlers::create_goal))
        .route("/api/goals/:id/progress", patch(handlers::update_goal_progress))
        .route("/api/goals/:id", axum::routing::delete(handlers::delete_goal))
        .route(
            "/api/diary",
            get(handlers::list_diary).post(handlers::create_diary_entry),
        )
        .route(
            "/api/budget/categories",
            get(handlers::list_budget_categories).patch(handlers::upsert_budget_categories),
        )
        .route(
            "/api/bursaries",
            get(handlers::list_bursaries).post(handlers::create_bursary),
        )
        // Gamification
        .route("/api/gamification", get(handlers::get_gamification))
        .route("/api/gamification/persona", patch(handlers::update_persona))
        // Coach & reports
        .route("/api/coach", post(handlers::coach))
        .route("/api/reports/weekly", get(handlers::weekly_report))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        // Allow specified origins
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    public_routes
        .merge(api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!("⚠️  Authentication disabled - every request acts as {}", LOCAL_USER_EMAIL);
    } else if config.token_secret.is_empty() {
        anyhow::bail!(
            "Authentication requires a token secret. Set {} or disable auth for local use.",
            TOKEN_SECRET_ENV
        );
    }

    // Check coach connection
    check_coach_connection().await;

    let app = create_router(db, config)?;
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log coach backend connection status
async fn check_coach_connection() {
    match CoachClient::from_env() {
        Some(client) => {
            if client.health_check().await {
                info!("✅ Coach backend connected: {} ({})", client.host(), client.model());
            } else {
                warn!(
                    "⚠️  Coach backend configured but not responding: {} - replies will use the fallback",
                    client.host()
                );
            }
        }
        None => {
            info!("ℹ️  Coach backend not configured, replies will use the fallback");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn conflict(msg: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        // Caller mistakes carry their message; everything else stays generic
        if let Some(rejection) = err.downcast_ref::<JsonRejection>() {
            return Self::bad_request(&rejection.body_text());
        }
        if let Some(core) = err.downcast_ref::<financeplay_core::Error>() {
            match core {
                financeplay_core::Error::InvalidData(msg) => return Self::bad_request(msg),
                financeplay_core::Error::NotFound(msg) => {
                    return Self::not_found(&format!("{} not found", msg))
                }
                financeplay_core::Error::Conflict(msg) => return Self::conflict(msg),
                _ => {}
            }
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
