// Jar Stack - Web Server
// REST API with Axum: jars, PDF reports, invitations

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use clap::Parser;
use jarstack::{
    export_full_report, export_jar_report, get_all_jars, get_jar, pending_invitations, respond,
    setup_database, AppConfig, Invitation, InvitationStatus, Jar, JarError, PendingInvitation,
    ReportFile,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Jar Stack API server
#[derive(Parser)]
#[command(name = "jarstack-server")]
#[command(author, version, about, long_about = None)]
struct ServerArgs {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    fn db(&self) -> Result<MutexGuard<'_, Connection>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal("database lock poisoned".to_string()))
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Handler failure, rendered as an `ApiResponse` with a matching status
#[derive(Debug)]
enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl From<JarError> for ApiError {
    fn from(e: JarError) -> Self {
        match e {
            JarError::JarNotFound { .. } | JarError::InvitationNotFound { .. } => {
                ApiError::NotFound(e.to_string())
            }
            JarError::InvalidInvitation(_) | JarError::InvalidSettings(_) => {
                ApiError::BadRequest(e.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(format!("{:#}", e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Internal(m) => {
                error!(error = %m, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, m)
            }
        };
        (status, Json(ApiResponse::<()>::err(message))).into_response()
    }
}

/// Jar row for list views (children omitted)
#[derive(Serialize)]
struct JarSummaryResponse {
    id: i64,
    name: String,
    target: f64,
    saved: f64,
    withdrawn: f64,
    streak: u32,
    currency: String,
    progress: f64,
}

impl From<&Jar> for JarSummaryResponse {
    fn from(jar: &Jar) -> Self {
        Self {
            id: jar.id,
            name: jar.name.clone(),
            target: jar.target,
            saved: jar.saved,
            withdrawn: jar.withdrawn,
            streak: jar.streak,
            currency: jar.currency_symbol().to_string(),
            progress: jar.progress_percent(),
        }
    }
}

#[derive(Deserialize)]
struct InvitationQuery {
    user_id: String,
    #[serde(default)]
    email: String,
}

#[derive(Deserialize)]
struct RespondRequest {
    user_id: String,
}

/// PDF download response with an attachment filename
fn pdf_response(report: ReportFile) -> Response {
    let disposition = format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        report.filename.replace('"', "'"),
        urlencoding::encode(&report.filename)
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.bytes,
    )
        .into_response()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/jars - All jars, summary rows
async fn list_jars(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let conn = state.db()?;
    let jars = get_all_jars(&conn)?;

    let response: Vec<JarSummaryResponse> = jars.iter().map(JarSummaryResponse::from).collect();
    Ok(Json(ApiResponse::ok(response)))
}

/// GET /api/jars/:id - One jar with notes and records
async fn jar_detail(
    State(state): State<AppState>,
    Path(jar_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let conn = state.db()?;
    let jar = get_jar(&conn, jar_id)?.ok_or(JarError::JarNotFound { id: jar_id })?;

    Ok(Json(ApiResponse::ok(jar)))
}

/// GET /api/report - Full report PDF
async fn full_report(State(state): State<AppState>) -> Result<Response, ApiError> {
    let conn = state.db()?;
    let jars = get_all_jars(&conn)?;
    drop(conn);

    let report = export_full_report(&jars, &Utc::now())?;
    info!(file = %report.filename, pages = report.page_count, "Serving full report");
    Ok(pdf_response(report))
}

/// GET /api/jars/:id/report - Single jar report PDF
async fn jar_report(
    State(state): State<AppState>,
    Path(jar_id): Path<i64>,
) -> Result<Response, ApiError> {
    let conn = state.db()?;
    let jar = get_jar(&conn, jar_id)?.ok_or(JarError::JarNotFound { id: jar_id })?;
    drop(conn);

    let report = export_jar_report(&jar, &Utc::now())?;
    info!(file = %report.filename, pages = report.page_count, "Serving jar report");
    Ok(pdf_response(report))
}

/// GET /api/invitations?user_id=&email= - Pending invitations for a user
async fn list_invitations(
    State(state): State<AppState>,
    Query(query): Query<InvitationQuery>,
) -> Result<Json<ApiResponse<Vec<PendingInvitation>>>, ApiError> {
    let conn = state.db()?;
    let invitations = pending_invitations(&conn, &query.user_id, &query.email)?;
    Ok(Json(ApiResponse::ok(invitations)))
}

/// POST /api/invitations/:id/:action - Accept or decline
async fn answer_invitation(
    State(state): State<AppState>,
    Path((invitation_id, action)): Path<(String, String)>,
    Json(body): Json<RespondRequest>,
) -> Result<Json<ApiResponse<Invitation>>, ApiError> {
    let status = match action.as_str() {
        "accept" => InvitationStatus::Accepted,
        "decline" => InvitationStatus::Declined,
        other => return Err(ApiError::NotFound(format!("unknown action: {}", other))),
    };

    let conn = state.db()?;
    let invitation = respond(&conn, &invitation_id, &body.user_id, status)?;
    Ok(Json(ApiResponse::ok(invitation)))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = ServerArgs::parse();
    let config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    let conn = Connection::open(&config.database_path)
        .with_context(|| format!("Failed to open database {}", config.database_path.display()))?;
    setup_database(&conn)?;
    info!(db = %config.database_path.display(), "Database opened");

    // Create shared state
    let state = AppState {
        db: Arc::new(Mutex::new(conn)),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/jars", get(list_jars))
        .route("/jars/:id", get(jar_detail))
        .route("/jars/:id/report", get(jar_report))
        .route("/report", get(full_report))
        .route("/invitations", get(list_invitations))
        .route("/invitations/:id/:action", post(answer_invitation))
        .with_state(state);

    let app = Router::new().nest("/api", api_routes).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(%addr, "🚀 Server running");
    info!("   API: http://{}/api/jars", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
