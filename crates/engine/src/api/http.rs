//! HTTP routes.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use xpledger_domain::{LeaderboardEntry, PhaseId, StudentId, XpEvent};

use crate::app::App;
use crate::use_cases::xp::{AwardResult, AwardXpRequest, StudentXp, XpError};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route(
            "/api/students/{student_id}/phases/{phase_id}/complete",
            post(complete_phase),
        )
        .route(
            "/api/students/{student_id}/phases/{phase_id}/xp",
            post(award_xp),
        )
        .route("/api/students/{student_id}/xp", get(student_xp))
        .route("/api/students/{student_id}/xp/events", get(student_xp_events))
        .route("/api/leaderboard", get(leaderboard))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Awards
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompletionBody {
    #[serde(default)]
    perfect_score: bool,
}

/// Build an award request from path params and an optional JSON body.
fn award_request(student_id: String, phase_id: i64, body: &Bytes) -> Result<AwardXpRequest, ApiError> {
    let student_id = parse_student_id(student_id)?;
    let body: CompletionBody = if body.is_empty() {
        CompletionBody::default()
    } else {
        serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };
    Ok(AwardXpRequest::new(student_id, PhaseId::new(phase_id)).with_perfect_score(body.perfect_score))
}

async fn complete_phase(
    State(app): State<Arc<App>>,
    Path((student_id, phase_id)): Path<(String, i64)>,
    body: Bytes,
) -> Result<Json<AwardResult>, ApiError> {
    let request = award_request(student_id, phase_id, &body)?;
    let result = app.use_cases.xp.complete_phase.execute(request).await?;
    Ok(Json(result))
}

async fn award_xp(
    State(app): State<Arc<App>>,
    Path((student_id, phase_id)): Path<(String, i64)>,
    body: Bytes,
) -> Result<Json<AwardResult>, ApiError> {
    let request = award_request(student_id, phase_id, &body)?;
    let result = app.use_cases.xp.award.execute(request).await?;
    Ok(Json(result))
}

// =============================================================================
// Reads
// =============================================================================

async fn student_xp(
    State(app): State<Arc<App>>,
    Path(student_id): Path<String>,
) -> Result<Json<StudentXp>, ApiError> {
    let student_id = parse_student_id(student_id)?;
    let xp = app.use_cases.xp.student_xp.execute(&student_id).await?;
    Ok(Json(xp))
}

async fn student_xp_events(
    State(app): State<Arc<App>>,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<XpEvent>>, ApiError> {
    let student_id = parse_student_id(student_id)?;
    let events = app.use_cases.xp.student_xp.events(&student_id).await?;
    Ok(Json(events))
}

#[derive(Debug, Deserialize)]
struct LeaderboardQuery {
    limit: Option<u32>,
}

async fn leaderboard(
    State(app): State<Arc<App>>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let entries = app.use_cases.xp.leaderboard.execute(query.limit).await?;
    Ok(Json(entries))
}

fn parse_student_id(raw: String) -> Result<StudentId, ApiError> {
    StudentId::new(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound(msg) => (axum::http::StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::BadRequest(msg) => {
                (axum::http::StatusCode::BAD_REQUEST, msg).into_response()
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::warn!(error = %msg, "Storage unavailable");
                (
                    axum::http::StatusCode::SERVICE_UNAVAILABLE,
                    "Storage temporarily unavailable, retry the request",
                )
                    .into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error",
                )
                    .into_response()
            }
        }
    }
}

impl From<XpError> for ApiError {
    fn from(e: XpError) -> Self {
        match e {
            XpError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            XpError::Transient(inner) => ApiError::ServiceUnavailable(inner.to_string()),
            XpError::Validation(inner) => ApiError::Internal(inner.to_string()),
        }
    }
}
