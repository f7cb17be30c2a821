//! Runs API handlers
//!
//! Provides REST endpoints over the run store:
//! - List runs and view a full run record
//! - Decision timeline and fleet statistics
//! - Export a run as markdown or JSON

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::state::AppState;
use crate::export::{self, ExportFormat};
use crate::stats::DashboardStats;
use crate::store::{RunRecord, RunStatus, RunSummary};
use crate::timeline::Timeline;

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn not_found() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Run not found")),
    )
}

// ============================================================================
// Response types
// ============================================================================

/// Runs list response
#[derive(Debug, Serialize)]
pub struct RunsListResponse {
    pub runs: Vec<RunSummary>,
    pub total: usize,
}

/// Export response
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub run_id: String,
    pub format: String,
    pub content: String,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub storage_root: String,
    pub storage_available: bool,
}

// ============================================================================
// Query parameters
// ============================================================================

/// Runs filter query parameters
#[derive(Debug, Deserialize)]
pub struct RunsQueryParams {
    pub status: Option<String>,
}

/// Export query parameters
#[derive(Debug, Deserialize)]
pub struct ExportQueryParams {
    pub format: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// List runs, newest first
/// GET /api/runs
pub async fn list_runs(
    State(state): State<AppState>,
    Query(params): Query<RunsQueryParams>,
) -> Json<RunsListResponse> {
    let mut runs = state.store.list_summaries();

    if let Some(status) = params.status.filter(|s| !s.is_empty()) {
        let wanted = RunStatus::from(status);
        runs.retain(|run| run.status.as_ref() == Some(&wanted));
    }

    let total = runs.len();
    Json(RunsListResponse { runs, total })
}

/// Get a specific run (the full record)
/// GET /api/runs/{id}
pub async fn get_run(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RunRecord>, ApiError> {
    state.store.get_by_id(&id).map(Json).ok_or_else(not_found)
}

/// Get the decision timeline for a run
/// GET /api/runs/{id}/timeline
pub async fn get_run_timeline(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Timeline>, ApiError> {
    let run = state.store.get_by_id(&id).ok_or_else(not_found)?;
    Ok(Json(Timeline::from_record(&run)))
}

/// Export a run report
/// GET /api/runs/{id}/export
pub async fn export_run(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ExportQueryParams>,
) -> Result<Json<ExportResponse>, ApiError> {
    let format = match params.format.as_deref() {
        None | Some("") => ExportFormat::default(),
        Some(raw) => raw.parse::<ExportFormat>().map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(e.to_string())),
            )
        })?,
    };

    let run = state.store.get_by_id(&id).ok_or_else(not_found)?;

    let content = export::export(&run, format).map_err(|e| {
        tracing::error!("Failed to export run {}: {}", id, e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )
    })?;

    Ok(Json(ExportResponse {
        run_id: id,
        format: format.to_string(),
        content,
    }))
}

/// Fleet statistics across all runs
/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> Json<DashboardStats> {
    let runs = state.store.list_summaries();
    Json(DashboardStats::from_summaries(&runs))
}

/// Health check
/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        storage_root: state.store.root().display().to_string(),
        storage_available: state.store.is_available(),
    })
}

// ============================================================================
// Tests
// ============================================================================
