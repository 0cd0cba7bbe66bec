//! Axum route handlers for the Optimization API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{JobAnalysis, Resume};
use crate::optimization::OptimizationReport;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeJobRequest {
    pub job_description: String,
    #[serde(default)]
    pub user_preferences: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub job_description: String,
    pub resume: Resume,
    #[serde(default)]
    pub user_preferences: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/analyze-job
///
/// Runs stage 1 alone on a fresh conversation. Useful for previewing what the
/// optimizer will target before committing to a full run.
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeJobRequest>,
) -> Result<Json<JobAnalysis>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let mut optimizer = state.optimizer()?;
    let analysis = optimizer
        .stage_1(&request.job_description, request.user_preferences.as_deref())
        .await?;

    Ok(Json(analysis))
}

/// POST /api/v1/resumes/optimize
///
/// Runs the full five-stage pipeline and returns every intermediate result.
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<OptimizationReport>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let mut optimizer = state.optimizer()?;
    let report = optimizer
        .optimize_resume(
            &request.job_description,
            &request.resume,
            request.user_preferences.as_deref(),
        )
        .await?;

    Ok(Json(report))
}
