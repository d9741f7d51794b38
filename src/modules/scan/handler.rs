use super::dto::{
    JobInfoResponse, JobResultResponse, JobStatusResponse, ScanRequest, ScanResponse,
    StatsResponse,
};
use super::error::ScanError;
use super::service::ScanService;
use crate::common::response::ApiError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

/// Create a new video scan job
#[utoipa::path(
    post,
    path = "/api/v1/scan",
    request_body = ScanRequest,
    responses(
        (status = 201, description = "Scan job created", body = ScanResponse),
        (status = 400, description = "Invalid video URL"),
        (status = 500, description = "Engine submission failed")
    ),
    tag = "Scan"
)]
pub async fn create_scan(
    State(state): State<AppState>,
    Json(payload): Json<ScanRequest>,
) -> impl IntoResponse {
    match ScanService::create_scan(state, payload).await {
        Ok(resp) => (StatusCode::CREATED, Json(resp)).into_response(),
        Err(ScanError::Validation(msg)) => ApiError(msg, StatusCode::BAD_REQUEST).into_response(),
        Err(e) => ApiError(e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response(),
    }
}

/// Get the current status of a scan job
#[utoipa::path(
    get,
    path = "/api/v1/scan/{job_id}/status",
    params(
        ("job_id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job status", body = JobStatusResponse),
        (status = 404, description = "Job not found")
    ),
    tag = "Scan"
)]
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> impl IntoResponse {
    match ScanService::get_status(&state, job_id) {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => ApiError(e.to_string(), StatusCode::NOT_FOUND).into_response(),
    }
}

/// Get the result of a scan job; usdzUrl is present once the job succeeded
#[utoipa::path(
    get,
    path = "/api/v1/scan/{job_id}/result",
    params(
        ("job_id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job result", body = JobResultResponse),
        (status = 404, description = "Job not found")
    ),
    tag = "Scan"
)]
pub async fn get_job_result(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> impl IntoResponse {
    match ScanService::get_result(&state, job_id) {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => ApiError(e.to_string(), StatusCode::NOT_FOUND).into_response(),
    }
}

/// Full job record for diagnostics
#[utoipa::path(
    get,
    path = "/api/v1/scan/{job_id}/info",
    params(
        ("job_id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job details", body = JobInfoResponse),
        (status = 404, description = "Job not found")
    ),
    tag = "Scan"
)]
pub async fn get_job_info(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> impl IntoResponse {
    match ScanService::get_info(&state, job_id) {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => ApiError(e.to_string(), StatusCode::NOT_FOUND).into_response(),
    }
}

/// Job counts per status
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    responses(
        (status = 200, description = "Job statistics", body = StatsResponse)
    ),
    tag = "Scan"
)]
pub async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(ScanService::stats(&state))).into_response()
}
