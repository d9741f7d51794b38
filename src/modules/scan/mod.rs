use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};

pub mod dto;
pub mod error;
pub mod handler;
pub mod model;
pub mod registry;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scan", post(handler::create_scan))
        .route("/scan/{job_id}/status", get(handler::get_job_status))
        .route("/scan/{job_id}/result", get(handler::get_job_result))
        .route("/scan/{job_id}/info", get(handler::get_job_info))
        .route("/stats", get(handler::get_stats))
}
