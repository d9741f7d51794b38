use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::dto::{
    JobInfoResponse, JobResultResponse, JobStatusResponse, ScanRequest, ScanResponse,
    StatsResponse,
};
use super::error::ScanError;
use super::model::JobStatus;
use crate::infrastructure::engine::client::CreateJobParams;
use crate::state::AppState;
use crate::workers::poller;

pub struct ScanService;

impl ScanService {
    /// Submit the video to the engine, register the job, and detach a
    /// poller that drives it to a terminal state.
    pub async fn create_scan(
        state: AppState,
        req: ScanRequest,
    ) -> Result<ScanResponse, ScanError> {
        req.validate()
            .map_err(|e| ScanError::Validation(e.to_string()))?;

        info!("Creating engine job for video: {}", req.video_url);

        let params = CreateJobParams {
            video_url: req.video_url,
            file_format: req.file_format,
            model_quality: req.model_quality,
            texture_quality: req.texture_quality,
            is_mask: req.is_mask,
            texture_smoothing: req.texture_smoothing,
            additional_params: req.additional_params,
        };
        let serialize = state.engine.create_job(&params).await?;

        let job_id = state.registry.create(&serialize);

        tokio::spawn(poller::poll_job(state.clone(), job_id, serialize));

        info!("Successfully created scan job: {}", job_id);

        Ok(ScanResponse {
            job_id,
            status: JobStatus::Queued,
        })
    }

    pub fn get_status(state: &AppState, job_id: Uuid) -> Result<JobStatusResponse, ScanError> {
        let job = state.registry.get(job_id).ok_or(ScanError::NotFound)?;
        Ok(job.into())
    }

    pub fn get_result(state: &AppState, job_id: Uuid) -> Result<JobResultResponse, ScanError> {
        let job = state.registry.get(job_id).ok_or(ScanError::NotFound)?;
        Ok(job.into())
    }

    pub fn get_info(state: &AppState, job_id: Uuid) -> Result<JobInfoResponse, ScanError> {
        let job = state.registry.get(job_id).ok_or(ScanError::NotFound)?;
        Ok(job.into())
    }

    pub fn stats(state: &AppState) -> StatsResponse {
        let jobs = state.registry.list_all();

        let mut status_counts: HashMap<String, usize> = HashMap::new();
        for job in &jobs {
            *status_counts
                .entry(job.status.as_str().to_string())
                .or_insert(0) += 1;
        }

        StatsResponse {
            total_jobs: jobs.len(),
            status_counts,
        }
    }
}
