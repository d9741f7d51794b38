use std::time::Instant;
use tokio::time::sleep;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::common::backoff::ExponentialBackoff;
use crate::common::retry::retry_with_backoff;
use crate::modules::scan::model::JobStatus;
use crate::state::AppState;
use crate::workers::completion;

const STATUS_QUERY_RETRIES: u32 = 3;

/// Drive one submitted job to a terminal state by polling the engine.
/// Runs detached from the request cycle; every failure ends up as a FAILED
/// write into the registry, nothing propagates out of the task.
pub async fn poll_job(state: AppState, job_id: Uuid, serialize: String) {
    info!("Starting polling for job {}", job_id);

    let mut backoff = ExponentialBackoff::new(state.config.backoff_initial, state.config.backoff_max);
    let started = Instant::now();

    loop {
        if started.elapsed() > state.config.poll_timeout {
            let msg = format!(
                "Job polling timed out after {} seconds",
                state.config.poll_timeout.as_secs()
            );
            error!("Job {}: {}", job_id, msg);
            state
                .registry
                .update_status(job_id, JobStatus::Failed, Some(msg), None);
            return;
        }

        let engine = state.engine.clone();
        let code = match retry_with_backoff(
            || engine.get_status(&serialize),
            STATUS_QUERY_RETRIES,
            state.config.backoff_initial,
            state.config.backoff_max,
        )
        .await
        {
            Ok(code) => code,
            Err(e) => {
                let msg = format!("Failed to get job status from engine: {}", e);
                error!("Job {}: {}", job_id, msg);
                state
                    .registry
                    .update_status(job_id, JobStatus::Failed, Some(msg), None);
                return;
            }
        };

        let status = JobStatus::from_engine_code(code);
        info!("Job {} status: {} (engine code: {})", job_id, status.as_str(), code);

        match status {
            JobStatus::Success => {
                // The completion processor makes the final write, so a
                // SUCCESS status is never visible without its result URL.
                info!("Job {} completed on engine side, processing result...", job_id);
                completion::process_job_completion(&state, job_id, &serialize).await;
                return;
            }
            JobStatus::Failed | JobStatus::Expired => {
                let msg = format!("Job failed with engine status: {}", status.as_str());
                error!("Job {}: {}", job_id, msg);
                state.registry.update_status(job_id, status, Some(msg), None);
                return;
            }
            _ => {
                state.registry.update_status(job_id, status, None, None);
                let delay = backoff.next_delay();
                debug!(
                    "Job {} still processing, waiting {:.2}s...",
                    job_id,
                    delay.as_secs_f64()
                );
                sleep(delay).await;
            }
        }
    }
}
