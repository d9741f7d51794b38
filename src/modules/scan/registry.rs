use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::model::{JobRecord, JobStatus};

/// In-memory registry of scan jobs. Cheap to clone; all clones share the
/// same underlying map. State is process-local and lost on restart.
#[derive(Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<Mutex<HashMap<Uuid, JobRecord>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly submitted job. The returned id is unique for the
    /// lifetime of the process and the record starts out `Queued`.
    pub fn create(&self, engine_serialize: &str) -> Uuid {
        let job_id = Uuid::new_v4();
        let record = JobRecord {
            job_id,
            status: JobStatus::Queued,
            error: None,
            usdz_url: None,
            engine_serialize: engine_serialize.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };

        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(job_id, record);

        info!("Created new job: {}", job_id);
        job_id
    }

    pub fn get(&self, job_id: Uuid) -> Option<JobRecord> {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&job_id)
            .cloned()
    }

    /// Update a job's status and related fields. Returns false when the job
    /// is unknown; entries are never created here.
    pub fn update_status(
        &self,
        job_id: Uuid,
        status: JobStatus,
        error: Option<String>,
        usdz_url: Option<String>,
    ) -> bool {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(job) = jobs.get_mut(&job_id) else {
            warn!("Job not found for status update: {}", job_id);
            return false;
        };

        job.status = status;
        if let Some(error) = error {
            job.error = Some(error);
        }
        if let Some(url) = usdz_url {
            job.usdz_url = Some(url);
        }

        info!("Updated job {} status to {}", job_id, status.as_str());
        true
    }

    /// Snapshot of every record, taken under the lock.
    pub fn list_all(&self) -> Vec<JobRecord> {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    pub fn count(&self) -> usize {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Remove terminal jobs older than `max_age`. Jobs still in flight are
    /// kept regardless of age; their poller may yet write to them.
    pub fn evict_older_than(&self, max_age: Duration) -> usize {
        let cutoff = OffsetDateTime::now_utc() - max_age;
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);

        let before = jobs.len();
        jobs.retain(|_, job| !(job.status.is_terminal() && job.created_at < cutoff));
        before - jobs.len()
    }
}
