use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Job lifecycle states, mirroring the engine's numeric status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Uploading,  // -1
    Processing, // 0
    Failed,     // 1
    Success,    // 2
    Queued,     // 3
    Expired,    // 4
}

impl JobStatus {
    /// Engine status code mapping. This table is part of the engine's API
    /// contract; unknown codes are treated as still processing, matching
    /// the engine's observed fallback behavior.
    pub fn from_engine_code(code: i32) -> Self {
        match code {
            -1 => JobStatus::Uploading,
            0 => JobStatus::Processing,
            1 => JobStatus::Failed,
            2 => JobStatus::Success,
            3 => JobStatus::Queued,
            4 => JobStatus::Expired,
            _ => JobStatus::Processing,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Success | JobStatus::Failed | JobStatus::Expired
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Uploading => "uploading",
            JobStatus::Processing => "processing",
            JobStatus::Failed => "failed",
            JobStatus::Success => "success",
            JobStatus::Queued => "queued",
            JobStatus::Expired => "expired",
        }
    }
}

/// One tracked conversion job. Owned exclusively by the registry;
/// everything outside works on clones.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub error: Option<String>,
    pub usdz_url: Option<String>,
    pub engine_serialize: String,
    pub created_at: OffsetDateTime,
}
