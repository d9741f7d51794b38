use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::OffsetDateTime;
use url::Url;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::model::{JobRecord, JobStatus};

const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mov", "avi", "mkv", "webm"];

fn default_file_format() -> String {
    "usdz".to_string()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    #[validate(custom(function = validate_video_url))]
    pub video_url: String,
    #[serde(default = "default_file_format")]
    pub file_format: String,
    /// 0=High, 1=Medium, 2=Low, 3=Ultra
    #[serde(default)]
    #[validate(range(max = 3, message = "modelQuality must be 0-3"))]
    pub model_quality: u8,
    /// 0=4K, 1=2K, 2=1K, 3=8K
    #[serde(default)]
    #[validate(range(max = 3, message = "textureQuality must be 0-3"))]
    pub texture_quality: u8,
    /// Auto object masking (0=Off, 1=On)
    #[serde(default)]
    #[validate(range(max = 1, message = "isMask must be 0 or 1"))]
    pub is_mask: u8,
    /// Texture smoothing (0=Off, 1=On)
    #[serde(default)]
    #[validate(range(max = 1, message = "textureSmoothing must be 0 or 1"))]
    pub texture_smoothing: u8,
    #[serde(default)]
    pub additional_params: HashMap<String, String>,
}

fn invalid_url() -> ValidationError {
    let mut err = ValidationError::new("invalid_video_url");
    err.message = Some("Invalid video URL format".into());
    err
}

/// The engine only accepts http(s) URLs pointing at a known video container.
fn validate_video_url(url: &str) -> Result<(), ValidationError> {
    let parsed = Url::parse(url).map_err(|_| invalid_url())?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid_url());
    }

    let has_video_extension = parsed
        .path()
        .rsplit('.')
        .next()
        .map(|ext| {
            let ext = ext.to_lowercase();
            VIDEO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false);

    if !has_video_extension {
        return Err(invalid_url());
    }

    Ok(())
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<JobRecord> for JobStatusResponse {
    fn from(job: JobRecord) -> Self {
        Self {
            job_id: job.job_id,
            status: job.status,
            error: job.error,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobResultResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usdz_url: Option<String>,
}

impl From<JobRecord> for JobResultResponse {
    fn from(job: JobRecord) -> Self {
        // usdz_url is only ever set on success, but keep the gate explicit
        let usdz_url = if job.status == JobStatus::Success {
            job.usdz_url
        } else {
            None
        };
        Self {
            job_id: job.job_id,
            status: job.status,
            usdz_url,
        }
    }
}

/// Full internal record dump for diagnostics.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobInfoResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub error: Option<String>,
    pub usdz_url: Option<String>,
    pub engine_serialize: String,
    #[serde(with = "time::serde::iso8601")]
    pub created_at: OffsetDateTime,
}

impl From<JobRecord> for JobInfoResponse {
    fn from(job: JobRecord) -> Self {
        Self {
            job_id: job.job_id,
            status: job.status,
            error: job.error,
            usdz_url: job.usdz_url,
            engine_serialize: job.engine_serialize,
            created_at: job.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub total_jobs: usize,
    pub status_counts: HashMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_video_urls() {
        for url in [
            "http://example.com/video.mp4",
            "https://example.com/clips/scan.MOV",
            "https://cdn.example.com/a/b/c.webm?token=abc",
        ] {
            assert!(validate_video_url(url).is_ok(), "rejected {url}");
        }
    }

    #[test]
    fn rejects_bad_schemes_and_extensions() {
        for url in [
            "ftp://example.com/video.mp4",
            "file:///tmp/video.mp4",
            "https://example.com/model.usdz",
            "https://example.com/video",
            "not a url",
            "",
        ] {
            assert!(validate_video_url(url).is_err(), "accepted {url}");
        }
    }

    #[test]
    fn scan_request_defaults_apply() {
        let req: ScanRequest =
            serde_json::from_str(r#"{"videoUrl": "https://example.com/v.mp4"}"#).unwrap();
        assert_eq!(req.file_format, "usdz");
        assert_eq!(req.model_quality, 0);
        assert_eq!(req.texture_quality, 0);
        assert_eq!(req.is_mask, 0);
        assert_eq!(req.texture_smoothing, 0);
        assert!(req.additional_params.is_empty());
    }

    #[test]
    fn rejects_out_of_range_quality_values() {
        for body in [
            r#"{"videoUrl": "https://example.com/v.mp4", "modelQuality": 9}"#,
            r#"{"videoUrl": "https://example.com/v.mp4", "textureQuality": 4}"#,
            r#"{"videoUrl": "https://example.com/v.mp4", "isMask": 2}"#,
            r#"{"videoUrl": "https://example.com/v.mp4", "textureSmoothing": 2}"#,
        ] {
            let req: ScanRequest = serde_json::from_str(body).unwrap();
            assert!(req.validate().is_err(), "accepted {body}");
        }
    }

    #[test]
    fn accepts_quality_values_at_domain_bounds() {
        let req: ScanRequest = serde_json::from_str(
            r#"{
                "videoUrl": "https://example.com/v.mp4",
                "modelQuality": 3,
                "textureQuality": 3,
                "isMask": 1,
                "textureSmoothing": 1
            }"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn result_response_hides_url_unless_success() {
        let job = JobRecord {
            job_id: Uuid::new_v4(),
            status: JobStatus::Processing,
            error: None,
            usdz_url: Some("http://leak".to_string()),
            engine_serialize: "ser".to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        let resp = JobResultResponse::from(job);
        assert!(resp.usdz_url.is_none());
    }
}
