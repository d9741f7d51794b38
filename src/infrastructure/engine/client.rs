use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One variant per engine operation so retry logging says which call failed.
/// All of them are transient from the caller's point of view.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("job submission failed: {0}")]
    Submission(String),
    #[error("status query failed: {0}")]
    StatusQuery(String),
    #[error("model zip lookup failed: {0}")]
    ResultLookup(String),
}

/// Envelope shared by every engine API response.
#[derive(Debug, Deserialize)]
struct EngineResponse {
    #[serde(default)]
    data: serde_json::Value,
    #[serde(default)]
    message: String,
    success: bool,
}

#[derive(Debug, Clone)]
pub struct CreateJobParams {
    pub video_url: String,
    pub file_format: String,
    pub model_quality: u8,
    pub texture_quality: u8,
    pub is_mask: u8,
    pub texture_smoothing: u8,
    pub additional_params: HashMap<String, String>,
}

/// Thin adapter over the KIRI Engine photo/video API. Retry-unaware;
/// callers wrap these operations in `retry_with_backoff` as needed.
#[derive(Clone)]
pub struct EngineClient {
    http: Client,
    base_url: String,
    api_key: String,
    mock: bool,
}

impl EngineClient {
    pub fn new(base_url: &str, api_key: &str, mock: bool) -> Self {
        if mock {
            info!("Engine client running in MOCK mode - no real API calls will be made");
        } else {
            info!("Engine client running in REAL mode against {}", base_url);
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            mock,
        }
    }

    /// Submit a video for reconstruction. Returns the engine's `serialize`
    /// token used to correlate all follow-up calls.
    pub async fn create_job(&self, params: &CreateJobParams) -> Result<String, EngineError> {
        let url = format!("{}/api/v1/open/photo/video", self.base_url);

        let mut form: HashMap<String, String> = HashMap::from([
            ("videoUrl".to_string(), params.video_url.clone()),
            ("fileFormat".to_string(), params.file_format.clone()),
            ("modelQuality".to_string(), params.model_quality.to_string()),
            (
                "textureQuality".to_string(),
                params.texture_quality.to_string(),
            ),
            ("isMask".to_string(), params.is_mask.to_string()),
            (
                "textureSmoothing".to_string(),
                params.texture_smoothing.to_string(),
            ),
        ]);
        form.extend(params.additional_params.clone());

        let mut request = self.http.post(&url).form(&form);
        // The local stand-in engine takes no credentials
        if !self.mock {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EngineError::Submission(e.to_string()))?;
        let envelope = read_envelope(response)
            .await
            .map_err(EngineError::Submission)?;

        if !envelope.success {
            return Err(EngineError::Submission(envelope.message));
        }

        let serialize = envelope
            .data
            .get("serialize")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                EngineError::Submission("missing serialize parameter in response".to_string())
            })?;

        info!("Successfully created engine job: {}", serialize);
        Ok(serialize.to_string())
    }

    /// Current engine-side status code for a job.
    pub async fn get_status(&self, serialize: &str) -> Result<i32, EngineError> {
        let url = format!("{}/api/v1/open/model/getStatus", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[("serialize", serialize)])
            .send()
            .await
            .map_err(|e| EngineError::StatusQuery(e.to_string()))?;
        let envelope = read_envelope(response)
            .await
            .map_err(EngineError::StatusQuery)?;

        if !envelope.success {
            return Err(EngineError::StatusQuery(envelope.message));
        }

        let status = envelope
            .data
            .get("status")
            .and_then(|v| v.as_i64())
            .ok_or_else(|| EngineError::StatusQuery("missing status field".to_string()))?;

        debug!("Engine status for {}: {}", serialize, status);
        Ok(status as i32)
    }

    /// Download location of the finished model archive.
    pub async fn get_model_zip(&self, serialize: &str) -> Result<String, EngineError> {
        let url = format!("{}/api/v1/open/model/getModelZip", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[("serialize", serialize)])
            .send()
            .await
            .map_err(|e| EngineError::ResultLookup(e.to_string()))?;
        let envelope = read_envelope(response)
            .await
            .map_err(EngineError::ResultLookup)?;

        if !envelope.success {
            return Err(EngineError::ResultLookup(envelope.message));
        }

        let model_url = envelope
            .data
            .get("modelUrl")
            .and_then(|v| v.as_str())
            .ok_or_else(|| EngineError::ResultLookup("missing modelUrl field".to_string()))?;

        info!("Got model zip URL for {}", serialize);
        Ok(model_url.to_string())
    }
}

async fn read_envelope(response: reqwest::Response) -> Result<EngineResponse, String> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(format!("HTTP {status}: {text}"));
    }
    response
        .json::<EngineResponse>()
        .await
        .map_err(|e| e.to_string())
}
