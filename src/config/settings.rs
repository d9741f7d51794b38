use std::time::Duration;

use crate::config::env::{self, EnvKey};

/// Local stand-in engine used when `USE_MOCK_ENGINE` is enabled.
pub const MOCK_ENGINE_URL: &str = "http://127.0.0.1:8001";
pub const MOCK_ENGINE_API_KEY: &str = "mock-api-key";

const REAL_ENGINE_URL: &str = "https://api.kiriengine.app";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub engine_base_url: String,
    pub engine_api_key: String,
    pub mock_engine: bool,
    pub poll_timeout: Duration,
    pub backoff_initial: Duration,
    pub backoff_max: Duration,
    pub job_max_age: Duration,
    pub eviction_interval: Duration,
    pub s3_endpoint: String,
    pub s3_bucket: String,
    pub s3_access_key: String,
    pub s3_secret_key: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        let mock_engine = env::get_or(EnvKey::UseMockEngine, "true").to_lowercase() == "true";

        let (engine_base_url, engine_api_key) = if mock_engine {
            (MOCK_ENGINE_URL.to_string(), MOCK_ENGINE_API_KEY.to_string())
        } else {
            (
                env::get_or(EnvKey::EngineUrl, REAL_ENGINE_URL),
                env::get(EnvKey::EngineApiKey)?,
            )
        };

        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            engine_base_url,
            engine_api_key,
            mock_engine,
            poll_timeout: Duration::from_secs(
                env::get_parsed(EnvKey::PollTimeoutMinutes, 45u64) * 60,
            ),
            backoff_initial: Duration::from_secs(env::get_parsed(EnvKey::BackoffInitialSecs, 2u64)),
            backoff_max: Duration::from_secs(env::get_parsed(EnvKey::BackoffMaxSecs, 30u64)),
            job_max_age: Duration::from_secs(env::get_parsed(EnvKey::JobMaxAgeHours, 24u64) * 3600),
            eviction_interval: Duration::from_secs(
                env::get_parsed(EnvKey::EvictionIntervalMinutes, 60u64) * 60,
            ),
            s3_endpoint: env::get_or(EnvKey::MinioUrl, "http://127.0.0.1:9000"),
            s3_bucket: env::get_or(EnvKey::MinioBucket, "scan-models"),
            s3_access_key: env::get_or(EnvKey::MinioAccessKey, "minioadmin"),
            s3_secret_key: env::get_or(EnvKey::MinioSecretKey, "minioadmin"),
        })
    }
}
