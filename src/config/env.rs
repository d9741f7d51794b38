use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    EngineUrl,
    EngineApiKey,
    UseMockEngine,
    PollTimeoutMinutes,
    BackoffInitialSecs,
    BackoffMaxSecs,
    JobMaxAgeHours,
    EvictionIntervalMinutes,
    MinioUrl,
    MinioBucket,
    MinioAccessKey,
    MinioSecretKey,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::EngineUrl => "KIRI_API_URL",
            EnvKey::EngineApiKey => "KIRI_API_KEY",
            EnvKey::UseMockEngine => "USE_MOCK_ENGINE",
            EnvKey::PollTimeoutMinutes => "POLL_TIMEOUT_MINUTES",
            EnvKey::BackoffInitialSecs => "BACKOFF_INITIAL_SECS",
            EnvKey::BackoffMaxSecs => "BACKOFF_MAX_SECS",
            EnvKey::JobMaxAgeHours => "JOB_MAX_AGE_HOURS",
            EnvKey::EvictionIntervalMinutes => "EVICTION_INTERVAL_MINUTES",
            EnvKey::MinioUrl => "MINIO_ENDPOINT",
            EnvKey::MinioBucket => "MINIO_BUCKET_MODELS",
            EnvKey::MinioAccessKey => "AWS_ACCESS_KEY_ID",
            EnvKey::MinioSecretKey => "AWS_SECRET_ACCESS_KEY",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
