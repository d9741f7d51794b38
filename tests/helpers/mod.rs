//! Test helpers: a scripted stand-in for the engine API, an in-memory
//! artifact store, and AppState construction with tight timings.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use scanforge::config::settings::AppConfig;
use scanforge::infrastructure::engine::client::EngineClient;
use scanforge::infrastructure::storage::ArtifactStore;
use scanforge::modules::scan::registry::JobRegistry;
use scanforge::state::AppState;

pub const SERIALIZE: &str = "ser-test";

/// Scripted engine: answers status queries from a queue of codes
/// (repeating the last one once the queue is down to a single entry)
/// and serves a canned model archive.
#[derive(Clone, Default)]
pub struct MockEngine {
    status_codes: Arc<Mutex<VecDeque<i32>>>,
    pub status_calls: Arc<AtomicU32>,
    fail_status: Arc<AtomicBool>,
    fail_submission: Arc<AtomicBool>,
    zip_bytes: Arc<Mutex<Vec<u8>>>,
    base_url: Arc<Mutex<String>>,
}

impl MockEngine {
    pub fn with_codes<I: IntoIterator<Item = i32>>(codes: I) -> Self {
        let engine = Self::default();
        *engine.status_codes.lock().unwrap() = codes.into_iter().collect();
        engine
    }

    pub fn set_zip(&self, bytes: Vec<u8>) {
        *self.zip_bytes.lock().unwrap() = bytes;
    }

    pub fn fail_status_queries(&self) {
        self.fail_status.store(true, Ordering::SeqCst);
    }

    pub fn fail_submissions(&self) {
        self.fail_submission.store(true, Ordering::SeqCst);
    }
}

async fn create_job(State(mock): State<MockEngine>) -> axum::response::Response {
    if mock.fail_submission.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "engine down").into_response();
    }
    Json(json!({
        "success": true,
        "message": "ok",
        "data": { "serialize": SERIALIZE }
    }))
    .into_response()
}

async fn get_status(State(mock): State<MockEngine>) -> axum::response::Response {
    mock.status_calls.fetch_add(1, Ordering::SeqCst);

    if mock.fail_status.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "engine unavailable").into_response();
    }

    let code = {
        let mut queue = mock.status_codes.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().copied().unwrap_or(0)
        }
    };

    Json(json!({
        "success": true,
        "message": "ok",
        "data": { "status": code }
    }))
    .into_response()
}

async fn get_model_zip(State(mock): State<MockEngine>) -> Json<Value> {
    let base = mock.base_url.lock().unwrap().clone();
    Json(json!({
        "success": true,
        "message": "ok",
        "data": { "modelUrl": format!("{base}/download/model.zip") }
    }))
}

async fn download_zip(State(mock): State<MockEngine>) -> Vec<u8> {
    mock.zip_bytes.lock().unwrap().clone()
}

async fn spawn_mock_engine(mock: MockEngine) -> String {
    let app = Router::new()
        .route("/api/v1/open/photo/video", post(create_job))
        .route("/api/v1/open/model/getStatus", get(get_status))
        .route("/api/v1/open/model/getModelZip", get(get_model_zip))
        .route("/download/model.zip", get(download_zip))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    *mock.base_url.lock().unwrap() = base.clone();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    base
}

/// Artifact store that keeps uploads in memory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub uploads: Arc<Mutex<Vec<(Uuid, Vec<u8>)>>>,
}

#[async_trait::async_trait]
impl ArtifactStore for MemoryStore {
    async fn persist(&self, path: &Path, job_id: Uuid) -> anyhow::Result<String> {
        let bytes = std::fs::read(path)?;
        self.uploads.lock().unwrap().push((job_id, bytes));
        Ok(format!("http://store.local/models/{}.usdz", job_id))
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server_port: 0,
        engine_base_url: String::new(),
        engine_api_key: "mock-api-key".to_string(),
        mock_engine: true,
        poll_timeout: Duration::from_secs(5),
        backoff_initial: Duration::from_millis(10),
        backoff_max: Duration::from_millis(40),
        job_max_age: Duration::from_secs(3600),
        eviction_interval: Duration::from_secs(60),
        s3_endpoint: "http://127.0.0.1:9000".to_string(),
        s3_bucket: "scan-models".to_string(),
        s3_access_key: "test".to_string(),
        s3_secret_key: "test".to_string(),
    }
}

pub async fn spawn_app(mock: MockEngine, mut config: AppConfig) -> (AppState, MemoryStore) {
    let base = spawn_mock_engine(mock).await;
    config.engine_base_url = base.clone();

    let engine = EngineClient::new(&base, &config.engine_api_key, true);
    let store = MemoryStore::default();
    let state = AppState::new(
        config,
        JobRegistry::new(),
        engine,
        Arc::new(store.clone()),
    );

    (state, store)
}

pub fn make_model_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buffer));
        let options = zip::write::FileOptions::default();
        for (name, data) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }
    buffer
}
