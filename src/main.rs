use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;

use scanforge::config::settings::AppConfig;
use scanforge::infrastructure::engine::client::EngineClient;
use scanforge::infrastructure::storage::s3::S3ArtifactStore;
use scanforge::modules::scan::registry::JobRegistry;
use scanforge::state::AppState;
use scanforge::{app, workers};

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting server...");

    let config = AppConfig::new().expect("Failed to load configuration");

    let engine = EngineClient::new(
        &config.engine_base_url,
        &config.engine_api_key,
        config.mock_engine,
    );
    let storage = S3ArtifactStore::new(
        &config.s3_endpoint,
        &config.s3_bucket,
        &config.s3_access_key,
        &config.s3_secret_key,
    )
    .await;

    let state = AppState::new(
        config.clone(),
        JobRegistry::new(),
        engine,
        Arc::new(storage),
    );

    // Periodic sweep of old terminal jobs
    tokio::spawn(workers::eviction::start_eviction_worker(state.clone()));

    let app = app::create_app(state).await;

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await.unwrap();
}
