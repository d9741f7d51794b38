use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::infrastructure::engine::client::EngineClient;
use crate::infrastructure::storage::ArtifactStore;
use crate::modules::scan::registry::JobRegistry;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub registry: JobRegistry,
    pub engine: EngineClient,
    pub storage: Arc<dyn ArtifactStore>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        registry: JobRegistry,
        engine: EngineClient,
        storage: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            config,
            registry,
            engine,
            storage,
        }
    }
}
