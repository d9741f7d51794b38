pub mod s3;

use async_trait::async_trait;
use std::path::Path;
use uuid::Uuid;

/// Durable store for finished model artifacts.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Upload the artifact at `path` and return its public URL.
    async fn persist(&self, path: &Path, job_id: Uuid) -> anyhow::Result<String>;
}
