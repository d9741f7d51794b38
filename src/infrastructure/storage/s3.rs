use async_trait::async_trait;
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::{
    Client,
    config::{BehaviorVersion, Credentials, Region},
};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use super::ArtifactStore;

#[derive(Clone)]
pub struct S3ArtifactStore {
    client: Client,
    bucket: String,
    endpoint: String,
}

impl S3ArtifactStore {
    pub async fn new(endpoint: &str, bucket: &str, access_key: &str, secret_key: &str) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "static");

        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .endpoint_url(endpoint)
            .credentials_provider(credentials)
            .force_path_style(true) // Required for MinIO
            .build();

        let client = Client::from_conf(config);

        info!("Connected to S3 (MinIO)");

        Self {
            client,
            bucket: bucket.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn persist(&self, path: &Path, job_id: Uuid) -> anyhow::Result<String> {
        let key = format!("models/{}.usdz", job_id);

        let body = aws_sdk_s3::primitives::ByteStream::from_path(path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read artifact {}: {}", path.display(), e))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(body)
            .content_type("model/vnd.usdz+zip")
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to upload artifact: {}", e))?;

        info!("Uploaded artifact for job {} to {}/{}", job_id, self.bucket, key);
        Ok(format!("{}/{}/{}", self.endpoint, self.bucket, key))
    }
}
