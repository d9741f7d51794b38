use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{error, info};
use uuid::Uuid;

use crate::common::retry::retry_with_backoff;
use crate::infrastructure::engine::client::EngineError;
use crate::modules::scan::model::JobStatus;
use crate::state::AppState;

const ZIP_LOOKUP_RETRIES: u32 = 3;
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);
const ARTIFACT_EXTENSION: &str = ".usdz";

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("failed to get model zip URL from engine: {0}")]
    ResultLookup(EngineError),
    #[error("failed to download model archive: {0}")]
    Download(String),
    #[error("no {ARTIFACT_EXTENSION} artifact found in model archive")]
    ArtifactNotFound,
    #[error("failed to persist artifact: {0}")]
    Persist(String),
    #[error("invalid model archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Materialize the result of a job the engine reports as successful:
/// download the archive, pull out the USDZ, persist it, and make the
/// final registry write (SUCCESS with the URL, or FAILED).
pub async fn process_job_completion(state: &AppState, job_id: Uuid, serialize: &str) {
    info!("Processing completion for job {}", job_id);

    match materialize_result(state, job_id, serialize).await {
        Ok(url) => {
            state
                .registry
                .update_status(job_id, JobStatus::Success, None, Some(url.clone()));
            info!("Job {} completed successfully with USDZ URL: {}", job_id, url);
        }
        Err(e) => {
            let msg = format!("Error processing job completion: {}", e);
            error!("Job {}: {}", job_id, msg);
            state
                .registry
                .update_status(job_id, JobStatus::Failed, Some(msg), None);
        }
    }
}

async fn materialize_result(
    state: &AppState,
    job_id: Uuid,
    serialize: &str,
) -> Result<String, CompletionError> {
    let engine = state.engine.clone();
    let model_url = retry_with_backoff(
        || engine.get_model_zip(serialize),
        ZIP_LOOKUP_RETRIES,
        state.config.backoff_initial,
        state.config.backoff_max,
    )
    .await
    .map_err(CompletionError::ResultLookup)?;

    info!("Got model URL for job {}", job_id);

    // Removed on drop, on every exit path below. The job id in the prefix
    // ties any leftover directory to its job.
    let temp_dir = TempDir::with_prefix(format!("scan_processing_{job_id}_"))?;
    let zip_path = temp_dir.path().join(format!("{}.zip", job_id));

    download_file(&model_url, &zip_path, DOWNLOAD_TIMEOUT).await?;

    let usdz_path = extract_artifact(&zip_path, temp_dir.path())?;

    state
        .storage
        .persist(&usdz_path, job_id)
        .await
        .map_err(|e| CompletionError::Persist(e.to_string()))
}

/// Stream a remote file to `dest`.
async fn download_file(url: &str, dest: &Path, timeout: Duration) -> Result<(), CompletionError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CompletionError::Download(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| CompletionError::Download(e.to_string()))?;

    if !response.status().is_success() {
        return Err(CompletionError::Download(format!(
            "HTTP {}",
            response.status()
        )));
    }

    let mut file = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| CompletionError::Download(e.to_string()))?;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    info!("Successfully downloaded file: {}", dest.display());
    Ok(())
}

/// Pull the first USDZ entry out of the archive. Entries nested in
/// sub-directories are flattened to the top of `dest_dir`.
fn extract_artifact(zip_path: &Path, dest_dir: &Path) -> Result<PathBuf, CompletionError> {
    let file = std::fs::File::open(zip_path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if !entry.name().to_lowercase().ends_with(ARTIFACT_EXTENSION) {
            continue;
        }

        let file_name = Path::new(entry.name())
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("model.usdz")
            .to_string();
        let out_path = dest_dir.join(file_name);

        let mut out = std::fs::File::create(&out_path)?;
        std::io::copy(&mut entry, &mut out)?;

        info!("Extracted artifact to {}", out_path.display());
        return Ok(out_path);
    }

    Err(CompletionError::ArtifactNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = std::fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = FileOptions::default();
        for (name, data) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn extracts_top_level_artifact() {
        let dir = TempDir::new().unwrap();
        let zip_path = dir.path().join("model.zip");
        write_zip(&zip_path, &[("model.usdz", b"usdz-bytes")]);

        let out = extract_artifact(&zip_path, dir.path()).unwrap();
        assert_eq!(out, dir.path().join("model.usdz"));
        assert_eq!(std::fs::read(out).unwrap(), b"usdz-bytes");
    }

    #[test]
    fn flattens_nested_artifact_and_matches_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let zip_path = dir.path().join("model.zip");
        write_zip(
            &zip_path,
            &[
                ("textures/diffuse.png", b"png".as_ref()),
                ("export/Scene.USDZ", b"usdz-bytes".as_ref()),
            ],
        );

        let out = extract_artifact(&zip_path, dir.path()).unwrap();
        assert_eq!(out, dir.path().join("Scene.USDZ"));
        assert_eq!(std::fs::read(out).unwrap(), b"usdz-bytes");
    }

    #[test]
    fn missing_artifact_is_an_error() {
        let dir = TempDir::new().unwrap();
        let zip_path = dir.path().join("model.zip");
        write_zip(&zip_path, &[("readme.txt", b"nothing here")]);

        let err = extract_artifact(&zip_path, dir.path()).unwrap_err();
        assert!(matches!(err, CompletionError::ArtifactNotFound));
    }

    #[test]
    fn corrupt_archive_is_an_error() {
        let dir = TempDir::new().unwrap();
        let zip_path = dir.path().join("model.zip");
        std::fs::write(&zip_path, b"not a zip").unwrap();

        let err = extract_artifact(&zip_path, dir.path()).unwrap_err();
        assert!(matches!(err, CompletionError::Archive(_)));
    }
}
