use thiserror::Error;

use crate::infrastructure::engine::client::EngineError;

#[derive(Debug, Error)]
pub enum ScanError {
    /// Bad input, rejected before any job exists.
    #[error("{0}")]
    Validation(String),
    #[error("failed to create engine job: {0}")]
    Submission(#[from] EngineError),
    #[error("Job not found")]
    NotFound,
}
