//! AWS adapter error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("aws CLI not found. Please install the AWS CLI and ensure it is on PATH")]
    CliNotFound,

    #[error("aws command failed: {0}")]
    CommandFailed(String),

    #[error("aws command timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AwsError>;
