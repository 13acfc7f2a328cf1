//! Provisioning error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the provisioning core
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Config file not found: {0}")]
    MissingConfig(PathBuf),

    #[error("State file is corrupt: {path}\nReason: {message}")]
    StateCorrupt { path: PathBuf, message: String },

    #[error("Field {pointer} not found in state record")]
    FieldNotFound { pointer: String },

    #[error("Unresolved dependency for {resource}: {detail}")]
    DependencyUnresolved { resource: String, detail: String },

    #[error("Operation {operation} failed for {resource}: {message}")]
    RemoteCall {
        operation: String,
        resource: String,
        message: String,
    },

    #[error("Invalid resource directory: {0}")]
    InvalidResourceDir(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;
