//! Per-resource on-disk state records
//!
//! Each resource directory carries JSON files recording the provider's
//! creation responses. Presence of a non-empty record is the idempotency
//! signal: the orchestrator skips the create call and reuses the cached
//! identifiers. Records are provider-defined JSON and are kept verbatim.

use crate::error::{CloudError, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

const POOL_STATE_FILE: &str = "pool_info.json";
const ROLE_STATE_FILE: &str = "role_info.json";
const TABLE_STATE_FILE: &str = "table_info.json";

/// Which resource's record a load/save targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    Pool,
    Role,
    Table,
}

impl StateKind {
    pub fn file_name(self) -> &'static str {
        match self {
            StateKind::Pool => POOL_STATE_FILE,
            StateKind::Role => ROLE_STATE_FILE,
            StateKind::Table => TABLE_STATE_FILE,
        }
    }
}

/// A stored creation response
///
/// The internal shape is provider-defined; callers project fields out of it
/// with [`StateRecord::field`].
#[derive(Debug, Clone, PartialEq)]
pub struct StateRecord(Value);

impl StateRecord {
    pub fn new(payload: Value) -> Self {
        Self(payload)
    }

    /// An empty record carries no identifiers and counts as absent.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Project a string field out of the record by JSON pointer
    /// (e.g. `/Role/Arn`).
    pub fn field(&self, pointer: &str) -> Result<&str> {
        self.0
            .pointer(pointer)
            .and_then(Value::as_str)
            .ok_or_else(|| CloudError::FieldNotFound {
                pointer: pointer.to_string(),
            })
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Reads and writes state records scoped to one resource directory
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, kind: StateKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Load a record, distinguishing absent from corrupt.
    ///
    /// A missing file, an empty file, and an empty record all load as
    /// `None`; absence is a valid, expected state. Content that exists but
    /// does not parse is an error, never absent.
    pub async fn load(&self, kind: StateKind) -> Result<Option<StateRecord>> {
        let path = self.path(kind);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No state file at {}", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let payload: Value =
            serde_json::from_str(&content).map_err(|e| CloudError::StateCorrupt {
                path: path.clone(),
                message: e.to_string(),
            })?;

        let record = StateRecord::new(payload);
        if record.is_empty() {
            return Ok(None);
        }

        tracing::debug!("Loaded state from {}", path.display());
        Ok(Some(record))
    }

    /// Persist a record. Subsequent loads for the same kind return it.
    pub async fn save(&self, kind: StateKind, record: &StateRecord) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).await?;
        }
        let path = self.path(kind);
        write_json(&path, record.as_value()).await?;
        tracing::debug!("Saved state to {}", path.display());
        Ok(())
    }
}

/// All-or-nothing JSON write: a temp file in the target directory is
/// renamed into place, so a crash mid-write cannot leave a half-written
/// file under the final name.
pub(crate) async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}
