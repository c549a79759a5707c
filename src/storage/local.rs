//! Local filesystem storage implementation.
//!
//! Stores the snapshot as a small JSON file. Writes go to a sibling temp
//! file that is renamed into place, so a failed write leaves the previous
//! snapshot intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::StockState;
use crate::storage::StateStore;

/// JSON file snapshot store.
#[derive(Debug, Clone)]
pub struct LocalStateStore {
    path: PathBuf,
}

impl LocalStateStore {
    /// Create a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read and parse the snapshot, surfacing every failure.
    async fn try_load(&self) -> Result<Option<StockState>> {
        match self.read_bytes().await? {
            Some(bytes) => {
                let value: Value = serde_json::from_slice(&bytes)?;
                StockState::from_json(&value)
                    .map(Some)
                    .ok_or_else(|| AppError::validation("snapshot is not a JSON object"))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl StateStore for LocalStateStore {
    async fn load(&self) -> StockState {
        match self.try_load().await {
            Ok(Some(state)) => state,
            Ok(None) => {
                log::debug!("No snapshot at {}", self.path.display());
                StockState::default()
            }
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable snapshot {}: {}",
                    self.path.display(),
                    e
                );
                StockState::default()
            }
        }
    }

    async fn save(&self, state: &StockState) -> Result<()> {
        let bytes = serde_json::to_vec(state)?;
        self.write_bytes(&bytes).await?;
        log::debug!("Snapshot written to {}", self.path.display());
        Ok(())
    }
}
