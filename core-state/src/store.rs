//! State persistence
//!
//! The `StateStore` seam keeps the manager independent of the storage
//! strategy. The file implementation writes the full document to a
//! temporary file in the same directory and renames it over the target, so
//! a crash mid-write can never leave a partial document behind.

use crate::error::{Result, StateError};
use crate::model::RootState;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Persistence seam for the durable root state
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the full aggregate; absent or unreadable documents yield the
    /// empty default (first run starts fresh)
    async fn load(&self) -> Result<RootState>;

    /// Persist the full aggregate; no partial write may ever be observable
    async fn save(&self, state: &RootState) -> Result<()>;
}

/// JSON-document store backed by a single local file
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self) -> Result<RootState> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No existing state found, starting fresh");
                return Ok(RootState::default());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&data) {
            Ok(state) => Ok(state),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "State document unreadable, starting fresh"
                );
                Ok(RootState::default())
            }
        }
    }

    async fn save(&self, state: &RootState) -> Result<()> {
        let json = serde_json::to_vec_pretty(state)
            .map_err(|e| StateError::Serialization(e.to_string()))?;

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{JobState, JobStatus};

    fn store_in(dir: &tempfile::TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("upload-state.json"))
    }

    #[tokio::test]
    async fn test_load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let state = store.load().await.unwrap();
        assert_eq!(state, RootState::default());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut state = RootState::default();
        state.jobs.insert(
            "item-1".to_string(),
            JobState {
                status: JobStatus::Uploaded,
                remote_video_id: Some("vid".to_string()),
                ..Default::default()
            },
        );
        state.quota.used_today = 1_600;

        store.save(&state).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut first = RootState::default();
        first.quota.used_today = 100;
        store.save(&first).await.unwrap();

        let mut second = RootState::default();
        second.quota.used_today = 200;
        store.save(&second).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.quota.used_today, 200);
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&RootState::default()).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("upload-state.json")]);
    }

    #[tokio::test]
    async fn test_corrupt_document_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload-state.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = JsonFileStore::new(&path);
        let state = store.load().await.unwrap();
        assert_eq!(state, RootState::default());
    }
}
