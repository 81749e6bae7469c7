//! State manager
//!
//! Owns the in-memory aggregate and the store, and enforces the crash-safety
//! discipline: every mutation rewrites the whole document before the call
//! returns. A process killed between calls resumes at the last durable
//! status.

use crate::error::Result;
use crate::model::{CollectionState, JobState, JobStatus, RootState};
use crate::store::StateStore;
use chrono::Utc;
use core_quota::QuotaState;
use std::sync::Arc;
use tracing::debug;

pub struct StateManager {
    root: RootState,
    store: Arc<dyn StateStore>,
}

impl StateManager {
    /// Load the full aggregate from the store
    pub async fn load(store: Arc<dyn StateStore>) -> Result<Self> {
        let root = store.load().await?;
        Ok(Self { root, store })
    }

    pub fn root(&self) -> &RootState {
        &self.root
    }

    /// Per-item state; an absent entry reads as the pending default
    pub fn job(&self, id: &str) -> JobState {
        self.root.jobs.get(id).cloned().unwrap_or_default()
    }

    pub fn collection(&self, id: &str) -> Option<&CollectionState> {
        self.root.collections.get(id)
    }

    pub fn quota(&self) -> &QuotaState {
        &self.root.quota
    }

    /// Stamp the aggregate and rewrite it through the store
    async fn flush(&mut self) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        if self.root.started_at.is_none() {
            self.root.started_at = Some(now.clone());
        }
        self.root.updated_at = Some(now);
        self.store.save(&self.root).await
    }

    /// Mutate one job entry (created on first touch) and flush
    pub async fn update_job<F>(&mut self, id: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut JobState),
    {
        let entry = self.root.jobs.entry(id.to_string()).or_default();
        f(entry);
        debug!(item_id = %id, status = %entry.status, "Job state updated");
        self.flush().await
    }

    /// Insert or replace one collection entry and flush
    pub async fn set_collection(&mut self, id: &str, state: CollectionState) -> Result<()> {
        self.root.collections.insert(id.to_string(), state);
        self.flush().await
    }

    /// Mutate an existing collection entry and flush; absent ids are a no-op
    pub async fn update_collection<F>(&mut self, id: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut CollectionState),
    {
        match self.root.collections.get_mut(id) {
            Some(entry) => {
                f(entry);
                self.flush().await
            }
            None => Ok(()),
        }
    }

    /// Mutate the quota counters and flush
    pub async fn update_quota<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut QuotaState),
    {
        f(&mut self.root.quota);
        self.flush().await
    }

    /// `pending → uploading`, stamping the start time
    pub async fn mark_uploading(&mut self, id: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.update_job(id, |job| {
            job.status = JobStatus::Uploading;
            job.started_at = Some(now);
        })
        .await
    }

    /// `uploading → uploaded`, recording the remote identity
    pub async fn mark_uploaded(&mut self, id: &str, video_id: &str, url: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let (video_id, url) = (video_id.to_string(), url.to_string());
        self.update_job(id, |job| {
            job.status = JobStatus::Uploaded;
            job.remote_video_id = Some(video_id);
            job.remote_url = Some(url);
            job.uploaded_at = Some(now);
        })
        .await
    }

    /// `uploaded → complete`, with the sub-step outcome flags
    pub async fn mark_complete(
        &mut self,
        id: &str,
        thumbnail_uploaded: bool,
        added_to_collection: bool,
    ) -> Result<()> {
        self.update_job(id, |job| {
            job.status = JobStatus::Complete;
            job.thumbnail_uploaded = thumbnail_uploaded;
            job.added_to_collection = added_to_collection;
        })
        .await
    }

    /// Terminal failure for this run, with the error message
    pub async fn mark_failed(&mut self, id: &str, error: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let error = error.to_string();
        self.update_job(id, |job| {
            job.status = JobStatus::Failed;
            job.error = Some(error);
            job.failed_at = Some(now);
        })
        .await
    }
}
