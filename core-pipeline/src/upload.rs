//! Upload pipeline
//!
//! Per-item state machine `pending → uploading → uploaded → complete`
//! (`failed` when the primary upload errors out), driven by an outer loop
//! that gates on the quota ledger and flushes durable state at every
//! transition.

use crate::error::{PipelineError, Result};
use crate::retry::with_retry;
use core_manifest::{
    build_video_metadata, thumbnail_filename, LibraryEntry, ManifestItem, MetadataOptions,
};
use core_quota::{
    can_afford, can_upload_more, charge, time_until_reset, DAILY_QUOTA, PLAYLIST_ITEM_COST,
    THUMBNAIL_COST, UPLOAD_COST, VIDEO_TOTAL_COST,
};
use core_state::{JobStatus, StateManager};
use platform_traits::{AssetSource, ProgressCallback, VideoPlatform};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Named durations of the scheduling loop
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Pause between items, to stay inside remote rate expectations
    pub inter_item_delay: Duration,
    /// Safety margin added to the computed quota-reset wait
    pub quota_wait_margin: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            inter_item_delay: Duration::from_secs(5),
            quota_wait_margin: Duration::from_secs(60),
        }
    }
}

/// Aggregate outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub uploaded: u64,
    pub errors: u64,
}

/// Outcome of a `retry_collection_adds` pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySummary {
    pub attempted: u64,
    pub succeeded: u64,
}

/// One would-be-processed item in a dry run
#[derive(Debug, Clone)]
pub struct DryRunEntry {
    pub id: String,
    pub title: String,
    pub status: JobStatus,
    pub date: String,
    pub video: String,
    pub thumbnail: Option<String>,
    pub series: Option<String>,
    pub speaker: Option<String>,
}

/// Dry-run outcome: what a real run would pick up, and why
#[derive(Debug, Clone)]
pub struct DryRunReport {
    pub pending: u64,
    pub completed: u64,
    pub failed: u64,
    pub estimated_days: u64,
    pub entries: Vec<DryRunEntry>,
}

/// The top-level pipeline driver.
///
/// Collaborators are injected at construction; the uploader owns the state
/// manager for the duration of the run and is the only mutator of job
/// state.
pub struct Uploader {
    platform: Arc<dyn VideoPlatform>,
    assets: Arc<dyn AssetSource>,
    state: StateManager,
    items: Vec<ManifestItem>,
    library: HashMap<String, LibraryEntry>,
    metadata_options: MetadataOptions,
    config: PipelineConfig,
}

impl Uploader {
    pub fn new(
        platform: Arc<dyn VideoPlatform>,
        assets: Arc<dyn AssetSource>,
        state: StateManager,
        items: Vec<ManifestItem>,
        library: HashMap<String, LibraryEntry>,
        metadata_options: MetadataOptions,
        config: PipelineConfig,
    ) -> Self {
        Self {
            platform,
            assets,
            state,
            items,
            library,
            metadata_options,
            config,
        }
    }

    /// Hand the state manager back (for status/report generation after a run)
    pub fn into_state(self) -> StateManager {
        self.state
    }

    fn select_items(&self, single_item: Option<&str>) -> Result<Vec<ManifestItem>> {
        match single_item {
            None => Ok(self.items.clone()),
            Some(id) => {
                let selected: Vec<ManifestItem> =
                    self.items.iter().filter(|i| i.id == id).cloned().collect();
                if selected.is_empty() {
                    return Err(PipelineError::ItemNotFound(id.to_string()));
                }
                Ok(selected)
            }
        }
    }

    /// Process the queue until nothing is left pending, sleeping through
    /// quota-exhaustion windows. One item's failure never stops the batch.
    pub async fn run(&mut self, single_item: Option<&str>) -> Result<RunSummary> {
        let items = self.select_items(single_item)?;
        let mut uploaded: u64 = 0;
        let mut errors: u64 = 0;

        loop {
            let next = items
                .iter()
                .find(|i| self.state.job(&i.id).status.is_processable())
                .cloned();
            let Some(item) = next else {
                info!(uploaded, errors, "All videos processed");
                break;
            };

            let mut can_upload = false;
            self.state
                .update_quota(|q| can_upload = can_upload_more(q))
                .await?;
            if !can_upload {
                let wait = time_until_reset().to_std().unwrap_or_default()
                    + self.config.quota_wait_margin;
                info!(
                    quota_used = self.state.quota().used_today,
                    hours_until_reset = wait.as_secs_f64() / 3600.0,
                    "Daily quota exhausted, sleeping until reset"
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            match self.process_item(&item).await {
                Ok(()) => uploaded += 1,
                Err(e) => {
                    errors += 1;
                    error!(
                        item_id = %item.id,
                        title = %item.title,
                        error = %e,
                        "Upload failed"
                    );
                    self.state.mark_failed(&item.id, &e.to_string()).await?;
                }
            }

            tokio::time::sleep(self.config.inter_item_delay).await;
        }

        Ok(RunSummary { uploaded, errors })
    }

    /// Ordered sub-steps for one item. The primary upload is the only step
    /// allowed to fail the item; thumbnail and collection membership are
    /// isolated to their flags.
    async fn process_item(&mut self, item: &ManifestItem) -> Result<()> {
        let existing = self.state.job(&item.id);
        let video_id = match (existing.status, existing.remote_video_id) {
            (JobStatus::Uploaded, Some(id)) => {
                info!(
                    item_id = %item.id,
                    video_id = %id,
                    "Primary asset already uploaded, finishing remaining steps"
                );
                id
            }
            _ => self.upload_primary(item).await?,
        };

        let thumbnail_uploaded = self.try_set_thumbnail(item, &video_id).await;
        let added_to_collection = self.try_add_to_collection(item, &video_id).await;

        self.state
            .mark_complete(&item.id, thumbnail_uploaded, added_to_collection)
            .await?;
        Ok(())
    }

    /// Stream the primary asset to the platform through the retry executor.
    ///
    /// Each retry attempt restarts the transfer with a freshly fetched
    /// stream; there is no transport-level resume. The initial fetch happens
    /// outside the executor — asset-source failures are item-fatal, not
    /// retried.
    async fn upload_primary(&mut self, item: &ManifestItem) -> Result<String> {
        info!(
            id = %item.id,
            title = %item.title,
            video = %item.video_filename,
            "Starting upload"
        );
        self.state.mark_uploading(&item.id).await?;

        let metadata = build_video_metadata(
            item,
            self.library.get(&item.id),
            &self.metadata_options,
        );

        let first = self
            .assets
            .fetch_stream(&item.folder, &item.video_filename)
            .await?;
        info!(title = %item.title, size = %format_bytes(first.size), "Uploading video");

        let platform = Arc::clone(&self.platform);
        let assets = Arc::clone(&self.assets);
        let folder = item.folder.clone();
        let filename = item.video_filename.clone();
        let title = item.title.clone();
        let mut reuse = Some(first);

        let video_id = with_retry(
            || {
                let reused = reuse.take();
                let platform = Arc::clone(&platform);
                let assets = Arc::clone(&assets);
                let metadata = metadata.clone();
                let folder = folder.clone();
                let filename = filename.clone();
                let title = title.clone();
                async move {
                    let asset = match reused {
                        Some(asset) => asset,
                        None => assets.fetch_stream(&folder, &filename).await?,
                    };
                    let size = asset.size;
                    let progress: ProgressCallback = Box::new(move |sent, total| {
                        let percent = if total > 0 {
                            sent as f64 * 100.0 / total as f64
                        } else {
                            0.0
                        };
                        debug!(title = %title, percent, sent, total, "Upload progress");
                    });
                    platform
                        .upload_video(&metadata, asset.stream, size, Some(progress))
                        .await
                }
            },
            &format!("upload video \"{}\"", item.title),
        )
        .await?;

        self.state.update_quota(|q| charge(q, UPLOAD_COST)).await?;

        let url = format!("https://youtu.be/{}", video_id);
        info!(video_id = %video_id, title = %item.title, "Video uploaded");
        self.state.mark_uploaded(&item.id, &video_id, &url).await?;
        Ok(video_id)
    }

    /// Thumbnail sub-step. Isolated: a missing thumbnail must never
    /// un-publish or fail a video, so every failure collapses to `false`.
    async fn try_set_thumbnail(&mut self, item: &ManifestItem, video_id: &str) -> bool {
        let Some(filename) = thumbnail_filename(item).map(str::to_string) else {
            debug!(item_id = %item.id, "No thumbnail file, skipping");
            return false;
        };

        if !can_afford(self.state.quota(), THUMBNAIL_COST) {
            warn!(item_id = %item.id, "Not enough quota to set thumbnail today");
            return false;
        }

        info!(video_id, thumbnail = %filename, "Setting thumbnail");
        match self.set_thumbnail_inner(item, &filename, video_id).await {
            Ok(()) => {
                info!(video_id, "Thumbnail set");
                true
            }
            Err(e) => {
                error!(
                    error = %e,
                    video_id,
                    thumbnail = %filename,
                    "Failed to set thumbnail"
                );
                false
            }
        }
    }

    async fn set_thumbnail_inner(
        &mut self,
        item: &ManifestItem,
        filename: &str,
        video_id: &str,
    ) -> Result<()> {
        let buffer = self.assets.fetch_buffer(&item.folder, filename).await?;
        let content_type = buffer
            .content_type
            .clone()
            .unwrap_or_else(|| "image/jpeg".to_string());
        let bytes = buffer.bytes;
        let platform = Arc::clone(&self.platform);

        with_retry(
            || platform.set_thumbnail(video_id, bytes.clone(), &content_type),
            &format!("set thumbnail for \"{}\"", item.title),
        )
        .await?;

        self.state
            .update_quota(|q| charge(q, THUMBNAIL_COST))
            .await?;
        Ok(())
    }

    /// Collection-membership sub-step, same isolation policy as the
    /// thumbnail step. Requires the series to already be bound to a remote
    /// playlist by the reconciler.
    async fn try_add_to_collection(&mut self, item: &ManifestItem, video_id: &str) -> bool {
        let Some(series) = item.series.clone() else {
            return false;
        };

        let Some(collection) = self.state.collection(&series.id) else {
            warn!(
                series_id = %series.id,
                "No playlist found for series, skipping playlist add"
            );
            return false;
        };
        let playlist_id = collection.remote_playlist_id.clone();
        let playlist_title = collection.title.clone();

        if !can_afford(self.state.quota(), PLAYLIST_ITEM_COST) {
            warn!(item_id = %item.id, "Not enough quota to add video to playlist");
            return false;
        }

        // manifest positions are 1-indexed, the platform expects 0-indexed
        let position = series.position.map(|p| p.saturating_sub(1));
        let platform = Arc::clone(&self.platform);

        let outcome = with_retry(
            || platform.add_playlist_item(&playlist_id, video_id, position),
            &format!("add video {} to playlist {}", video_id, playlist_id),
        )
        .await;

        match outcome {
            Ok(()) => {
                if let Err(e) = self
                    .state
                    .update_quota(|q| charge(q, PLAYLIST_ITEM_COST))
                    .await
                {
                    error!(error = %e, "Failed to persist quota charge");
                }
                info!(
                    video_id,
                    playlist_id = %playlist_id,
                    title = %playlist_title,
                    "Video added to playlist"
                );
                true
            }
            Err(e) => {
                error!(
                    error = %e,
                    video_id,
                    series_id = %series.id,
                    "Failed to add video to playlist"
                );
                false
            }
        }
    }

    /// Re-attempt the collection add for completed items that missed it.
    pub async fn retry_collection_adds(&mut self) -> Result<RetrySummary> {
        let mut attempted: u64 = 0;
        let mut succeeded: u64 = 0;

        for item in self.items.clone() {
            let job = self.state.job(&item.id);
            if job.status != JobStatus::Complete || job.added_to_collection {
                continue;
            }
            if item.series.is_none() {
                continue;
            }
            let Some(video_id) = job.remote_video_id else {
                continue;
            };

            attempted += 1;
            if self.try_add_to_collection(&item, &video_id).await {
                succeeded += 1;
                self.state
                    .update_job(&item.id, |j| j.added_to_collection = true)
                    .await?;
            }
        }

        info!(attempted, succeeded, "Playlist add retry pass complete");
        Ok(RetrySummary {
            attempted,
            succeeded,
        })
    }

    /// Report what a real run would do, without remote calls or writes.
    pub fn dry_run(&self, single_item: Option<&str>) -> Result<DryRunReport> {
        let items = self.select_items(single_item)?;

        let mut pending: u64 = 0;
        let mut completed: u64 = 0;
        let mut failed: u64 = 0;
        let mut entries = Vec::new();

        for item in &items {
            let job = self.state.job(&item.id);
            if job.status == JobStatus::Complete {
                completed += 1;
                continue;
            }
            if job.status == JobStatus::Failed {
                failed += 1;
            }
            pending += 1;

            entries.push(DryRunEntry {
                id: item.id.clone(),
                title: item.title.clone(),
                status: job.status,
                date: item.date.clone(),
                video: item.video_filename.clone(),
                thumbnail: thumbnail_filename(item).map(str::to_string),
                series: item.series.as_ref().and_then(|s| s.title.clone()),
                speaker: self
                    .library
                    .get(&item.id)
                    .and_then(|e| e.speaker.clone()),
            });
        }

        let items_per_day = DAILY_QUOTA / VIDEO_TOTAL_COST;
        Ok(DryRunReport {
            pending,
            completed,
            failed,
            estimated_days: pending.div_ceil(items_per_day),
            entries,
        })
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512.0 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn test_default_config_durations() {
        let config = PipelineConfig::default();
        assert_eq!(config.inter_item_delay, Duration::from_secs(5));
        assert_eq!(config.quota_wait_margin, Duration::from_secs(60));
    }
}
