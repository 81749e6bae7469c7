//! Run report
//!
//! Derived, human-readable summary of the durable state. Never
//! authoritative: it can be regenerated at any time from the root state.

use crate::error::Result;
use chrono::Utc;
use core_manifest::{LibraryEntry, ManifestItem};
use core_state::{JobStatus, RootState};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub total_videos: u64,
    pub uploaded: u64,
    pub failed: u64,
    pub pending: u64,
    pub playlists: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportVideo {
    pub item_id: String,
    pub title: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_video_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_uploaded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_to_collection: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: String,
    pub summary: ReportSummary,
    pub videos: Vec<ReportVideo>,
}

/// Build the report from the durable state.
///
/// Terminal items get a detail row; everything else only counts as pending.
pub fn generate_report(
    items: &[ManifestItem],
    library: &HashMap<String, LibraryEntry>,
    root: &RootState,
) -> Report {
    let mut uploaded: u64 = 0;
    let mut failed: u64 = 0;
    let mut pending: u64 = 0;
    let mut videos = Vec::new();

    for item in items {
        let Some(job) = root.jobs.get(&item.id) else {
            pending += 1;
            continue;
        };

        match job.status {
            JobStatus::Failed => {
                failed += 1;
                videos.push(ReportVideo {
                    item_id: item.id.clone(),
                    title: item.title.clone(),
                    status: JobStatus::Failed,
                    speaker: None,
                    remote_video_id: None,
                    remote_url: None,
                    playlist_id: None,
                    thumbnail_uploaded: None,
                    added_to_collection: None,
                    uploaded_at: None,
                    error: job.error.clone(),
                    failed_at: job.failed_at.clone(),
                });
            }
            JobStatus::Complete => {
                uploaded += 1;
                let playlist_id = item
                    .series
                    .as_ref()
                    .and_then(|s| root.collections.get(&s.id))
                    .map(|c| c.remote_playlist_id.clone());
                videos.push(ReportVideo {
                    item_id: item.id.clone(),
                    title: item.title.clone(),
                    status: JobStatus::Complete,
                    speaker: library.get(&item.id).and_then(|e| e.speaker.clone()),
                    remote_video_id: job.remote_video_id.clone(),
                    remote_url: job.remote_url.clone(),
                    playlist_id,
                    thumbnail_uploaded: Some(job.thumbnail_uploaded),
                    added_to_collection: Some(job.added_to_collection),
                    uploaded_at: job.uploaded_at.clone(),
                    error: None,
                    failed_at: None,
                });
            }
            _ => pending += 1,
        }
    }

    Report {
        generated_at: Utc::now().to_rfc3339(),
        summary: ReportSummary {
            total_videos: items.len() as u64,
            uploaded,
            failed,
            pending,
            playlists: root.collections.len() as u64,
        },
        videos,
    }
}

/// Write the report as pretty JSON
pub async fn write_report(report: &Report, path: &Path) -> Result<()> {
    let json = serde_json::to_vec_pretty(report)
        .map_err(|e| core_state::StateError::Serialization(e.to_string()))?;
    tokio::fs::write(path, json)
        .await
        .map_err(core_state::StateError::from)?;
    info!(path = %path.display(), "Report generated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::JobState;

    fn item(id: &str, series_id: Option<&str>) -> ManifestItem {
        ManifestItem {
            id: id.to_string(),
            title: format!("Title {}", id),
            date: "2026-01-01".to_string(),
            folder: "f".to_string(),
            video_filename: "v.mp4".to_string(),
            image_wide: None,
            image_banner: None,
            thumbnail_01: None,
            series: series_id.map(|s| core_manifest::SeriesRef {
                id: s.to_string(),
                title: Some("S".to_string()),
                subtitle: None,
                position: None,
                image: None,
            }),
        }
    }

    #[test]
    fn test_report_counts_and_rows() {
        let items = vec![item("a", Some("s1")), item("b", None), item("c", None)];
        let library = HashMap::new();
        let mut root = RootState::default();

        root.jobs.insert(
            "a".to_string(),
            JobState {
                status: JobStatus::Complete,
                remote_video_id: Some("vid-a".to_string()),
                remote_url: Some("https://youtu.be/vid-a".to_string()),
                thumbnail_uploaded: true,
                added_to_collection: true,
                uploaded_at: Some("2026-01-02T00:00:00Z".to_string()),
                ..Default::default()
            },
        );
        root.jobs.insert(
            "b".to_string(),
            JobState {
                status: JobStatus::Failed,
                error: Some("boom".to_string()),
                failed_at: Some("2026-01-02T00:00:00Z".to_string()),
                ..Default::default()
            },
        );
        root.collections.insert(
            "s1".to_string(),
            core_state::CollectionState {
                remote_playlist_id: "pl-1".to_string(),
                title: "S".to_string(),
                created_at: None,
                thumbnail_set: true,
            },
        );

        let report = generate_report(&items, &library, &root);
        assert_eq!(report.summary.total_videos, 3);
        assert_eq!(report.summary.uploaded, 1);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.pending, 1);
        assert_eq!(report.summary.playlists, 1);

        assert_eq!(report.videos.len(), 2);
        let complete = report.videos.iter().find(|v| v.item_id == "a").unwrap();
        assert_eq!(complete.playlist_id.as_deref(), Some("pl-1"));
        assert_eq!(complete.remote_url.as_deref(), Some("https://youtu.be/vid-a"));
        let failed = report.videos.iter().find(|v| v.item_id == "b").unwrap();
        assert_eq!(failed.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_in_flight_items_count_as_pending() {
        let items = vec![item("a", None)];
        let mut root = RootState::default();
        root.jobs.insert(
            "a".to_string(),
            JobState {
                status: JobStatus::Uploaded,
                ..Default::default()
            },
        );

        let report = generate_report(&items, &HashMap::new(), &root);
        assert_eq!(report.summary.pending, 1);
        assert!(report.videos.is_empty());
    }

    #[tokio::test]
    async fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload-report.json");
        let report = generate_report(&[], &HashMap::new(), &RootState::default());

        write_report(&report, &path).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written["summary"]["total_videos"], 0);
    }
}
