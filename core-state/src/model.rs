//! Durable state model
//!
//! One aggregate document holds everything the pipeline needs to resume:
//! quota counters, per-item job states, and per-series collection states.

use core_quota::QuotaState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle status of one upload job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Not yet attempted
    Pending,
    /// Primary upload in flight (a crash here restarts the upload)
    Uploading,
    /// Primary asset on the platform; sub-steps may remain
    Uploaded,
    /// All steps done; never revisited
    Complete,
    /// Primary upload failed; terminal for the run
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Uploading => "uploading",
            Self::Uploaded => "uploaded",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }

    /// Whether the pipeline should pick this item up: anything not yet
    /// terminal, including `uploaded` items whose sub-steps were cut short
    /// by a crash
    pub fn is_processable(&self) -> bool {
        !self.is_terminal()
    }

    /// Whether the item is finished for this run (successfully or not)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable per-item state, keyed by manifest item id.
///
/// An item absent from the store is equivalent to the default
/// (`status: pending`, nothing else set).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobState {
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_video_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    #[serde(default)]
    pub thumbnail_uploaded: bool,
    #[serde(default)]
    pub added_to_collection: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<String>,
}

impl Default for JobState {
    fn default() -> Self {
        Self {
            status: JobStatus::Pending,
            remote_video_id: None,
            remote_url: None,
            thumbnail_uploaded: false,
            added_to_collection: false,
            error: None,
            started_at: None,
            uploaded_at: None,
            failed_at: None,
        }
    }
}

/// Per-series playlist binding.
///
/// `remote_playlist_id` is written once, by creation or adoption, and never
/// changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionState {
    pub remote_playlist_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub thumbnail_set: bool,
}

/// The single persisted aggregate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub quota: QuotaState,
    #[serde(default)]
    pub jobs: BTreeMap<String, JobState>,
    #[serde(default)]
    pub collections: BTreeMap<String, CollectionState>,
}
