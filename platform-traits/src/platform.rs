//! Video platform abstraction
//!
//! Trait for the remote video-hosting platform: primary asset upload,
//! thumbnail management, and playlist operations. Implemented by
//! `provider-youtube`; consumed by the pipeline as `Arc<dyn VideoPlatform>`.

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Streamed media body with a declared total length.
///
/// Boxed so the trait stays object-safe; the provider hands this to the HTTP
/// client as a request body without buffering the whole asset in memory.
pub type ByteStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send + 'static>>;

/// Progress observer for streamed uploads: `(bytes_sent, total_bytes)`.
pub type ProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Platform-ready metadata for a video insert.
///
/// Built once per item by the metadata builder; the provider serializes it
/// into the platform's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Video title
    pub title: String,
    /// Full description text
    pub description: String,
    /// Search tags
    pub tags: Vec<String>,
    /// Platform category identifier
    pub category_id: String,
    /// Privacy status (`private`, `unlisted`, `public`)
    pub privacy_status: String,
    /// Declared-for-kids flag
    pub made_for_kids: bool,
    /// Original recording date (RFC 3339), when known
    pub recording_date: Option<String>,
}

/// One remote playlist as returned by a list page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemotePlaylist {
    /// Platform playlist identifier
    pub id: String,
    /// Playlist title
    pub title: String,
}

/// One page of the account's playlists
#[derive(Debug, Clone)]
pub struct PlaylistPage {
    /// Playlists on this page
    pub playlists: Vec<RemotePlaylist>,
    /// Token for the next page, absent on the last page
    pub next_page_token: Option<String>,
}

/// Remote video-hosting platform operations.
///
/// Every method maps to one chargeable remote call; quota accounting and
/// retry wrapping happen in the caller, not here. Errors carry their
/// retryability classification (see [`crate::PlatformError`]).
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Upload the primary video asset.
    ///
    /// `content` is streamed with `size` declared up front; `progress`, when
    /// provided, observes bytes sent. Returns the platform video id.
    async fn upload_video(
        &self,
        metadata: &VideoMetadata,
        content: ByteStream,
        size: u64,
        progress: Option<ProgressCallback>,
    ) -> Result<String>;

    /// Set the custom thumbnail for an uploaded video
    async fn set_thumbnail(&self, video_id: &str, image: Bytes, content_type: &str) -> Result<()>;

    /// List one page of the account's playlists
    async fn list_playlists(&self, page_token: Option<&str>) -> Result<PlaylistPage>;

    /// Create a new private playlist, returning its platform id
    async fn create_playlist(&self, title: &str, description: &str) -> Result<String>;

    /// Insert a video into a playlist at an optional 0-indexed position
    async fn add_playlist_item(
        &self,
        playlist_id: &str,
        video_id: &str,
        position: Option<u32>,
    ) -> Result<()>;

    /// Set the cover image of a playlist
    async fn set_playlist_cover(
        &self,
        playlist_id: &str,
        image: Bytes,
        content_type: &str,
    ) -> Result<()>;
}
