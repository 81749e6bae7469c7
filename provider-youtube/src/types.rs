//! YouTube API v3 wire types
//!
//! Only the fields the pipeline sends or reads; the API tolerates omitted
//! optional fields in both directions.

use platform_traits::VideoMetadata;
use serde::{Deserialize, Serialize};

/// `videos.insert` request body
#[derive(Debug, Serialize)]
pub struct VideoResource {
    pub snippet: VideoSnippet,
    pub status: VideoStatus,
    #[serde(rename = "recordingDetails", skip_serializing_if = "Option::is_none")]
    pub recording_details: Option<RecordingDetails>,
}

#[derive(Debug, Serialize)]
pub struct VideoSnippet {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(rename = "categoryId")]
    pub category_id: String,
}

#[derive(Debug, Serialize)]
pub struct VideoStatus {
    #[serde(rename = "privacyStatus")]
    pub privacy_status: String,
    #[serde(rename = "selfDeclaredMadeForKids")]
    pub self_declared_made_for_kids: bool,
}

#[derive(Debug, Serialize)]
pub struct RecordingDetails {
    #[serde(rename = "recordingDate")]
    pub recording_date: String,
}

impl From<&VideoMetadata> for VideoResource {
    fn from(metadata: &VideoMetadata) -> Self {
        Self {
            snippet: VideoSnippet {
                title: metadata.title.clone(),
                description: metadata.description.clone(),
                tags: metadata.tags.clone(),
                category_id: metadata.category_id.clone(),
            },
            status: VideoStatus {
                privacy_status: metadata.privacy_status.clone(),
                self_declared_made_for_kids: metadata.made_for_kids,
            },
            recording_details: metadata
                .recording_date
                .clone()
                .map(|recording_date| RecordingDetails { recording_date }),
        }
    }
}

/// `videos.insert` response; only the id matters downstream
#[derive(Debug, Deserialize)]
pub struct VideoInsertResponse {
    pub id: String,
}

/// One playlist in a `playlists.list` page
#[derive(Debug, Deserialize)]
pub struct PlaylistResource {
    pub id: String,
    pub snippet: PlaylistSnippetOut,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistSnippetOut {
    pub title: String,
}

/// `playlists.list` response page
#[derive(Debug, Deserialize)]
pub struct PlaylistListResponse {
    #[serde(default)]
    pub items: Vec<PlaylistResource>,
    #[serde(rename = "nextPageToken", default)]
    pub next_page_token: Option<String>,
}

/// `playlists.insert` request body
#[derive(Debug, Serialize)]
pub struct PlaylistInsertRequest {
    pub snippet: PlaylistSnippetIn,
    pub status: PlaylistStatus,
}

#[derive(Debug, Serialize)]
pub struct PlaylistSnippetIn {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct PlaylistStatus {
    #[serde(rename = "privacyStatus")]
    pub privacy_status: String,
}

/// `playlists.insert` response
#[derive(Debug, Deserialize)]
pub struct PlaylistInsertResponse {
    pub id: String,
}

/// `playlistItems.insert` request body
#[derive(Debug, Serialize)]
pub struct PlaylistItemInsertRequest {
    pub snippet: PlaylistItemSnippet,
}

#[derive(Debug, Serialize)]
pub struct PlaylistItemSnippet {
    #[serde(rename = "playlistId")]
    pub playlist_id: String,
    #[serde(rename = "resourceId")]
    pub resource_id: ResourceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ResourceId {
    pub kind: String,
    #[serde(rename = "videoId")]
    pub video_id: String,
}
